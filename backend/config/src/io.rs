//! Config file locations and YAML read/write.

use crate::schema::DaylogConfig;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Fallback log directory, relative to the working directory.
const FALLBACK_LOG_DIR: &str = "storage/logs";

/// Resolve the daylog config directory.
/// Priority: `DAYLOG_CONFIG_DIR` env > `~/.daylog/`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("DAYLOG_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".daylog"),
        None => PathBuf::from(".daylog"),
    }
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Directory log files go to when the config does not name one.
/// Priority: `DAYLOG_LOG_DIR` env > `<local data dir>/daylog/logs` > `storage/logs`
pub fn default_log_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("DAYLOG_LOG_DIR") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    match dirs::data_local_dir() {
        Some(data) => data.join("daylog").join("logs"),
        None => PathBuf::from(FALLBACK_LOG_DIR),
    }
}

/// Load and parse the config from disk.
///
/// Returns `Ok(Default::default())` if the file doesn't exist.
pub async fn load_config(path: &Path) -> Result<DaylogConfig> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(DaylogConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: DaylogConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Write config to disk atomically (write to temp file, rename).
///
/// Refuses to replace an existing file unless `overwrite` is set.
pub async fn write_config(config: &DaylogConfig, path: &Path, overwrite: bool) -> Result<()> {
    if !overwrite && fs::try_exists(path).await.unwrap_or(false) {
        bail!("Config file already exists: {}", path.display());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.with_context(|| {
            format!("Failed to create config directory: {}", parent.display())
        })?;
    }

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize config to YAML")?;

    let tmp_path = path.with_extension("yaml.tmp");
    fs::write(&tmp_path, yaml.as_bytes())
        .await
        .with_context(|| format!("Failed to write temp config: {}", tmp_path.display()))?;

    fs::rename(&tmp_path, path).await.with_context(|| {
        format!("Failed to rename temp config to: {}", path.display())
    })?;

    info!(path = %path.display(), "Wrote config");
    Ok(())
}
