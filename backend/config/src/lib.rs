//! `daylog-config`: configuration for the daily file writer.
//!
//! Provides:
//! - Typed config schema (writer + diagnostics logging)
//! - YAML read/write with atomic replace
//! - `${ENV_VAR}` substitution
//! - Default value application
//! - Validation with path-qualified errors and warnings

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{collect_referenced_vars, resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, default_log_dir, load_config, write_config};
pub use schema::{DaylogConfig, LoggingConfig, WriterSection};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::path::Path;

/// Load, substitute env vars, apply defaults, and validate a config file.
pub async fn load_and_prepare(path: &Path) -> Result<DaylogConfig> {
    let raw_config = load_config(path).await?;
    prepare_config(raw_config, path)
}

/// Substitute `${VAR}` references and apply defaults.
pub fn resolve_config(raw_config: DaylogConfig) -> Result<DaylogConfig> {
    let value: Value = serde_json::to_value(&raw_config)
        .context("Failed to serialize config for processing")?;
    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;
    let config: DaylogConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    Ok(apply_all_defaults(config))
}

/// [`resolve_config`] followed by validation.
///
/// Warnings are logged; any validation error fails with the count and the
/// first error. `source` only labels the error message.
pub fn prepare_config(raw_config: DaylogConfig, source: &Path) -> Result<DaylogConfig> {
    let config = resolve_config(raw_config)?;

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.first() {
        bail!(
            "{} invalid config value(s) in {}; first: {first}",
            report.errors.len(),
            source.display()
        );
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn prepares_a_valid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "writer:\n  path: /srv/logs\n  minLevel: info\n").unwrap();

        let cfg = load_and_prepare(&path).await.unwrap();
        let writer = cfg.writer_config().unwrap();
        assert_eq!(writer.path, std::path::PathBuf::from("/srv/logs"));
        assert_eq!(writer.min_level, daylog_core::Level::Info);
        assert_eq!(cfg.log_level(), "info");
    }

    #[test]
    fn resolve_substitutes_before_defaults() {
        let raw = DaylogConfig {
            writer: Some(WriterSection {
                path: Some("${HOME}/logs".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let home = std::env::var("HOME").unwrap_or_default();
        if home.is_empty() {
            assert!(resolve_config(raw).is_err());
            return;
        }
        let cfg = resolve_config(raw).unwrap();
        let writer = cfg.writer.unwrap();
        assert_eq!(writer.path.unwrap(), format!("{home}/logs"));
        assert_eq!(writer.default_name.unwrap(), daylog_core::DEFAULT_NAME);
    }

    #[tokio::test]
    async fn invalid_values_fail_the_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "writer:\n  path: /srv/logs\n  filenameTemplate: static\n").unwrap();

        let err = load_and_prepare(&path).await.unwrap_err();
        assert!(err.to_string().contains("writer.filenameTemplate"));
    }
}
