//! Typed schema for `config.yaml`.
//!
//! Every field is optional on disk; [`crate::defaults`] fills the gaps.

use std::str::FromStr;

use anyhow::{Context, Result};
use daylog_core::{JsonOptions, Level, WriterConfig};
use serde::{Deserialize, Serialize};

use crate::io::default_log_dir;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaylogConfig {
    /// Daily file writer settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writer: Option<WriterSection>,

    /// Diagnostics output of the daylog process itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriterSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename_template: Option<String>,
    /// chrono strftime pattern, e.g. `%Y-%m-%d`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_encode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_options: Option<JsonOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_level: Option<String>, // "debug" | "info" | ... | "emergency"
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl DaylogConfig {
    /// Build the writer configuration, falling back to built-in defaults
    /// for anything left unset.
    pub fn writer_config(&self) -> Result<WriterConfig> {
        let section = self.writer.clone().unwrap_or_default();
        let path = section
            .path
            .map(Into::into)
            .unwrap_or_else(default_log_dir);

        let mut config = WriterConfig::new(path);
        if let Some(template) = section.filename_template {
            config = config.with_filename_template(template);
        }
        if let Some(format) = section.date_format {
            config = config.with_date_format(format);
        }
        if let Some(enabled) = section.json_encode {
            config = config.with_json_encode(enabled);
        }
        if let Some(options) = section.json_options {
            config = config.with_json_options(options);
        }
        if let Some(name) = section.default_name {
            config = config.with_default_name(name);
        }
        if let Some(level) = section.min_level {
            let level = Level::from_str(&level).context("Invalid writer.minLevel")?;
            config = config.with_min_level(level);
        }

        config.validate().context("Invalid writer configuration")?;
        Ok(config)
    }

    /// Diagnostics level for the daylog process, `info` when unset.
    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or("info")
    }
}
