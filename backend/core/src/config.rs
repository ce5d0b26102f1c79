//! Writer configuration: destination directory, filename template, and
//! message encoding options. Fixed once a writer is constructed.

use std::path::PathBuf;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::LogError;
use crate::level::Level;

/// Placeholder replaced by the channel name.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Placeholder replaced by the formatted current date.
pub const DATE_PLACEHOLDER: &str = "{date}";

pub const DEFAULT_FILENAME_TEMPLATE: &str = "{name}-{date}";

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Channel used by the level-named convenience methods.
pub const DEFAULT_NAME: &str = "filewriter";

pub const LOG_FILE_EXTENSION: &str = "log";

/// JSON encoding flags for structured messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JsonOptions {
    pub pretty_print: bool,
    /// Emit non-ASCII characters as-is instead of `\uXXXX` escapes.
    pub unescaped_unicode: bool,
}

impl JsonOptions {
    pub fn pretty() -> Self {
        Self {
            pretty_print: true,
            unescaped_unicode: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WriterConfig {
    pub path: PathBuf,
    pub filename_template: String,
    pub date_format: String,
    pub json_encode: bool,
    pub json_options: JsonOptions,
    pub default_name: String,
    pub min_level: Level,
}

impl WriterConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            filename_template: DEFAULT_FILENAME_TEMPLATE.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            json_encode: true,
            json_options: JsonOptions::default(),
            default_name: DEFAULT_NAME.to_string(),
            min_level: Level::Debug,
        }
    }

    pub fn with_filename_template(mut self, template: impl Into<String>) -> Self {
        self.filename_template = template.into();
        self
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    pub fn with_json_encode(mut self, enabled: bool) -> Self {
        self.json_encode = enabled;
        self
    }

    pub fn with_json_options(mut self, options: JsonOptions) -> Self {
        self.json_options = options;
        self
    }

    pub fn with_default_name(mut self, name: impl Into<String>) -> Self {
        self.default_name = name.into();
        self
    }

    pub fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Check every field that would otherwise fail (or misroute) at write time.
    pub fn validate(&self) -> Result<(), LogError> {
        if self.path.as_os_str().is_empty() {
            return Err(LogError::InvalidConfig("log directory path is empty".into()));
        }
        if !self.filename_template.contains(NAME_PLACEHOLDER) {
            return Err(LogError::InvalidConfig(format!(
                "filename template {:?} must contain {NAME_PLACEHOLDER}",
                self.filename_template
            )));
        }
        if has_path_separator(&self.filename_template) {
            return Err(LogError::InvalidConfig(format!(
                "filename template {:?} must not contain path separators",
                self.filename_template
            )));
        }
        validate_date_format(&self.date_format)?;
        validate_channel_name(&self.default_name)?;
        Ok(())
    }

    /// Render the file basename for `name` on the day of `date`.
    pub fn timed_filename<Tz: TimeZone>(&self, name: &str, date: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        let date = date.format(&self.date_format).to_string();
        self.filename_template
            .replace(NAME_PLACEHOLDER, name)
            .replace(DATE_PLACEHOLDER, &date)
    }

    /// Full path of the log file for a timed filename.
    pub fn file_path(&self, timed_filename: &str) -> PathBuf {
        self.path
            .join(format!("{timed_filename}.{LOG_FILE_EXTENSION}"))
    }
}

/// Reject names that would escape the log directory or produce an empty
/// file stem.
pub fn validate_channel_name(name: &str) -> Result<(), LogError> {
    if name.is_empty() || name == "." || name == ".." || name.contains("..") {
        return Err(LogError::InvalidName(name.to_string()));
    }
    if has_path_separator(name) || name.contains('\0') {
        return Err(LogError::InvalidName(name.to_string()));
    }
    // Braces would let a name smuggle a placeholder into the template.
    if name.contains(['{', '}']) {
        return Err(LogError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// A date format is usable when chrono can parse every item and the
/// rendered date stays inside a single path component.
pub fn validate_date_format(format: &str) -> Result<(), LogError> {
    if format.is_empty() {
        return Err(LogError::InvalidConfig("date format is empty".into()));
    }
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(LogError::InvalidConfig(format!(
            "date format {format:?} is not a valid strftime pattern"
        )));
    }
    if has_path_separator(format) {
        return Err(LogError::InvalidConfig(format!(
            "date format {format:?} must not contain path separators"
        )));
    }
    Ok(())
}

fn has_path_separator(s: &str) -> bool {
    s.contains('/') || s.contains('\\')
}
