//! Config validation with path-qualified messages.

use crate::schema::DaylogConfig;
use daylog_core::{validate_channel_name, validate_date_format, Level};
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// Errors and warnings found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

pub fn validate(config: &DaylogConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_writer(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_writer(config: &DaylogConfig, report: &mut ValidationReport) {
    let Some(writer) = &config.writer else { return };

    if let Some(path) = &writer.path {
        if path.trim().is_empty() {
            report.error("writer.path", "Log directory cannot be empty");
        } else if !std::path::Path::new(path).is_absolute() {
            report.warn(
                "writer.path",
                format!("Relative log directory '{path}' depends on the working directory"),
            );
        }
    }

    if let Some(template) = &writer.filename_template {
        if !template.contains("{name}") {
            report.error(
                "writer.filenameTemplate",
                "Template must contain {name}; otherwise every channel shares one file",
            );
        }
        if !template.contains("{date}") {
            report.warn(
                "writer.filenameTemplate",
                "Template has no {date}; files will never roll over",
            );
        }
        if template.contains('/') || template.contains('\\') {
            report.error("writer.filenameTemplate", "Template must not contain path separators");
        }
    }

    if let Some(format) = &writer.date_format {
        if let Err(e) = validate_date_format(format) {
            report.error("writer.dateFormat", e.to_string());
        }
    }

    if let Some(name) = &writer.default_name {
        if let Err(e) = validate_channel_name(name) {
            report.error("writer.defaultName", e.to_string());
        }
    }

    if let Some(level) = &writer.min_level {
        if let Err(e) = level.parse::<Level>() {
            report.error("writer.minLevel", e.to_string());
        }
    }

    if writer.json_encode == Some(false) && writer.json_options.is_some_and(|o| o.pretty_print) {
        report.warn(
            "writer.jsonOptions",
            "jsonOptions has no effect while jsonEncode is false",
        );
    }
}

fn validate_logging(config: &DaylogConfig, report: &mut ValidationReport) {
    let Some(level) = config.logging.as_ref().and_then(|l| l.level.as_deref()) else {
        return;
    };
    let plain_level = level.eq_ignore_ascii_case("off") || level.parse::<tracing::Level>().is_ok();
    // Anything with '=' is an EnvFilter directive and is checked at start-up.
    if !plain_level && !level.contains('=') {
        report.error(
            "logging.level",
            format!("Unknown level '{level}'. Use trace, debug, info, warn, error, or off"),
        );
    }
}
