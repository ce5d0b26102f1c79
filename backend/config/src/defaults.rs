//! Config defaults applied after load, so `config show` prints the
//! effective values.

use daylog_core::{DEFAULT_DATE_FORMAT, DEFAULT_FILENAME_TEMPLATE, DEFAULT_NAME};

use crate::io::default_log_dir;
use crate::schema::{DaylogConfig, LoggingConfig, WriterSection};

/// Default diagnostics level for the daylog process.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default minimum level written to log files (everything).
pub const DEFAULT_MIN_LEVEL: &str = "debug";

pub fn apply_all_defaults(config: DaylogConfig) -> DaylogConfig {
    let config = apply_writer_defaults(config);
    apply_logging_defaults(config)
}

fn apply_writer_defaults(mut config: DaylogConfig) -> DaylogConfig {
    let writer = config.writer.get_or_insert_with(WriterSection::default);
    if writer.path.is_none() {
        writer.path = Some(default_log_dir().to_string_lossy().into_owned());
    }
    if writer.filename_template.is_none() {
        writer.filename_template = Some(DEFAULT_FILENAME_TEMPLATE.to_string());
    }
    if writer.date_format.is_none() {
        writer.date_format = Some(DEFAULT_DATE_FORMAT.to_string());
    }
    if writer.json_encode.is_none() {
        writer.json_encode = Some(true);
    }
    if writer.json_options.is_none() {
        writer.json_options = Some(Default::default());
    }
    if writer.default_name.is_none() {
        writer.default_name = Some(DEFAULT_NAME.to_string());
    }
    if writer.min_level.is_none() {
        writer.min_level = Some(DEFAULT_MIN_LEVEL.to_string());
    }
    config
}

fn apply_logging_defaults(mut config: DaylogConfig) -> DaylogConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    config
}
