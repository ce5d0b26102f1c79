use chrono::{DateTime, Local};

use crate::context::Context;
use crate::level::Level;

/// One formatted log entry, built per call and consumed by the write.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub datetime: DateTime<Local>,
    pub channel: String,
    pub level: Level,
    pub message: String,
    pub context: Context,
}
