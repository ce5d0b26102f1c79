//! `daylog-core`: shared types for per-channel daily file logging.

pub mod clock;
pub mod config;
pub mod context;
pub mod error;
pub mod level;
pub mod message;
pub mod record;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{
    validate_channel_name, validate_date_format, JsonOptions, WriterConfig,
    DEFAULT_DATE_FORMAT, DEFAULT_FILENAME_TEMPLATE, DEFAULT_NAME,
};
pub use context::{Context, ErrorTrace};
pub use error::{LogError, Result};
pub use level::Level;
pub use message::{LogPayload, Message};
pub use record::LogRecord;
