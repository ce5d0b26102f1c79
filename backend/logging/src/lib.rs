//! Per-channel daily file logging.
//!
//! A [`DailyFileLogWriter`] keeps one open file per (channel, day), formats
//! messages (JSON-encoding structured values), and routes name-addressed
//! calls to `<dir>/<channel>-<YYYY-MM-DD>.log`.

#[macro_use]
mod macros;

pub mod dispatch;
pub mod encode;
pub mod formatter;
pub mod logger;
pub mod registry;
pub mod writer;

use std::sync::Arc;

pub use dispatch::{resolve_args, Channel};
pub use encode::{encode_json, MessageEncoder};
pub use formatter::LineFormatter;
pub use logger::init_logger;
pub use registry::{FileHandle, LoggerRegistry};
pub use writer::DailyFileLogWriter;

pub use daylog_core::{Context, Level, LogError, LogPayload, Message, WriterConfig};

/// A writer shared between callers.
pub type SharedWriter = Arc<DailyFileLogWriter>;
