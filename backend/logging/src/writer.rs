//! The daily file log writer.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use daylog_core::{
    validate_channel_name, Clock, Context, JsonOptions, Level, LogError, LogRecord, Message,
    SystemClock, WriterConfig,
};
use serde::Serialize;
use tracing::{trace, warn};

use crate::encode::MessageEncoder;
use crate::formatter::LineFormatter;
use crate::registry::LoggerRegistry;

/// Routes messages to one log file per (channel, day).
///
/// The registry lock covers both the lookup-or-open step and the write,
/// so a writer can be shared across threads behind an `Arc`.
#[derive(Debug)]
pub struct DailyFileLogWriter {
    config: WriterConfig,
    encoder: MessageEncoder,
    formatter: LineFormatter,
    clock: Arc<dyn Clock>,
    registry: Mutex<LoggerRegistry>,
}

impl DailyFileLogWriter {
    pub fn new(config: WriterConfig) -> Result<Self, LogError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: WriterConfig, clock: Arc<dyn Clock>) -> Result<Self, LogError> {
        config.validate()?;
        Ok(Self {
            encoder: MessageEncoder::new(config.json_encode, config.json_options),
            formatter: LineFormatter::new(),
            config,
            clock,
            registry: Mutex::new(LoggerRegistry::new()),
        })
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Write `message` at `level` to today's file for `name`.
    ///
    /// Records below the configured minimum level are dropped without
    /// touching the filesystem.
    pub fn write_log(
        &self,
        level: Level,
        name: &str,
        message: impl Into<Message>,
        context: Context,
    ) -> Result<(), LogError> {
        validate_channel_name(name)?;
        if level < self.config.min_level {
            trace!(channel = name, %level, "Dropped record below minimum level");
            return Ok(());
        }

        let message = self.format_message(&message.into())?;
        let now = self.clock.now();
        let timed_filename = self.config.timed_filename(name, &now);
        let record = LogRecord {
            datetime: now,
            channel: name.to_string(),
            level,
            message,
            context,
        };
        let entry = self.formatter.format(&record)?;

        self.registry()
            .write_entry(
                &timed_filename,
                || self.config.file_path(&timed_filename),
                now.date_naive(),
                &entry,
            )
            .inspect_err(|err| {
                warn!(channel = name, error = %err, "Log write failed");
            })
    }

    /// Like [`write_log`](Self::write_log) with the level given by name.
    ///
    /// Only the exact lowercase level names are accepted; anything else is
    /// [`LogError::UnknownLevel`] and nothing is written.
    pub fn write_log_str(
        &self,
        level: &str,
        name: &str,
        message: impl Into<Message>,
        context: Context,
    ) -> Result<(), LogError> {
        let level = level.parse::<Level>()?;
        self.write_log(level, name, message, context)
    }

    pub fn format_message(&self, message: &Message) -> Result<String, LogError> {
        self.encoder.format(message)
    }

    /// Basename (without extension) today's records for `name` go to.
    pub fn timed_filename(&self, name: &str) -> String {
        self.config.timed_filename(name, &self.clock.now())
    }

    /// Full path today's records for `name` go to.
    pub fn current_path(&self, name: &str) -> Result<PathBuf, LogError> {
        validate_channel_name(name)?;
        Ok(self.config.file_path(&self.timed_filename(name)))
    }

    /// Number of files currently held open.
    pub fn open_handles(&self) -> usize {
        self.registry().len()
    }

    /// Timed filenames currently held open, sorted.
    pub fn open_filenames(&self) -> Vec<String> {
        self.registry().filenames()
    }

    /// Close handles opened on any day other than today.
    pub fn close_stale_handles(&self) -> usize {
        let today = self.clock.now().date_naive();
        self.registry().retain_day(today)
    }

    level_methods! {
        debug => Debug,
        info => Info,
        notice => Notice,
        warning => Warning,
        error => Error,
        critical => Critical,
        alert => Alert,
        emergency => Emergency,
    }

    /// Write to the default channel with the level given by name.
    pub fn log(
        &self,
        level: &str,
        message: impl Into<Message>,
        context: Context,
    ) -> Result<(), LogError> {
        self.write_log_str(level, &self.config.default_name, message, context)
    }

    /// Pretty-print `value` as unescaped JSON and write it at debug level to
    /// the default channel.
    pub fn pretty<T: Serialize + ?Sized>(&self, value: &T, context: Context) -> Result<(), LogError> {
        let value = serde_json::to_value(value)?;
        let message = crate::encode::encode_json(&value, JsonOptions::pretty())?;
        self.write_at(Level::Debug, Message::Text(message), context)
    }

    fn write_at(&self, level: Level, message: Message, context: Context) -> Result<(), LogError> {
        self.write_log(level, &self.config.default_name, message, context)
    }

    fn registry(&self) -> MutexGuard<'_, LoggerRegistry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
