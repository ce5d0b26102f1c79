//! Name-based routing: the channel name is chosen per call and the level
//! may ride along as the first positional argument.
//!
//! ```text
//! route("orders", ["error", "payment failed"])  -> error, "payment failed"
//! route("orders", ["payment failed"])           -> info,  "payment failed"
//! ```

use daylog_core::{Context, Level, LogError, Message};

use crate::writer::DailyFileLogWriter;

/// Split positional arguments into a level and a message.
///
/// A leading text argument naming a level (any case) selects that level
/// when a message follows it. Otherwise the first argument is the message
/// at `info`. Extra arguments are ignored.
pub fn resolve_args<I>(name: &str, args: I) -> Result<(Level, Message), LogError>
where
    I: IntoIterator,
    I::Item: Into<Message>,
{
    let mut args = args.into_iter().map(Into::into);
    let first = args
        .next()
        .ok_or_else(|| LogError::MissingMessage(name.to_string()))?;

    match first.as_text().and_then(Level::parse_ignore_case) {
        Some(level) => match args.next() {
            Some(message) => Ok((level, message)),
            None => Ok((Level::Info, first)),
        },
        None => Ok((Level::Info, first)),
    }
}

impl DailyFileLogWriter {
    /// Write to the channel `name`, resolving level and message from `args`.
    pub fn route<I>(&self, name: &str, args: I) -> Result<(), LogError>
    where
        I: IntoIterator,
        I::Item: Into<Message>,
    {
        let (level, message) = resolve_args(name, args)?;
        self.write_log(level, name, message, Context::new())
    }

    /// A handle whose level methods write to the channel `name`.
    pub fn channel(&self, name: impl Into<String>) -> Channel<'_> {
        Channel {
            writer: self,
            name: name.into(),
        }
    }
}

/// A writer bound to one channel name.
#[derive(Debug, Clone)]
pub struct Channel<'a> {
    writer: &'a DailyFileLogWriter,
    name: String,
}

impl Channel<'_> {
    pub fn name(&self) -> &str {
        &self.name
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

    pub fn log(
        &self,
        level: &str,
        message: impl Into<Message>,
        context: Context,
    ) -> Result<(), LogError> {
        self.writer.write_log_str(level, &self.name, message, context)
    }

    /// Positional call on this channel, see [`resolve_args`].
    pub fn call<I>(&self, args: I) -> Result<(), LogError>
    where
        I: IntoIterator,
        I::Item: Into<Message>,
    {
        self.writer.route(&self.name, args)
    }

    fn write_at(&self, level: Level, message: Message, context: Context) -> Result<(), LogError> {
        self.writer.write_log(level, &self.name, message, context)
    }
}
