//! Line formatter.
//!
//! One entry per record:
//! `[2024-03-01 09:15:00] orders.ERROR: payment failed {"order_id":42}`
//!
//! Messages may span lines. Empty context is omitted. Error traces
//! attached to records at `error` or above are appended as `[stacktrace]`
//! continuation lines. The trace message goes under `"exception"` in the
//! inline context unless the caller already set that key, in which case it
//! leads the `[stacktrace]` block instead.

use daylog_core::{Level, LogError, LogRecord};
use serde_json::map::Entry;
use serde_json::Value;

pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct LineFormatter {
    datetime_format: String,
    include_stacktraces: bool,
}

impl Default for LineFormatter {
    fn default() -> Self {
        Self {
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
            include_stacktraces: true,
        }
    }
}

impl LineFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include_stacktraces(mut self, include: bool) -> Self {
        self.include_stacktraces = include;
        self
    }

    /// Format a record into a newline-terminated entry.
    pub fn format(&self, record: &LogRecord) -> Result<String, LogError> {
        let mut line = format!(
            "[{}] {}.{}: {}",
            record.datetime.format(&self.datetime_format),
            record.channel,
            record.level.label(),
            record.message,
        );

        let mut fields = record.context.fields().clone();
        let trace = record.context.error();
        // A caller-supplied "exception" field is kept as given.
        let mut displaced = false;
        if let Some(trace) = trace {
            match fields.entry("exception") {
                Entry::Vacant(slot) => {
                    slot.insert(Value::String(trace.message.clone()));
                }
                Entry::Occupied(_) => displaced = true,
            }
        }
        if !fields.is_empty() {
            line.push(' ');
            line.push_str(&serde_json::to_string(&fields)?);
        }

        if let Some(trace) = trace.filter(|_| self.include_stacktraces && record.level >= Level::Error) {
            line.push_str("\n[stacktrace]");
            if displaced {
                line.push('\n');
                line.push_str(&trace.message);
            }
            for (i, cause) in trace.causes.iter().enumerate() {
                line.push_str(&format!("\n#{i} caused by: {cause}"));
            }
            if let Some(backtrace) = &trace.backtrace {
                for frame in backtrace.lines() {
                    line.push('\n');
                    line.push_str(frame);
                }
            }
        }

        line.push('\n');
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use daylog_core::{Context, ErrorTrace};
    use serde_json::json;

    fn record(level: Level, message: &str, context: Context) -> LogRecord {
        LogRecord {
            datetime: Local.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap(),
            channel: "orders".to_string(),
            level,
            message: message.to_string(),
            context,
        }
    }

    #[derive(Debug)]
    struct Declined;

    impl std::fmt::Display for Declined {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("card declined")
        }
    }

    impl std::error::Error for Declined {}

    #[test]
    fn omits_empty_context() {
        let line = LineFormatter::new()
            .format(&record(Level::Error, "payment failed", Context::new()))
            .unwrap();
        assert_eq!(line, "[2024-03-01 09:15:00] orders.ERROR: payment failed\n");
    }

    #[test]
    fn renders_context_inline() {
        let ctx = Context::from_value(json!({"order_id": 42, "tags": ["eu"]})).unwrap();
        let line = LineFormatter::new()
            .format(&record(Level::Info, "retry scheduled", ctx))
            .unwrap();
        assert_eq!(
            line,
            "[2024-03-01 09:15:00] orders.INFO: retry scheduled {\"order_id\":42,\"tags\":[\"eu\"]}\n"
        );
    }

    #[test]
    fn keeps_multiline_messages() {
        let line = LineFormatter::new()
            .format(&record(Level::Debug, "first\nsecond", Context::new()))
            .unwrap();
        assert_eq!(line, "[2024-03-01 09:15:00] orders.DEBUG: first\nsecond\n");
    }

    #[test]
    fn stacktrace_only_at_error_and_above() {
        let mut trace = ErrorTrace::capture(&Declined);
        trace.causes = vec!["issuer unavailable".to_string()];
        trace.backtrace = Some("   0: app::charge\n   1: app::main".to_string());

        // Fixed trace so the output does not depend on RUST_BACKTRACE.
        let ctx = Context::new().with_trace(trace);

        let error_line = LineFormatter::new()
            .format(&record(Level::Critical, "charge failed", ctx.clone()))
            .unwrap();
        assert_eq!(
            error_line,
            "[2024-03-01 09:15:00] orders.CRITICAL: charge failed {\"exception\":\"card declined\"}\n\
             [stacktrace]\n\
             #0 caused by: issuer unavailable\n   0: app::charge\n   1: app::main\n"
        );

        let info_line = LineFormatter::new()
            .format(&record(Level::Info, "charge failed", ctx.clone()))
            .unwrap();
        assert_eq!(
            info_line,
            "[2024-03-01 09:15:00] orders.INFO: charge failed {\"exception\":\"card declined\"}\n"
        );

        let disabled = LineFormatter::new()
            .include_stacktraces(false)
            .format(&record(Level::Error, "charge failed", ctx))
            .unwrap();
        assert!(!disabled.contains("[stacktrace]"));
    }

    #[test]
    fn caller_exception_field_is_kept() {
        let ctx = Context::from_value(json!({"exception": "InvoiceMismatch", "order_id": 7}))
            .unwrap()
            .with_trace(ErrorTrace::capture(&Declined));

        let info_line = LineFormatter::new()
            .format(&record(Level::Warning, "reconcile skipped", ctx.clone()))
            .unwrap();
        assert_eq!(
            info_line,
            "[2024-03-01 09:15:00] orders.WARNING: reconcile skipped \
             {\"exception\":\"InvoiceMismatch\",\"order_id\":7}\n"
        );

        let error_line = LineFormatter::new()
            .format(&record(Level::Error, "reconcile failed", ctx))
            .unwrap();
        assert!(error_line.starts_with(
            "[2024-03-01 09:15:00] orders.ERROR: reconcile failed \
             {\"exception\":\"InvoiceMismatch\",\"order_id\":7}\n[stacktrace]\ncard declined"
        ));
    }
}
