//! Auxiliary key-value context attached to a log call.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error as StdError;

use serde_json::{Map, Value};

use crate::error::LogError;

/// A flat key-value mapping of extra fields, plus an optional error trace.
///
/// Values may themselves be nested JSON; they are rendered inline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    fields: Map<String, Value>,
    error: Option<ErrorTrace>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from an arbitrary JSON value.
    ///
    /// Objects are accepted as-is and `null` is treated as empty. Any
    /// other value is rejected with [`LogError::MalformedContext`].
    pub fn from_value(value: Value) -> Result<Self, LogError> {
        match value {
            Value::Object(fields) => Ok(Self {
                fields,
                error: None,
            }),
            Value::Null => Ok(Self::default()),
            other => Err(LogError::MalformedContext(json_kind(&other).to_string())),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Attach an error whose trace is rendered for error-level records.
    pub fn with_error(mut self, err: &(dyn StdError + 'static)) -> Self {
        self.error = Some(ErrorTrace::capture(err));
        self
    }

    pub fn with_trace(mut self, trace: ErrorTrace) -> Self {
        self.error = Some(trace);
        self
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn error(&self) -> Option<&ErrorTrace> {
        self.error.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.error.is_none()
    }
}

impl From<Map<String, Value>> for Context {
    fn from(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            error: None,
        }
    }
}

impl TryFrom<Value> for Context {
    type Error = LogError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Context::from_value(value)
    }
}

/// Captured error message, `source()` chain, and backtrace.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorTrace {
    pub message: String,
    pub causes: Vec<String>,
    pub backtrace: Option<String>,
}

impl ErrorTrace {
    /// Walk the error's source chain and capture a backtrace if enabled
    /// (`RUST_BACKTRACE`/`RUST_LIB_BACKTRACE`).
    pub fn capture(err: &(dyn StdError + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        let bt = Backtrace::capture();
        let backtrace = match bt.status() {
            BacktraceStatus::Captured => Some(bt.to_string()),
            _ => None,
        };

        Self {
            message: err.to_string(),
            causes,
            backtrace,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fmt;

    #[derive(Debug)]
    struct Outer(Inner);
    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("charge failed")
        }
    }
    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("gateway timeout")
        }
    }
    impl StdError for Outer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }
    impl StdError for Inner {}

    #[test]
    fn accepts_objects_and_null() {
        let ctx = Context::from_value(json!({"order_id": 42})).unwrap();
        assert_eq!(ctx.fields()["order_id"], 42);
        assert!(Context::from_value(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn rejects_non_mappings() {
        for bad in [json!([1, 2]), json!("x"), json!(3), json!(true)] {
            let err = Context::from_value(bad).unwrap_err();
            assert!(matches!(err, LogError::MalformedContext(_)));
        }
    }

    #[test]
    fn builder_inserts_fields() {
        let ctx = Context::new().with("user", "ana").with("attempt", 2);
        assert_eq!(ctx.fields().len(), 2);
        assert!(!ctx.is_empty());
    }

    #[test]
    fn captures_source_chain() {
        let err = Outer(Inner);
        let ctx = Context::new().with_error(&err);
        let trace = ctx.error().unwrap();
        assert_eq!(trace.message, "charge failed");
        assert_eq!(trace.causes, vec!["gateway timeout".to_string()]);
        assert!(!ctx.is_empty());
    }
}
