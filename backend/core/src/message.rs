//! Log message values.
//!
//! A message is plain text, an arbitrary JSON value, or a caller-defined
//! payload exposing one of the [`LogPayload`] representations.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

/// Capability seam for domain objects passed as log messages.
///
/// Both representations are optional; a payload with neither is rendered
/// through its `Debug` impl.
pub trait LogPayload: fmt::Debug + Send + Sync {
    /// Mapping/array representation of the value.
    fn to_array(&self) -> Option<Value> {
        None
    }

    /// The value's own JSON serialization.
    fn to_json(&self) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    Text(String),
    Structured(Value),
    Payload(Arc<dyn LogPayload>),
}

impl Message {
    pub fn payload(payload: impl LogPayload + 'static) -> Self {
        Message::Payload(Arc::new(payload))
    }

    /// Serialize any value into a structured message.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Self> {
        serde_json::to_value(value).map(Message::Structured)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Message::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Message {
    fn from(s: &str) -> Self {
        Message::Text(s.to_string())
    }
}

impl From<String> for Message {
    fn from(s: String) -> Self {
        Message::Text(s)
    }
}

impl From<&String> for Message {
    fn from(s: &String) -> Self {
        Message::Text(s.clone())
    }
}

/// JSON strings become text messages; everything else stays structured.
impl From<Value> for Message {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Message::Text(s),
            other => Message::Structured(other),
        }
    }
}

impl From<Arc<dyn LogPayload>> for Message {
    fn from(payload: Arc<dyn LogPayload>) -> Self {
        Message::Payload(payload)
    }
}
