//! Message formatting: turns a [`Message`] into the string that lands in
//! the log line.

use daylog_core::{JsonOptions, LogError, LogPayload, Message};
use serde_json::Value;

#[derive(Debug, Clone, Copy)]
pub struct MessageEncoder {
    json_encode: bool,
    options: JsonOptions,
}

impl MessageEncoder {
    pub fn new(json_encode: bool, options: JsonOptions) -> Self {
        Self {
            json_encode,
            options,
        }
    }

    /// Render a message.
    ///
    /// Text passes through untouched. With JSON encoding on, structured
    /// values are encoded per the configured options; otherwise they are
    /// dumped as YAML. Payloads prefer their array representation, then
    /// their own JSON (re-encoded per the options when JSON encoding is on),
    /// then `Debug`.
    pub fn format(&self, message: &Message) -> Result<String, LogError> {
        match message {
            Message::Text(s) => Ok(s.clone()),
            Message::Structured(Value::String(s)) => Ok(s.clone()),
            Message::Structured(value) if self.json_encode => {
                Ok(encode_json(value, self.options)?)
            }
            Message::Structured(value) => Ok(dump(value)),
            Message::Payload(payload) => self.format_payload(payload.as_ref()),
        }
    }

    fn format_payload(&self, payload: &dyn LogPayload) -> Result<String, LogError> {
        if let Some(value) = payload.to_array() {
            return if self.json_encode {
                Ok(encode_json(&value, self.options)?)
            } else {
                Ok(dump(&value))
            };
        }
        if let Some(json) = payload.to_json() {
            if !self.json_encode {
                return Ok(json);
            }
            // Re-encode so the configured options apply; unparsable output
            // is written as the payload produced it.
            return match serde_json::from_str::<Value>(&json) {
                Ok(value) => Ok(encode_json(&value, self.options)?),
                Err(_) => Ok(json),
            };
        }
        Ok(format!("{payload:?}"))
    }
}

/// Encode a JSON value honoring pretty-print and unicode escaping.
pub fn encode_json(value: &Value, options: JsonOptions) -> serde_json::Result<String> {
    let encoded = if options.pretty_print {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    if options.unescaped_unicode {
        Ok(encoded)
    } else {
        Ok(escape_non_ascii(&encoded))
    }
}

/// Replace every non-ASCII char with `\uXXXX` (UTF-16 surrogate pairs
/// where needed). JSON syntax is pure ASCII, so anything non-ASCII sits
/// inside a string literal.
fn escape_non_ascii(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut units = [0u16; 2];
    for c in json.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    out
}

/// Human-readable dump for when JSON encoding is off.
fn dump(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => match serde_yaml::to_string(value) {
            Ok(yaml) => yaml.trim_end().to_string(),
            Err(_) => value.to_string(),
        },
    }
}
