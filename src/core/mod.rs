use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::FormatError;

/// Log severity, ordered from least to most severe.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
}

impl Level {
    /// Uppercase label used on header lines.
    pub fn label(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A log message: plain text, or a structured value rendered as indented
/// JSON.
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    Text(String),
    Structured(Value),
}

impl Message {
    /// Build a structured message from any serializable value.
    pub fn serialize<T: Serialize>(value: &T) -> Result<Self, FormatError> {
        Ok(Message::Structured(serde_json::to_value(value)?))
    }

    /// Textual form of the message. Mappings and arrays render as
    /// 2-space-indented JSON; scalars render plainly (a JSON string without
    /// its quotes).
    pub fn render(&self) -> Result<String, FormatError> {
        match self {
            Message::Text(text) => Ok(text.clone()),
            Message::Structured(value) => match value {
                Value::Object(_) | Value::Array(_) => Ok(serde_json::to_string_pretty(value)?),
                Value::String(text) => Ok(text.clone()),
                other => Ok(other.to_string()),
            },
        }
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_string())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Text(text)
    }
}

impl From<Value> for Message {
    fn from(value: Value) -> Self {
        Message::Structured(value)
    }
}

/// One structured log event handed to the printer.
#[derive(Clone, Debug)]
pub struct LogEvent {
    pub level: Level,
    pub message: Message,
    pub error: Option<String>,
    pub stack_trace: Option<String>,
    pub time: Option<DateTime<Local>>,
}

impl LogEvent {
    pub fn new(level: Level, message: impl Into<Message>) -> Self {
        Self {
            level,
            message: message.into(),
            error: None,
            stack_trace: None,
            time: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_stack_trace(mut self, trace: impl Into<String>) -> Self {
        self.stack_trace = Some(trace.into());
        self
    }

    pub fn with_time(mut self, time: DateTime<Local>) -> Self {
        self.time = Some(time);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_level_labels_are_uppercase() {
        assert_eq!(Level::Trace.label(), "TRACE");
        assert_eq!(Level::Warning.label(), "WARNING");
        assert_eq!(Level::Fatal.to_string(), "FATAL");
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Error < Level::Fatal);
    }

    #[test]
    fn test_text_message_renders_verbatim() {
        let message = Message::from("ready\nsteady");
        assert_eq!(message.render().unwrap(), "ready\nsteady");
    }

    #[test]
    fn test_structured_map_renders_as_indented_json() {
        let message = Message::from(json!({"code": 7}));
        assert_eq!(message.render().unwrap(), "{\n  \"code\": 7\n}");
    }

    #[test]
    fn test_structured_scalars_render_plainly() {
        assert_eq!(Message::from(json!("hello")).render().unwrap(), "hello");
        assert_eq!(Message::from(json!(42)).render().unwrap(), "42");
        assert_eq!(Message::from(json!(true)).render().unwrap(), "true");
    }

    #[test]
    fn test_message_from_serializable_value() {
        let message = Message::serialize(&vec![1, 2]).unwrap();
        assert_eq!(message, Message::Structured(json!([1, 2])));
    }

    #[test]
    fn test_event_builders() {
        let event = LogEvent::new(Level::Error, "boom")
            .with_error("oops")
            .with_stack_trace("#0      main (package:app/main.dart:3:1)");
        assert_eq!(event.error.as_deref(), Some("oops"));
        assert!(event.stack_trace.is_some());
        assert!(event.time.is_none());
    }
}
