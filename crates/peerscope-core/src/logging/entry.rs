//! One JSONL log line

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A self-contained log record.
///
/// Each record is one line, so files stay readable after a crash mid-write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// RFC 3339 timestamp with milliseconds
    pub ts: String,

    /// trace, debug, info, warn or error
    pub level: String,

    /// Session that wrote the entry
    pub session: String,

    /// Module path of the event
    pub target: String,

    pub msg: String,

    /// Structured fields attached to the event
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Value>,

    /// Enclosing spans, outermost first, joined with " > "
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<String>,
}

impl LogEntry {
    pub fn new(
        level: impl Into<String>,
        session: impl Into<String>,
        target: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self {
            ts: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            level: level.into(),
            session: session.into(),
            target: target.into(),
            msg: msg.into(),
            fields: None,
            span: None,
        }
    }

    pub fn with_fields(mut self, fields: Value) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn with_span(mut self, span: impl Into<String>) -> Self {
        self.span = Some(span.into());
        self
    }

    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}
