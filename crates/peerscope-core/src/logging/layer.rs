//! tracing Layer that mirrors events into the session JSONL file

use std::fmt::Write as FmtWrite;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use super::entry::LogEntry;
use super::writer::SessionLogWriter;

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "peerscope=info,peerscope_core=info,peerscope_ui=info";

/// Writes every event it sees to a [`SessionLogWriter`].
pub struct JsonlLayer {
    writer: Arc<SessionLogWriter>,
}

impl JsonlLayer {
    pub fn new(logs_dir: impl AsRef<Path>, session: impl Into<String>) -> std::io::Result<Self> {
        Ok(Self {
            writer: Arc::new(SessionLogWriter::new(logs_dir, session)?),
        })
    }

    pub fn log_path(&self) -> &Path {
        self.writer.path()
    }

    pub fn session(&self) -> &str {
        self.writer.session()
    }
}

impl<S> Layer<S> for JsonlLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();

        let mut visitor = JsonVisitor::default();
        event.record(&mut visitor);

        let mut entry = LogEntry::new(
            metadata.level().as_str().to_lowercase(),
            self.writer.session(),
            metadata.target(),
            visitor.message.unwrap_or_default(),
        );
        if !visitor.fields.is_empty() {
            entry = entry.with_fields(Value::Object(visitor.fields));
        }
        if let Some(scope) = ctx.event_scope(event) {
            let spans: Vec<&str> = scope.from_root().map(|span| span.name()).collect();
            if !spans.is_empty() {
                entry = entry.with_span(spans.join(" > "));
            }
        }

        // Logging must never take the app down
        let _ = self.writer.write(&entry);
    }
}

#[derive(Default)]
struct JsonVisitor {
    message: Option<String>,
    fields: Map<String, Value>,
}

impl JsonVisitor {
    fn put(&mut self, field: &Field, value: Value) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for JsonVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let mut buf = String::new();
        let _ = write!(&mut buf, "{:?}", value);
        if field.name() == "message" {
            self.message = Some(buf);
        } else {
            self.put(field, Value::String(buf));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.put(field, Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, Value::Number(value.into()));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, Value::Number(value.into()));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, Value::Bool(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if let Some(n) = serde_json::Number::from_f64(value) {
            self.put(field, Value::Number(n));
        }
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.put(field, Value::String(value.to_string()));
    }
}

/// Installs the global subscriber: env filter, console output and JSONL.
pub struct LoggingBuilder {
    logs_dir: PathBuf,
    session: String,
    console_output: bool,
    env_filter: Option<String>,
}

impl LoggingBuilder {
    pub fn new(logs_dir: impl Into<PathBuf>, session: impl Into<String>) -> Self {
        Self {
            logs_dir: logs_dir.into(),
            session: session.into(),
            console_output: true,
            env_filter: None,
        }
    }

    /// Only write to the JSONL file
    pub fn no_console(mut self) -> Self {
        self.console_output = false;
        self
    }

    /// Filter directives used when `RUST_LOG` is unset
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// JSONL layer alone, for manual composition
    pub fn build_layer(&self) -> std::io::Result<JsonlLayer> {
        JsonlLayer::new(&self.logs_dir, &self.session)
    }

    /// Install as the global default. Returns the JSONL file path.
    pub fn init(self) -> std::io::Result<PathBuf> {
        let jsonl = self.build_layer()?;
        let log_path = jsonl.log_path().to_path_buf();

        let directives = self.env_filter.as_deref().unwrap_or(DEFAULT_FILTER);
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));
        let console = self
            .console_output
            .then(|| tracing_subscriber::fmt::layer().with_target(true));

        tracing_subscriber::registry()
            .with(filter)
            .with(console)
            .with(jsonl)
            .try_init()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::AlreadyExists, e))?;

        Ok(log_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::read_entries;
    use tempfile::TempDir;

    #[test]
    fn test_layer_records_message_fields_and_spans() {
        let temp = TempDir::new().unwrap();
        let layer = JsonlLayer::new(temp.path(), "test").unwrap();
        let log_path = layer.log_path().to_path_buf();

        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("Query executed");
            let span = tracing::info_span!("export");
            let _enter = span.enter();
            tracing::warn!(bytes = 42u64, ok = false, "Cleanup failed");
        });

        let entries = read_entries(&log_path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].msg, "Query executed");
        assert_eq!(entries[0].level, "info");
        assert_eq!(entries[1].span.as_deref(), Some("export"));
        let fields = entries[1].fields.as_ref().unwrap();
        assert_eq!(fields["bytes"], 42);
        assert_eq!(fields["ok"], false);
    }
}
