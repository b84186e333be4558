//! Session logging to JSONL files.
//!
//! Every run of the desktop app writes its tracing events to one JSONL file
//! per day and session. That file doubles as the log the export pipeline
//! ships when the user asks for store logs.
//!
//! ```text
//! <logs_dir>/
//! └── raw/
//!     ├── 2026-10-19_desktop.jsonl
//!     └── 2026-10-19_field-test.jsonl
//! ```
//!
//! ```ignore
//! use peerscope_core::logging::LoggingBuilder;
//!
//! let log_path = LoggingBuilder::new("./logs", "desktop")
//!     .with_filter("peerscope=debug")
//!     .init()?;
//! ```
//!
//! Entries can be filtered with jq:
//!
//! ```bash
//! jq 'select(.level == "warn")' logs/raw/*.jsonl
//! ```

pub mod entry;
pub mod layer;
pub mod writer;

pub use entry::LogEntry;
pub use layer::{JsonlLayer, LoggingBuilder, DEFAULT_FILTER};
pub use writer::{copy_log, read_entries, SessionLogWriter};
