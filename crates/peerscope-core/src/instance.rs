//! Store SDK seams
//!
//! peerscope never syncs, stores or discovers anything itself. Everything it
//! shows comes from a store SDK instance reached through the traits in this
//! module, so the pipelines can run against the real SDK binding, the
//! in-memory [`crate::sim::SimulatedInstance`], or a test double.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  SyncInstance                                            │
//! │  ├── presence() ─► Presence::observe(cb) ─► Observer     │
//! │  ├── store()    ─► Store::execute(dql)   ─► QueryResult  │
//! │  ├── set_transport_config / start_sync / stop_sync       │
//! │  ├── persistence_directory()                             │
//! │  └── export_logs(path)                                   │
//! └──────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ToolsResult;
use crate::types::{PresenceSnapshot, TransportConfig};

/// Callback the SDK invokes with each new presence graph.
///
/// May be called from any thread.
pub type PresenceCallback = Box<dyn Fn(PresenceSnapshot) + Send + Sync + 'static>;

/// Handle for a registered presence callback.
pub trait PresenceObserver: Send + Sync {
    /// Unregister the callback. Calling more than once is harmless.
    fn stop(&self);
}

/// Presence graph notifications.
pub trait Presence: Send + Sync {
    /// Register `callback` for every topology change.
    fn observe(&self, callback: PresenceCallback) -> ToolsResult<Box<dyn PresenceObserver>>;
}

/// One item of a query result, backed by SDK-side memory until dematerialized.
pub trait QueryResultItem: Send {
    /// Canonical JSON serialization of the document
    fn json_string(&self) -> String;

    /// Raw value as the SDK exposes it
    fn value(&self) -> Value;

    /// Release SDK-side memory held for this item
    fn dematerialize(&mut self) -> ToolsResult<()>;
}

/// Result of a DQL statement.
pub trait QueryResult: Send {
    /// Take ownership of the result items
    fn take_items(&mut self) -> Vec<Box<dyn QueryResultItem>>;

    /// IDs touched by a mutating statement, `None` for reads
    fn mutated_document_ids(&self) -> Option<Vec<Value>>;

    /// Commit that applied the mutation, when the SDK reports one
    fn commit_id(&self) -> Option<String> {
        None
    }
}

/// DQL entry point.
#[async_trait]
pub trait Store: Send + Sync {
    async fn execute(&self, query: &str) -> ToolsResult<Box<dyn QueryResult>>;
}

/// A running store SDK instance.
#[async_trait]
pub trait SyncInstance: Send + Sync {
    fn set_transport_config(&self, config: &TransportConfig) -> ToolsResult<()>;

    fn start_sync(&self) -> ToolsResult<()>;

    fn stop_sync(&self) -> ToolsResult<()>;

    fn presence(&self) -> &dyn Presence;

    fn store(&self) -> &dyn Store;

    /// Directory holding the SDK's database files
    fn persistence_directory(&self) -> PathBuf;

    /// Write the SDK log to `path`, returning the number of bytes written
    async fn export_logs(&self, path: &Path) -> ToolsResult<u64>;
}

/// What to hand to the platform share action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub path: PathBuf,
    pub title: String,
    pub message: String,
}

/// Platform share action (share sheet, save dialog, ...).
///
/// Returning means the share was *invoked*; the user may still be looking at
/// the sheet.
#[async_trait]
pub trait ShareSink: Send + Sync {
    async fn share(&self, request: &ShareRequest) -> ToolsResult<()>;
}
