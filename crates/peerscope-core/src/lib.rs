//! peerscope Core Library
//!
//! Developer tooling pipelines over a peer-to-peer store SDK.
//!
//! ## Overview
//!
//! peerscope is a diagnostics toolkit for apps built on an embedded,
//! syncing document store. It watches the live presence graph, runs ad-hoc
//! DQL statements, shows system settings and disk usage, toggles sync
//! transports, and exports results, logs and the raw data directory through
//! the platform share action.
//!
//! ## Core Principles
//!
//! - **SDK behind traits**: everything reaches the store through
//!   [`instance::SyncInstance`], so the pipelines run unchanged against an
//!   SDK binding or [`sim::SimulatedInstance`]
//! - **Errors are state**: failures end up in typed state for the UI to
//!   render, never in a panic
//! - **Bounded update rate**: presence bursts are throttled before they
//!   reach the render layer
//!
//! ## Quick Start
//!
//! ```ignore
//! use peerscope_core::{run_query, PresenceFeed, SimulatedInstance, DEFAULT_THROTTLE_WINDOW};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sim = SimulatedInstance::new();
//!
//!     let feed = PresenceFeed::start(&sim, DEFAULT_THROTTLE_WINDOW);
//!     println!("{} peers", feed.state().peer_count());
//!
//!     let output = run_query(sim.store(), "SELECT * FROM cars").await?;
//!     println!("{} documents", output.result.total_count());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod disk_usage;
pub mod error;
pub mod export;
pub mod instance;
pub mod logging;
pub mod manager;
pub mod observer;
pub mod permissions;
pub mod presence;
pub mod query;
pub mod settings;
#[cfg(feature = "sim")]
pub mod sim;
pub mod sync_controls;
pub mod throttle;
pub mod types;
pub mod view_model;

// Re-exports
pub use config::ToolsConfig;
pub use disk_usage::{fetch_disk_usage, DEFAULT_REFRESH_INTERVAL, SMALL_PEER_INFO_QUERY};
pub use error::{ToolsError, ToolsResult};
pub use export::{
    export_data_directory, export_logs, export_results, instance_export_dir, ExportKind,
    ExportOutcome,
};
pub use instance::{
    Presence, PresenceObserver, QueryResult, QueryResultItem, ShareRequest, ShareSink, Store,
    SyncInstance,
};
pub use manager::{InstanceLease, InstanceManager, InstanceState};
pub use observer::{ObserverSlot, PresenceSubscription, SubscribeOutcome};
pub use permissions::{
    request_permissions, Permission, PermissionProvider, PermissionReport, PermissionStatus,
};
pub use presence::{PresenceFeed, ViewPeerState, DEFAULT_THROTTLE_WINDOW};
pub use query::{run_query, QueryExecutionResult, QueryOutput, QueryPhase, QueryPipeline};
pub use settings::{
    aggregate_settings, fetch_settings, filter_settings, SettingsSearch, SettingsSnapshot,
    SEARCH_DEBOUNCE,
};
#[cfg(feature = "sim")]
pub use sim::{RecordingShareSink, SimulatedInstance};
pub use sync_controls::SyncControls;
pub use throttle::{Debouncer, Offer, ThrottleWindow};
pub use types::*;
pub use view_model::{
    build_peer_list, peer_count_label, ConnectionLine, ConnectionSummary, PeerViewModel,
};
