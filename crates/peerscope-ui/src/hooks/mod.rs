//! Hooks over the `peerscope-core` pipelines.
//!
//! Each hook reads the shared instance from [`crate::use_instance`] and
//! waits for it when it is not ready yet.

mod use_disk_usage;
mod use_export;
mod use_peers;
mod use_permissions;
mod use_query_execution;
mod use_sync_controls;
mod use_system_settings;

pub use use_disk_usage::*;
pub use use_export::*;
pub use use_peers::*;
pub use use_permissions::*;
pub use use_query_execution::*;
pub use use_sync_controls::*;
pub use use_system_settings::*;
