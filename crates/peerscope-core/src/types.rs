//! Core types for peerscope
//!
//! Plain data: presence snapshots, settings, disk usage and transport
//! options. None of these types talk to the store SDK themselves.

pub mod disk;
pub mod peer;
pub mod setting;
pub mod transport;

pub use disk::{format_bytes, DiskUsageData, DiskUsageInfo, DiskUsageItem};
pub use peer::{Connection, Connections, Peer, PresenceSnapshot};
pub use setting::{SettingValue, SystemSetting};
pub use transport::{Platform, TransportConfig, TransportOptions};
