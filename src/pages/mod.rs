//! Page components for peerscope.

mod disk;
mod exports;
mod home;
mod peers;
mod permissions;
mod query;
mod settings;
mod sync_status;

pub use disk::Disk;
pub use exports::Exports;
pub use home::Home;
pub use peers::Peers;
pub use permissions::Permissions;
pub use query::Query;
pub use settings::Settings;
pub use sync_status::SyncStatus;
