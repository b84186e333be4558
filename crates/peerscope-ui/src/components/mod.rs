//! Screens and building blocks for the diagnostics UI.
//!
//! Components read state through the hooks in [`crate::hooks`] and use the
//! CSS classes from the host app's stylesheet.

mod button;
mod disk_usage;
mod export_panel;
mod notice;
mod peer_item;
mod peers_list;
mod permissions_status;
mod query_editor;
mod sync_controls;
mod system_settings;

pub use button::*;
pub use disk_usage::*;
pub use export_panel::*;
pub use notice::*;
pub use peer_item::*;
pub use peers_list::*;
pub use permissions_status::*;
pub use query_editor::*;
pub use sync_controls::*;
pub use system_settings::*;
