//! App chrome around the toolkit screens.

mod nav_header;
mod shell;

pub use nav_header::NavHeader;
pub use shell::Shell;
