//! peerscope UI Toolkit
//!
//! Dioxus hooks and components that put the `peerscope-core` pipelines on
//! screen.
//!
//! ## Wiring
//!
//! The host app provides a [`ToolsContext`] once and calls
//! [`use_instance_provider`] near the root. Every hook below it then reads
//! the shared instance from context:
//!
//! ```rust,ignore
//! #[component]
//! fn App() -> Element {
//!     use_context_provider(|| tools.clone());
//!     use_instance_provider();
//!     rsx! { PeersList {} }
//! }
//! ```
//!
//! Hooks own their background work through Dioxus scope tasks, so unmounting
//! a screen stops its observers, polls and debounce timers.

pub mod components;
pub mod context;
pub mod hooks;

pub use components::*;
pub use context::*;
pub use hooks::*;
