use dioxus::prelude::*;
use peerscope_ui::use_instance_provider;

use crate::components::Shell;
use crate::context::{app_settings, tools_context};
use crate::pages::{Disk, Exports, Home, Peers, Permissions, Query, Settings, SyncStatus};
use crate::theme::GLOBAL_STYLES;

/// Application routes.
///
/// Every screen renders inside [`Shell`], which carries the navigation and
/// the instance status banner.
#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Shell)]
        #[route("/")]
        Home {},
        #[route("/peers")]
        Peers {},
        #[route("/query")]
        Query {},
        #[route("/settings")]
        Settings {},
        #[route("/disk")]
        Disk {},
        #[route("/sync")]
        SyncStatus {},
        #[route("/exports")]
        Exports {},
        #[route("/permissions")]
        Permissions {},
}

/// Root application component.
///
/// Provides global styles, the tools context, the instance lease and routing.
#[component]
pub fn App() -> Element {
    use_context_provider(|| tools_context(&app_settings()));
    use_instance_provider();

    rsx! {
        style { {GLOBAL_STYLES} }
        Router::<Route> {}
    }
}
