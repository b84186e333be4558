//! Overview page.

use dioxus::prelude::*;
use peerscope_core::{peer_count_label, InstanceState};
use peerscope_ui::{use_instance, use_peers, use_tools};

use crate::app::Route;

fn state_label(state: &InstanceState) -> &'static str {
    match state {
        InstanceState::Uninitialized => "not started",
        InstanceState::Initializing => "starting",
        InstanceState::Ready => "ready",
        InstanceState::Failed(_) => "failed",
    }
}

#[component]
pub fn Home() -> Element {
    let tools = use_tools();
    let handle = use_instance();
    let peers = use_peers();

    let state = state_label(&handle.state.read());
    let peer_summary = if peers.read().is_loading {
        "waiting for presence".to_string()
    } else {
        peer_count_label(peers.read().peer_count())
    };
    let throttle = tools.config.throttle_window_ms;
    let leases = tools.manager.lease_count();
    let retries = tools.manager.retry_count();

    rsx! {
        section { class: "page",
            h1 { class: "page-title", "Overview" }
            dl { class: "overview",
                dt { "Store instance" }
                dd { "{state} ({leases} lease(s), {retries} retries)" }
                dt { "Presence" }
                dd { "{peer_summary}" }
                dt { "Update throttle" }
                dd { "{throttle} ms" }
            }
            div { class: "overview-links",
                Link { class: "btn btn-primary", to: Route::Peers {}, "View Peers" }
                Link { class: "btn btn-ghost", to: Route::Query {}, "Open Query Editor" }
            }
        }
    }
}
