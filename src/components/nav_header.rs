//! Top navigation.

use dioxus::prelude::*;

use crate::app::Route;

/// Navigation entries, in display order
fn nav_items() -> [(Route, &'static str); 8] {
    [
        (Route::Home {}, "Overview"),
        (Route::Peers {}, "Peers"),
        (Route::Query {}, "Query"),
        (Route::Settings {}, "Settings"),
        (Route::Disk {}, "Disk"),
        (Route::SyncStatus {}, "Sync"),
        (Route::Exports {}, "Exports"),
        (Route::Permissions {}, "Permissions"),
    ]
}

#[component]
pub fn NavHeader() -> Element {
    rsx! {
        nav { class: "nav-header",
            span { class: "nav-brand", "peerscope" }
            div { class: "nav-links",
                for (route, label) in nav_items() {
                    Link {
                        key: "{label}",
                        class: "nav-link",
                        active_class: "active",
                        to: route,
                        "{label}"
                    }
                }
            }
        }
    }
}
