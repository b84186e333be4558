use dioxus::prelude::*;
use peerscope_ui::SyncControlsPanel;

#[component]
pub fn SyncStatus() -> Element {
    rsx! {
        section { class: "page",
            h1 { class: "page-title", "Sync" }
            p { class: "page-hint", "Changes apply to the running instance immediately." }
            SyncControlsPanel {}
        }
    }
}
