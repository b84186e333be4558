use dioxus::prelude::*;
use peerscope_ui::SystemSettings;

#[component]
pub fn Settings() -> Element {
    rsx! {
        section { class: "page",
            h1 { class: "page-title", "System Settings" }
            SystemSettings {}
        }
    }
}
