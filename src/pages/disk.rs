use dioxus::prelude::*;
use peerscope_ui::DiskUsage;

#[component]
pub fn Disk() -> Element {
    rsx! {
        section { class: "page",
            h1 { class: "page-title", "Disk Usage" }
            DiskUsage {}
        }
    }
}
