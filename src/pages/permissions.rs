use dioxus::prelude::*;
use peerscope_ui::PermissionsStatus;

#[component]
pub fn Permissions() -> Element {
    rsx! {
        section { class: "page",
            h1 { class: "page-title", "Permissions" }
            PermissionsStatus {}
        }
    }
}
