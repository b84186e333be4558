use dioxus::prelude::*;
use peerscope_ui::PeersList;

#[component]
pub fn Peers() -> Element {
    rsx! {
        section { class: "page",
            h1 { class: "page-title", "Peers" }
            p { class: "page-hint", "Peers discovered by the local store. Updates are throttled so bursts of presence changes do not flood the list." }
            PeersList {}
        }
    }
}
