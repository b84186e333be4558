use dioxus::prelude::*;
use peerscope_ui::QueryEditor;

#[component]
pub fn Query() -> Element {
    rsx! {
        section { class: "page",
            h1 { class: "page-title", "Query Editor" }
            p { class: "page-hint", "Run DQL against the local store. Read results show each document; mutations show the touched IDs." }
            QueryEditor {}
        }
    }
}
