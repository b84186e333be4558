use dioxus::prelude::*;
use peerscope_ui::ExportPanel;

#[component]
pub fn Exports() -> Element {
    rsx! {
        section { class: "page",
            h1 { class: "page-title", "Exports" }
            p { class: "page-hint", "Files are written next to the store, handed to the save dialog, then deleted." }
            ExportPanel {}
        }
    }
}
