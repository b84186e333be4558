//! One peer card.

use dioxus::prelude::*;
use peerscope_core::PeerViewModel;

#[derive(Props, Clone, PartialEq)]
pub struct PeerItemProps {
    pub peer: PeerViewModel,
    /// Highlights the local device
    #[props(default = false)]
    pub is_local: bool,
}

/// Device name, short key, SDK version, cloud badge and connection lines.
///
/// The full key is available as the tooltip of the short one.
#[component]
pub fn PeerItem(props: PeerItemProps) -> Element {
    let peer = &props.peer;
    let card_class = if props.is_local { "peer-card local" } else { "peer-card" };
    let total = peer.connections.total_label();
    let lines: Vec<String> = peer.connections.lines.iter().map(|l| l.label()).collect();

    rsx! {
        div { class: card_class,
            header { class: "peer-card-header",
                span { class: "peer-name", "{peer.device_label}" }
                if props.is_local {
                    span { class: "peer-badge", "this device" }
                }
                if peer.is_cloud_connected {
                    span { class: "peer-badge cloud", "cloud" }
                }
            }

            div { class: "peer-meta",
                span { class: "peer-id", title: "{peer.full_id}", "{peer.short_id}" }
                span { class: "peer-sdk", "SDK {peer.sdk_version}" }
            }

            div { class: "peer-connections",
                span { class: "peer-connection-total", "{total}" }
                ul {
                    for (i, line) in lines.into_iter().enumerate() {
                        li { key: "{i}", class: "peer-connection", "{line}" }
                    }
                }
            }
        }
    }
}
