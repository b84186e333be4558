//! Live peer list screen.

use dioxus::prelude::*;
use peerscope_core::{build_peer_list, peer_count_label, PeerViewModel};

use crate::components::{Loading, Notice, NoticeKind, PeerItem};
use crate::hooks::use_peers;

/// Throttled list of the local device and every remote peer.
#[component]
pub fn PeersList() -> Element {
    let state = use_peers();

    let local = use_memo(move || state.read().local_peer.as_ref().map(PeerViewModel::build));
    let peers = use_memo(move || build_peer_list(&state.read().peers));

    let view = state.read();
    if view.is_loading {
        return rsx! { Loading { label: "Waiting for presence..." } };
    }

    let count_label = peer_count_label(peers.read().len());

    rsx! {
        div { class: "peers-list",
            if let Some(error) = view.error.clone() {
                Notice { kind: NoticeKind::Error, message: error }
            }

            if let Some(local) = local() {
                section { class: "peers-local",
                    h3 { class: "section-title", "Local Peer" }
                    PeerItem { peer: local, is_local: true }
                }
            }

            section { class: "peers-remote",
                h3 { class: "section-title",
                    "Remote Peers"
                    span { class: "peer-count-badge", "{count_label}" }
                }
                if peers.read().is_empty() {
                    div { class: "empty-state",
                        p { "No peers connected" }
                        p { class: "hint", "Peers appear here as soon as they are discovered" }
                    }
                } else {
                    for peer in peers.read().iter().cloned() {
                        PeerItem { key: "{peer.key}", peer }
                    }
                }
            }
        }
    }
}
