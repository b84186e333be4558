//! Layout shared by every route.

use dioxus::prelude::*;
use peerscope_core::InstanceState;
use peerscope_ui::{use_instance, Button, ButtonVariant, Notice, NoticeKind};

use crate::app::Route;
use crate::components::NavHeader;

#[component]
pub fn Shell() -> Element {
    let handle = use_instance();
    let state = handle.state.read().clone();

    rsx! {
        div { class: "app-shell",
            NavHeader {}

            match state {
                InstanceState::Uninitialized | InstanceState::Initializing => rsx! {
                    Notice { kind: NoticeKind::Info, message: "Starting store instance..." }
                },
                InstanceState::Failed(error) => rsx! {
                    div { class: "instance-failed",
                        Notice { kind: NoticeKind::Error, message: "Store failed to start: {error}" }
                        Button {
                            variant: ButtonVariant::Ghost,
                            onclick: move |_| handle.retry(),
                            "Retry"
                        }
                    }
                },
                InstanceState::Ready => rsx! {},
            }

            main { class: "app-content",
                Outlet::<Route> {}
            }
        }
    }
}
