//! Inline status banners.

use dioxus::prelude::*;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NoticeKind {
    Error,
    Warning,
    Info,
}

impl NoticeKind {
    pub fn class(&self) -> &'static str {
        match self {
            NoticeKind::Error => "notice notice-error",
            NoticeKind::Warning => "notice notice-warning",
            NoticeKind::Info => "notice notice-info",
        }
    }
}

/// One-line banner
#[component]
pub fn Notice(kind: NoticeKind, message: String) -> Element {
    rsx! {
        div { class: kind.class(), role: "status", "{message}" }
    }
}

/// Loading indicator with a label
#[component]
pub fn Loading(label: String) -> Element {
    rsx! {
        div { class: "loading",
            span { class: "spinner" }
            span { class: "loading-label", "{label}" }
        }
    }
}
