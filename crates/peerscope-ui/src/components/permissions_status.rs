//! Transport permission summary.

use dioxus::prelude::*;
use peerscope_core::PermissionStatus;

use crate::components::{Button, ButtonVariant, Loading, Notice, NoticeKind};
use crate::hooks::use_permissions;

fn status_label(status: PermissionStatus) -> &'static str {
    match status {
        PermissionStatus::Granted => "granted",
        PermissionStatus::Denied => "denied",
        PermissionStatus::NeverAskAgain => "never ask again",
    }
}

#[component]
pub fn PermissionsStatus() -> Element {
    let permissions = use_permissions();

    let Some(report) = permissions.report.read().clone() else {
        return rsx! { Loading { label: "Requesting permissions..." } };
    };

    let summary = if report.granted {
        "All transport permissions granted".to_string()
    } else {
        format!("{} permission(s) missing", report.missing().len())
    };

    let rows: Vec<(&'static str, &'static str)> = report
        .statuses
        .iter()
        .map(|(permission, status)| (permission.android_name(), status_label(*status)))
        .collect();

    rsx! {
        div { class: "permissions",
            p { class: if report.granted { "permissions-summary ok" } else { "permissions-summary" },
                "{summary}"
            }
            if let Some(error) = report.error.clone() {
                Notice { kind: NoticeKind::Error, message: error }
            }
            ul { class: "permissions-list",
                for (name, status) in rows {
                    li { key: "{name}",
                        span { class: "permission-name", "{name}" }
                        span { class: "permission-status", "{status}" }
                    }
                }
            }
            if !report.granted {
                Button {
                    variant: ButtonVariant::Ghost,
                    onclick: move |_| permissions.request.call(()),
                    "Request Again"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels() {
        assert_eq!(status_label(PermissionStatus::Granted), "granted");
        assert_eq!(status_label(PermissionStatus::NeverAskAgain), "never ask again");
    }
}
