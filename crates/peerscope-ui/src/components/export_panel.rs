//! Log and data directory export buttons.

use dioxus::prelude::*;

use crate::components::{Button, ButtonVariant, Notice, NoticeKind};
use crate::hooks::{use_data_directory_export, use_log_export, InstanceExport};

#[component]
pub fn ExportPanel() -> Element {
    let logs = use_log_export();
    let data = use_data_directory_export();

    rsx! {
        div { class: "export-panel",
            ExportRow {
                export: logs,
                label: "Export Logs",
                hint: "Share the store log file",
            }
            ExportRow {
                export: data,
                label: "Export Data Directory",
                hint: "Share a zip of the store's files. May be large.",
            }
        }
    }
}

#[derive(Props, Clone, Copy)]
struct ExportRowProps {
    export: InstanceExport,
    label: &'static str,
    hint: &'static str,
}

impl PartialEq for ExportRowProps {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label && self.hint == other.hint
    }
}

#[component]
fn ExportRow(props: ExportRowProps) -> Element {
    let status = props.export.status.read().clone();

    rsx! {
        div { class: "export-row",
            div { class: "export-text",
                span { class: "export-label", "{props.label}" }
                span { class: "hint", "{props.hint}" }
                if let Some(file) = status.last_file.clone() {
                    span { class: "hint", "Last shared: {file}" }
                }
            }
            Button {
                variant: ButtonVariant::Primary,
                busy: status.is_exporting,
                onclick: move |_| props.export.run.call(()),
                "{props.label}"
            }
            if let Some(error) = status.error {
                Notice { kind: NoticeKind::Error, message: error }
            }
            if let Some(warning) = status.warning {
                Notice { kind: NoticeKind::Warning, message: warning }
            }
        }
    }
}
