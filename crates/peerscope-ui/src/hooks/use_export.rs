//! Log and data directory export through the share action.

use dioxus::prelude::*;
use peerscope_core::{
    export_data_directory, export_logs, ExportKind, ExportOutcome, ToolsError, ToolsResult,
};

use crate::context::{use_instance, use_tools};

/// Progress and outcome of the latest export.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExportStatus {
    pub is_exporting: bool,
    pub error: Option<String>,
    /// Cleanup problem after a successful share
    pub warning: Option<String>,
    pub last_file: Option<String>,
}

impl ExportStatus {
    /// Enter the exporting state. Returns false if one is already running.
    pub fn start(&mut self) -> bool {
        if self.is_exporting {
            return false;
        }
        self.is_exporting = true;
        self.error = None;
        self.warning = None;
        true
    }

    pub fn record(&mut self, outcome: ToolsResult<ExportOutcome>) {
        self.is_exporting = false;
        match outcome {
            Ok(outcome) => {
                tracing::info!(file = %outcome.file_name, bytes = outcome.bytes, "Export shared");
                self.error = None;
                self.warning = outcome.cleanup_warning;
                self.last_file = Some(outcome.file_name);
            }
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                self.error = Some(e.to_string());
                self.warning = None;
            }
        }
    }
}

/// Export state plus the action that starts it.
#[derive(Clone, Copy)]
pub struct InstanceExport {
    pub status: Signal<ExportStatus>,
    pub run: Callback<()>,
}

/// Share the SDK log file.
pub fn use_log_export() -> InstanceExport {
    use_instance_export(ExportKind::Logs)
}

/// Share a zip of the SDK persistence directory.
pub fn use_data_directory_export() -> InstanceExport {
    use_instance_export(ExportKind::DataDirectory)
}

fn use_instance_export(kind: ExportKind) -> InstanceExport {
    let tools = use_tools();
    let handle = use_instance();
    let mut status = use_signal(ExportStatus::default);

    let run = use_callback(move |_: ()| {
        let Some(instance) = handle.instance.peek().clone() else {
            status.write().record(Err(ToolsError::NotInitialized));
            return;
        };
        if !status.write().start() {
            return;
        }
        let share = tools.share.clone();
        let dir = tools.export_dir(instance.as_ref());

        spawn(async move {
            let outcome = match kind {
                ExportKind::Logs => export_logs(instance.as_ref(), share.as_ref(), &dir).await,
                ExportKind::DataDirectory => {
                    export_data_directory(instance.as_ref(), share.as_ref(), &dir).await
                }
                ExportKind::QueryResults => Err(ToolsError::NoResults),
            };
            status.write().record(outcome);
        });
    });

    InstanceExport { status, run }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn outcome(warning: Option<&str>) -> ExportOutcome {
        ExportOutcome {
            kind: ExportKind::Logs,
            file_name: "store-logs-2024.json".to_string(),
            path: PathBuf::from("/tmp/store-logs-2024.json"),
            bytes: 16,
            cleanup_warning: warning.map(str::to_string),
        }
    }

    #[test]
    fn start_rejects_second_export() {
        let mut status = ExportStatus::default();
        assert!(status.start());
        assert!(!status.start());
        assert!(status.is_exporting);
    }

    #[test]
    fn success_keeps_cleanup_warning() {
        let mut status = ExportStatus::default();
        status.start();
        status.record(Ok(outcome(Some("could not delete"))));
        assert!(!status.is_exporting);
        assert!(status.error.is_none());
        assert_eq!(status.warning.as_deref(), Some("could not delete"));
        assert_eq!(
            status.last_file.as_deref(),
            Some("store-logs-2024.json")
        );
    }

    #[test]
    fn failure_clears_exporting() {
        let mut status = ExportStatus::default();
        status.start();
        status.record(Err(ToolsError::Export("No logs were exported".into())));
        assert!(!status.is_exporting);
        assert!(status.error.unwrap().contains("No logs were exported"));
    }
}
