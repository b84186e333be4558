//! Desktop stand-ins for the mobile share sheet and permission prompt.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use peerscope_core::{
    Permission, PermissionProvider, PermissionStatus, ShareRequest, ShareSink, ToolsError,
    ToolsResult,
};
use rfd::FileDialog;

/// Shares by asking where to save a copy of the file.
///
/// Dismissing the dialog counts as a completed share.
pub struct SaveDialogShare;

#[async_trait]
impl ShareSink for SaveDialogShare {
    async fn share(&self, request: &ShareRequest) -> ToolsResult<()> {
        let title = request.message.clone();
        let file_name = request.title.clone();

        // Blocking dialog, kept off the UI thread
        let picked = tokio::task::spawn_blocking(move || {
            FileDialog::new()
                .set_title(&title)
                .set_file_name(&file_name)
                .save_file()
        })
        .await
        .map_err(|e| ToolsError::Export(e.to_string()))?;

        match picked {
            Some(dest) => {
                let bytes = deliver(&request.path, &dest).await?;
                tracing::info!(dest = %dest.display(), bytes, "Export saved");
            }
            None => tracing::info!("Save dialog dismissed"),
        }
        Ok(())
    }
}

/// Copy the export artifact to where the user chose.
async fn deliver(source: &Path, dest: &Path) -> ToolsResult<u64> {
    if source == dest {
        return Ok(tokio::fs::metadata(source).await?.len());
    }
    Ok(tokio::fs::copy(source, dest).await?)
}

/// Desktop transports need no runtime permissions.
pub struct DesktopPermissions;

#[async_trait]
impl PermissionProvider for DesktopPermissions {
    fn supported(&self, _wanted: &[Permission]) -> Vec<Permission> {
        Vec::new()
    }

    async fn request(
        &self,
        permissions: &[Permission],
    ) -> ToolsResult<BTreeMap<Permission, PermissionStatus>> {
        Ok(permissions
            .iter()
            .map(|p| (*p, PermissionStatus::Granted))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peerscope_core::{request_permissions, Platform};

    #[tokio::test]
    async fn deliver_copies_artifact() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("store-logs.json");
        let dest = temp.path().join("saved.json");
        tokio::fs::write(&source, b"{\"msg\":\"hi\"}").await.unwrap();

        assert_eq!(deliver(&source, &dest).await.unwrap(), 12);
        assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"{\"msg\":\"hi\"}");
        assert_eq!(deliver(&source, &source).await.unwrap(), 12);
    }

    #[tokio::test]
    async fn desktop_permissions_are_granted() {
        let report = request_permissions(&DesktopPermissions, Platform::Android).await;
        assert!(report.granted);
        assert!(report.missing().is_empty());
    }
}
