//! Export pipeline: materialize, share, clean up.
//!
//! Every export follows the same four steps:
//!
//! 1. resolve a writable directory, creating it if absent
//! 2. materialize the content to a timestamped file
//! 3. invoke the platform share action with that file
//! 4. delete the file
//!
//! A failure in step 2 aborts before anything is shared or deleted. Step 4
//! only runs once step 3 has returned. A failed deletion never turns a
//! successful export into an error; it is reported through
//! [`ExportOutcome::cleanup_warning`] instead.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{ToolsError, ToolsResult};
use crate::instance::{ShareRequest, ShareSink, SyncInstance};
use crate::query::QueryExecutionResult;

/// What is being exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    QueryResults,
    Logs,
    DataDirectory,
}

impl ExportKind {
    fn file_stem(&self) -> &'static str {
        match self {
            ExportKind::QueryResults => "query-results",
            ExportKind::Logs => "store-logs",
            ExportKind::DataDirectory => "store-data",
        }
    }

    fn extension(&self) -> &'static str {
        match self {
            ExportKind::QueryResults | ExportKind::Logs => "json",
            ExportKind::DataDirectory => "zip",
        }
    }

    /// Message passed along with the share request
    pub fn share_message(&self) -> &'static str {
        match self {
            ExportKind::QueryResults => "Query results export",
            ExportKind::Logs => "Store logs export",
            ExportKind::DataDirectory => "Store data directory export",
        }
    }

    /// `<stem>-<timestamp>.<ext>`
    pub fn file_name(&self, at: DateTime<Utc>) -> String {
        format!("{}-{}.{}", self.file_stem(), export_timestamp(at), self.extension())
    }
}

/// Successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub kind: ExportKind,
    pub file_name: String,
    pub path: PathBuf,
    pub bytes: u64,
    /// Set when the temporary file could not be deleted
    pub cleanup_warning: Option<String>,
}

/// ISO-8601 UTC timestamp safe for file names (`:` and `.` become `-`).
pub fn export_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
}

/// Writable directory next to the SDK's persistence directory.
pub fn instance_export_dir(instance: &dyn SyncInstance) -> PathBuf {
    let persistence = instance.persistence_directory();
    persistence
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or(persistence)
}

/// Create `dir` if it does not exist yet.
pub async fn ensure_dir(dir: &Path) -> ToolsResult<()> {
    if tokio::fs::try_exists(dir).await.unwrap_or(false) {
        return Ok(());
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| ToolsError::Export(format!("Failed to create directory: {}", e)))
}

/// Delete an export artifact. Already gone counts as success.
pub async fn remove_artifact(path: &Path) -> ToolsResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(ToolsError::Cleanup {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Serialize `results` to JSON and share it.
pub async fn export_results(
    results: Option<&QueryExecutionResult>,
    sink: &dyn ShareSink,
    dir: &Path,
) -> ToolsResult<ExportOutcome> {
    let results = results.ok_or(ToolsError::NoResults)?;
    let kind = ExportKind::QueryResults;

    ensure_dir(dir).await?;
    let file_name = kind.file_name(Utc::now());
    let path = dir.join(&file_name);

    let body = serde_json::to_string_pretty(&results.to_export_json())?;
    tokio::fs::write(&path, body.as_bytes())
        .await
        .map_err(|e| ToolsError::Export(format!("Failed to write {}: {}", file_name, e)))?;

    tracing::info!(path = %path.display(), items = results.total_count(), "Query results written");
    share_then_cleanup(kind, sink, path, file_name, body.len() as u64).await
}

/// Have the SDK write its log to a file and share it.
pub async fn export_logs(
    instance: &dyn SyncInstance,
    sink: &dyn ShareSink,
    dir: &Path,
) -> ToolsResult<ExportOutcome> {
    let kind = ExportKind::Logs;

    ensure_dir(dir).await?;
    let file_name = kind.file_name(Utc::now());
    let path = dir.join(&file_name);

    let bytes = instance
        .export_logs(&path)
        .await
        .map_err(|e| ToolsError::Export(format!("Failed to export logs: {}", e)))?;
    if bytes == 0 {
        return Err(ToolsError::Export(
            "Failed to export logs: No logs were exported".to_string(),
        ));
    }

    tracing::info!(path = %path.display(), bytes, "Logs written");
    share_then_cleanup(kind, sink, path, file_name, bytes).await
}

/// Zip the SDK's persistence directory and share the archive.
pub async fn export_data_directory(
    instance: &dyn SyncInstance,
    sink: &dyn ShareSink,
    dir: &Path,
) -> ToolsResult<ExportOutcome> {
    let kind = ExportKind::DataDirectory;

    ensure_dir(dir).await?;
    let file_name = kind.file_name(Utc::now());
    let path = dir.join(&file_name);
    let source = instance.persistence_directory();

    tracing::info!(source = %source.display(), output = %path.display(), "Zipping data directory");

    // Large databases take a while; keep it off the async workers
    let archive_path = path.clone();
    let bytes = tokio::task::spawn_blocking(move || zip_directory(&source, &archive_path))
        .await
        .map_err(|e| ToolsError::Export(format!("Failed to export data directory: {}", e)))?
        .map_err(|e| ToolsError::Export(format!("Failed to export data directory: {}", e)))?;

    share_then_cleanup(kind, sink, path, file_name, bytes).await
}

/// Recursively archive `source` into a zip at `dest`, returning its size.
pub fn zip_directory(source: &Path, dest: &Path) -> ToolsResult<u64> {
    let file = File::create(dest)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(source).follow_links(false) {
        let entry = entry.map_err(io::Error::from)?;
        let path = entry.path();
        if path == dest {
            continue;
        }
        let Ok(relative) = path.strip_prefix(source) else {
            continue;
        };
        if relative.as_os_str().is_empty() {
            continue;
        }

        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if entry.file_type().is_dir() {
            zip.add_directory(name, options)?;
        } else if entry.file_type().is_file() {
            zip.start_file(name, options)?;
            let mut input = File::open(path)?;
            io::copy(&mut input, &mut zip)?;
        }
    }

    zip.finish()?;
    Ok(std::fs::metadata(dest)?.len())
}

async fn share_then_cleanup(
    kind: ExportKind,
    sink: &dyn ShareSink,
    path: PathBuf,
    file_name: String,
    bytes: u64,
) -> ToolsResult<ExportOutcome> {
    let request = ShareRequest {
        path: path.clone(),
        title: file_name.clone(),
        message: kind.share_message().to_string(),
    };
    let shared = sink.share(&request).await;

    let cleanup_warning = match remove_artifact(&path).await {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "Temp export file cleaned up");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to clean up export file");
            Some(format!(
                "Warning: Could not delete temporary file {}. You may need to manually clean it up to free disk space.",
                file_name
            ))
        }
    };

    shared.map_err(|e| ToolsError::Export(format!("Failed to share {}: {}", file_name, e)))?;

    Ok(ExportOutcome {
        kind,
        file_name,
        path,
        bytes,
        cleanup_warning,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_is_filename_safe() {
        let at = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(export_timestamp(at), "2026-03-04T05-06-07-000Z");
        assert_eq!(
            ExportKind::DataDirectory.file_name(at),
            "store-data-2026-03-04T05-06-07-000Z.zip"
        );
    }

    #[tokio::test]
    async fn test_cleanup_twice_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query-results.json");
        std::fs::write(&path, b"{}").unwrap();

        remove_artifact(&path).await.unwrap();
        remove_artifact(&path).await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_ensure_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
        ensure_dir(&nested).await.unwrap();
    }

    #[test]
    fn test_zip_directory_includes_nested_files() {
        let src = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(src.path().join("store")).unwrap();
        std::fs::write(src.path().join("store").join("data.db"), b"rows").unwrap();
        std::fs::write(src.path().join("lock"), b"").unwrap();

        let out = tempfile::tempdir().unwrap();
        let dest = out.path().join("data.zip");
        let size = zip_directory(src.path(), &dest).unwrap();
        assert!(size > 0);

        let archive = zip::ZipArchive::new(File::open(&dest).unwrap()).unwrap();
        let names: Vec<_> = archive.file_names().map(String::from).collect();
        assert!(names.iter().any(|n| n == "store/data.db"));
        assert!(names.iter().any(|n| n == "lock"));
    }
}
