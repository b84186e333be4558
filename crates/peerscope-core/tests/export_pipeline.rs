//! Export pipeline tests
//!
//! Every export must hand the share action a complete file and leave
//! nothing behind afterwards, or say so.

use std::io::{Cursor, Read};

use peerscope_core::{
    export_data_directory, export_logs, export_results, instance_export_dir, run_query,
    ExportKind, RecordingShareSink, SimulatedInstance, SyncInstance, ToolsError,
};
use serde_json::{json, Value};
use tempfile::TempDir;

fn sim_with_cars() -> SimulatedInstance {
    let sim = SimulatedInstance::new();
    sim.seed_documents(
        "cars",
        vec![
            json!({ "_id": "c1", "make": "Volvo" }),
            json!({ "_id": "c2", "make": "Saab", "nested": { "a": [1, 2, 3] } }),
        ],
    );
    sim
}

fn files_in(dir: &std::path::Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

// ============================================================================
// Query results
// ============================================================================

#[tokio::test]
async fn test_results_export_round_trips_and_cleans_up() {
    let sim = sim_with_cars();
    let temp = TempDir::new().unwrap();
    let sink = RecordingShareSink::new();

    let output = run_query(sim.store(), "SELECT * FROM cars").await.unwrap();
    let outcome = export_results(Some(&output.result), &sink, temp.path())
        .await
        .unwrap();

    assert_eq!(outcome.kind, ExportKind::QueryResults);
    assert!(outcome.file_name.starts_with("query-results-"));
    assert!(outcome.file_name.ends_with(".json"));
    assert!(outcome.cleanup_warning.is_none());
    assert!(!outcome.path.exists());
    assert!(files_in(temp.path()).is_empty());

    let shared: Value = serde_json::from_slice(&sink.contents()[0]).unwrap();
    assert_eq!(shared["type"], "query");
    assert_eq!(shared["totalCount"], 2);
    assert_eq!(shared["items"], Value::Array(sim.documents("cars")));

    let request = &sink.requests()[0];
    assert_eq!(request.title, outcome.file_name);
    assert_eq!(request.path, outcome.path);
}

#[tokio::test]
async fn test_mutation_export_layout() {
    let sim = SimulatedInstance::new();
    let temp = TempDir::new().unwrap();
    let sink = RecordingShareSink::new();

    let output = run_query(sim.store(), r#"INSERT INTO c DOCUMENTS ({"_id": "x"})"#)
        .await
        .unwrap();
    export_results(Some(&output.result), &sink, temp.path())
        .await
        .unwrap();

    let shared: Value = serde_json::from_slice(&sink.contents()[0]).unwrap();
    assert_eq!(shared["type"], "mutation");
    assert_eq!(shared["mutatedDocumentIDs"], json!(["x"]));
    assert_eq!(shared["totalMutated"], 1);
    assert_eq!(shared["commitID"], "1");
}

#[tokio::test]
async fn test_no_results_is_rejected_before_sharing() {
    let temp = TempDir::new().unwrap();
    let sink = RecordingShareSink::new();

    let err = export_results(None, &sink, temp.path()).await.unwrap_err();
    assert!(matches!(err, ToolsError::NoResults));
    assert_eq!(err.to_string(), "No results to export");
    assert!(sink.requests().is_empty());
}

#[tokio::test]
async fn test_missing_export_dir_is_created() {
    let sim = sim_with_cars();
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("exports").join("today");
    let sink = RecordingShareSink::new();

    let output = run_query(sim.store(), "SELECT * FROM cars").await.unwrap();
    export_results(Some(&output.result), &sink, &dir).await.unwrap();
    assert!(dir.is_dir());
}

// ============================================================================
// Cleanup and share failures
// ============================================================================

#[tokio::test]
async fn test_cleanup_failure_is_warning_not_error() {
    let sim = sim_with_cars();
    let temp = TempDir::new().unwrap();
    let sink = RecordingShareSink::pinning_file();

    let output = run_query(sim.store(), "SELECT * FROM cars").await.unwrap();
    let outcome = export_results(Some(&output.result), &sink, temp.path())
        .await
        .unwrap();

    let warning = outcome.cleanup_warning.unwrap();
    assert!(warning.contains(&outcome.file_name));
    assert!(warning.contains("manually clean it up"));
}

#[tokio::test]
async fn test_share_failure_still_deletes_file() {
    let sim = sim_with_cars();
    let temp = TempDir::new().unwrap();
    let sink = RecordingShareSink::failing("share sheet dismissed by system");

    let output = run_query(sim.store(), "SELECT * FROM cars").await.unwrap();
    let err = export_results(Some(&output.result), &sink, temp.path())
        .await
        .unwrap_err();

    assert!(matches!(err, ToolsError::Export(_)));
    assert!(err.to_string().contains("share sheet dismissed"));
    assert_eq!(sink.requests().len(), 1);
    assert!(files_in(temp.path()).is_empty());
}

// ============================================================================
// Logs
// ============================================================================

#[tokio::test]
async fn test_log_export_shares_sdk_log() {
    let temp = TempDir::new().unwrap();
    let log = temp.path().join("session.jsonl");
    std::fs::write(&log, "{\"msg\":\"hello\"}\n").unwrap();

    let sim = SimulatedInstance::with_persistence_dir(temp.path().join("store")).with_log_source(&log);
    let sink = RecordingShareSink::new();
    let dir = instance_export_dir(&sim);
    assert_eq!(dir, temp.path());

    let outcome = export_logs(&sim, &sink, &dir).await.unwrap();
    assert_eq!(outcome.kind, ExportKind::Logs);
    assert!(outcome.file_name.starts_with("store-logs-"));
    assert_eq!(outcome.bytes, 16);
    assert_eq!(sink.contents()[0], b"{\"msg\":\"hello\"}\n".to_vec());
    assert!(!outcome.path.exists());
}

#[tokio::test]
async fn test_empty_log_export_is_error() {
    let temp = TempDir::new().unwrap();
    let sim = SimulatedInstance::with_persistence_dir(temp.path().join("store"));
    let sink = RecordingShareSink::new();

    let err = export_logs(&sim, &sink, temp.path()).await.unwrap_err();
    assert!(err.to_string().contains("No logs were exported"));
    assert!(sink.requests().is_empty());
}

// ============================================================================
// Data directory
// ============================================================================

#[tokio::test]
async fn test_data_directory_archive_contains_store_files() {
    let temp = TempDir::new().unwrap();
    let store = temp.path().join("store");
    std::fs::create_dir_all(store.join("sqlite")).unwrap();
    std::fs::write(store.join("sqlite").join("main.db"), b"pages").unwrap();
    std::fs::write(store.join("site_id"), b"42").unwrap();

    let sim = SimulatedInstance::with_persistence_dir(&store);
    let sink = RecordingShareSink::new();
    let outcome = export_data_directory(&sim, &sink, &instance_export_dir(&sim))
        .await
        .unwrap();

    assert!(outcome.file_name.starts_with("store-data-"));
    assert!(outcome.file_name.ends_with(".zip"));
    assert!(!outcome.path.exists());

    let bytes = sink.contents().remove(0);
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut db = String::new();
    archive
        .by_name("sqlite/main.db")
        .unwrap()
        .read_to_string(&mut db)
        .unwrap();
    assert_eq!(db, "pages");
    assert!(archive.by_name("site_id").is_ok());
}

#[tokio::test]
async fn test_missing_data_directory_fails_export() {
    let temp = TempDir::new().unwrap();
    let sim = SimulatedInstance::with_persistence_dir(temp.path().join("never-created"));
    let sink = RecordingShareSink::new();

    let err = export_data_directory(&sim, &sink, temp.path())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Failed to export data directory"));
    assert!(sink.requests().is_empty());
}
