//! Local disk usage from the `__small_peer_info` system collection

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ToolsResult;
use crate::instance::Store;
use crate::query::{run_query, QueryExecutionResult};
use crate::types::{DiskUsageData, DiskUsageInfo};
use crate::view_model::UNKNOWN_DEVICE;

/// Statement reading the local peer info document
pub const SMALL_PEER_INFO_QUERY: &str = "SELECT * FROM __small_peer_info";

/// How often the disk usage screen refreshes
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct SmallPeerInfo {
    #[serde(default)]
    device_name: Option<String>,
    #[serde(default)]
    device_disk_usage: Option<DiskUsageData>,
    #[serde(default)]
    last_updated_at: Option<Value>,
}

/// Parse one `__small_peer_info` document.
pub fn parse_small_peer_info(doc: Value) -> ToolsResult<DiskUsageInfo> {
    let info: SmallPeerInfo = serde_json::from_value(doc)?;
    let last_updated_at = info.last_updated_at.map(|v| match v {
        Value::String(s) => s,
        other => other.to_string(),
    });
    Ok(DiskUsageInfo {
        device_name: info
            .device_name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_DEVICE.to_string()),
        disk_usage: info.device_disk_usage,
        last_updated_at,
    })
}

/// Read disk usage for the local device.
///
/// `Ok(None)` when the SDK has not written its peer info document yet.
pub async fn fetch_disk_usage(store: &dyn Store) -> ToolsResult<Option<DiskUsageInfo>> {
    let output = run_query(store, SMALL_PEER_INFO_QUERY).await?;
    let QueryExecutionResult::Read { items, .. } = output.result else {
        return Ok(None);
    };
    match items.into_iter().next() {
        Some(doc) => parse_small_peer_info(doc).map(Some),
        None => {
            tracing::debug!("No small peer info document yet");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_document() {
        let info = parse_small_peer_info(json!({
            "_id": "local",
            "device_name": "Pixel 8",
            "device_disk_usage": { "ditto_store": 2048, "ditto_total": 4096 },
            "last_updated_at": "2026-01-02T03:04:05Z"
        }))
        .unwrap();
        assert_eq!(info.device_name, "Pixel 8");
        assert_eq!(info.disk_usage.map(|d| d.ditto_store), Some(2048));
        assert_eq!(info.last_updated_at.as_deref(), Some("2026-01-02T03:04:05Z"));
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let info = parse_small_peer_info(json!({ "last_updated_at": 1700000000 })).unwrap();
        assert_eq!(info.device_name, UNKNOWN_DEVICE);
        assert!(info.disk_usage.is_none());
        assert_eq!(info.last_updated_at.as_deref(), Some("1700000000"));
    }
}
