//! Disk usage types
//!
//! The store SDK publishes per-device disk usage in its `__small_peer_info`
//! system collection. Field names below match that document.

use serde::{Deserialize, Serialize};

/// Raw byte counts from `device_disk_usage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DiskUsageData {
    #[serde(default)]
    pub device_available: u64,
    #[serde(default)]
    pub device_total: u64,
    #[serde(default)]
    pub ditto_attachments: u64,
    #[serde(default)]
    pub ditto_auth: u64,
    #[serde(default)]
    pub ditto_replication: u64,
    #[serde(default)]
    pub ditto_store: u64,
    #[serde(default)]
    pub ditto_total: u64,
}

/// One line of the disk usage breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskUsageItem {
    pub key: &'static str,
    pub size: u64,
    pub formatted_size: String,
}

impl DiskUsageData {
    /// Store components sorted by size, largest first.
    pub fn items(&self) -> Vec<DiskUsageItem> {
        let mut items: Vec<DiskUsageItem> = [
            ("ditto_store", self.ditto_store),
            ("ditto_replication", self.ditto_replication),
            ("ditto_attachments", self.ditto_attachments),
            ("ditto_auth", self.ditto_auth),
        ]
        .into_iter()
        .map(|(key, size)| DiskUsageItem {
            key,
            size,
            formatted_size: format_bytes(size),
        })
        .collect();

        // Stable sort keeps the declared order for equal sizes
        items.sort_by(|a, b| b.size.cmp(&a.size));
        items
    }
}

/// Disk usage for the local device.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiskUsageInfo {
    pub device_name: String,
    pub disk_usage: Option<DiskUsageData>,
    /// Timestamp string exactly as the SDK reported it
    pub last_updated_at: Option<String>,
}

/// Format a byte count with 1024-based units and at most one decimal.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{} {}", rounded as u64, UNITS[unit])
    } else {
        format!("{:.1} {}", rounded, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3 GB");
        // Stays in GB past the largest unit
        assert_eq!(format_bytes(2048 * 1024 * 1024 * 1024), "2048 GB");
    }

    #[test]
    fn test_items_sorted_by_size_descending() {
        let data = DiskUsageData {
            ditto_store: 10,
            ditto_replication: 300,
            ditto_attachments: 20,
            ditto_auth: 0,
            ..Default::default()
        };
        let keys: Vec<_> = data.items().iter().map(|i| i.key).collect();
        assert_eq!(
            keys,
            vec!["ditto_replication", "ditto_attachments", "ditto_store", "ditto_auth"]
        );
    }

    #[test]
    fn test_deserialize_partial_usage() {
        let data: DiskUsageData =
            serde_json::from_value(serde_json::json!({ "ditto_store": 4096 })).unwrap();
        assert_eq!(data.ditto_store, 4096);
        assert_eq!(data.ditto_total, 0);
    }
}
