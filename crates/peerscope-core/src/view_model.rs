//! Display-ready peer shapes
//!
//! Turns raw [`Peer`] snapshots into what the peer list renders. Both shapes
//! of the SDK's connections field end up in the same [`ConnectionSummary`].

use std::collections::{BTreeMap, HashSet};

use crate::types::{Connection, Connections, Peer};

/// Label shown when a peer did not advertise a device name
pub const UNKNOWN_DEVICE: &str = "Unknown Device";

/// Label shown for a missing SDK version or peer key
pub const UNKNOWN: &str = "Unknown";

/// Characters of the peer key kept in the short identifier
const SHORT_ID_LEN: usize = 8;

/// One rendered connection line.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionLine {
    /// A concrete link to another peer
    Link {
        peer_key: String,
        connection_type: String,
        distance_m: Option<f64>,
    },
    /// A per-type tally
    Count { connection_type: String, count: u64 },
}

impl ConnectionLine {
    pub fn label(&self) -> String {
        match self {
            ConnectionLine::Link {
                peer_key,
                connection_type,
                distance_m: Some(d),
            } => format!("{} - {} (~{:.1} m)", peer_key, connection_type, d),
            ConnectionLine::Link {
                peer_key,
                connection_type,
                distance_m: None,
            } => format!("{} - {}", peer_key, connection_type),
            ConnectionLine::Count {
                connection_type,
                count,
            } => format!("{}: {}", connection_type, count),
        }
    }
}

/// Connection totals, independent of which shape the SDK used.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConnectionSummary {
    pub total: u64,
    /// Links per transport type, sorted by type
    pub by_type: BTreeMap<String, u64>,
    pub lines: Vec<ConnectionLine>,
}

impl ConnectionSummary {
    /// Summarize an optional connections field. Absent means zero.
    pub fn from_connections(connections: Option<&Connections>) -> Self {
        match connections {
            None => Self::default(),
            Some(Connections::List(list)) => Self::from_links(list),
            Some(Connections::Counts(counts)) => Self::from_counts(counts),
        }
    }

    fn from_links(links: &[Connection]) -> Self {
        let mut summary = Self::default();
        let mut seen = HashSet::new();
        for link in links {
            // The same link can be reported from both ends
            if !seen.insert(link.link_key()) {
                continue;
            }
            summary.total += 1;
            *summary
                .by_type
                .entry(link.connection_type.clone())
                .or_insert(0) += 1;
            summary.lines.push(ConnectionLine::Link {
                peer_key: link.peer_key_string1.clone(),
                connection_type: link.connection_type.clone(),
                distance_m: link.approximate_distance_m,
            });
        }
        summary
    }

    fn from_counts(counts: &BTreeMap<String, u64>) -> Self {
        let mut summary = Self::default();
        for (connection_type, &count) in counts {
            summary.total += count;
            summary.by_type.insert(connection_type.clone(), count);
            summary.lines.push(ConnectionLine::Count {
                connection_type: connection_type.clone(),
                count,
            });
        }
        summary
    }

    /// "1 connection" / "N connections"
    pub fn total_label(&self) -> String {
        if self.total == 1 {
            "1 connection".to_string()
        } else {
            format!("{} connections", self.total)
        }
    }
}

/// A peer ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct PeerViewModel {
    /// Stable key for list rendering
    pub key: String,
    pub device_label: String,
    pub full_id: String,
    pub short_id: String,
    pub sdk_version: String,
    pub is_cloud_connected: bool,
    pub connections: ConnectionSummary,
}

impl PeerViewModel {
    pub fn build(peer: &Peer) -> Self {
        let device_label = peer
            .device_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(UNKNOWN_DEVICE)
            .to_string();

        let full_id = if peer.peer_key_string.is_empty() {
            UNKNOWN.to_string()
        } else {
            peer.peer_key_string.clone()
        };

        Self {
            key: peer.list_key(),
            device_label,
            short_id: truncate_id(&full_id),
            full_id,
            sdk_version: peer
                .sdk_version
                .clone()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            is_cloud_connected: peer.is_connected_to_cloud,
            connections: ConnectionSummary::from_connections(peer.connections.as_ref()),
        }
    }
}

/// Shorten a peer key for compact display.
pub fn truncate_id(id: &str) -> String {
    if id.chars().count() <= SHORT_ID_LEN {
        id.to_string()
    } else {
        let head: String = id.chars().take(SHORT_ID_LEN).collect();
        format!("{}…", head)
    }
}

/// Build view models for the remote peer list.
///
/// Peers sharing a list key collapse into one entry holding the latest
/// record, at the position of the first occurrence.
pub fn build_peer_list(peers: &[Peer]) -> Vec<PeerViewModel> {
    let mut index: BTreeMap<String, usize> = BTreeMap::new();
    let mut out: Vec<PeerViewModel> = Vec::with_capacity(peers.len());
    for peer in peers {
        let model = PeerViewModel::build(peer);
        match index.get(&model.key) {
            Some(&at) => out[at] = model,
            None => {
                index.insert(model.key.clone(), out.len());
                out.push(model);
            }
        }
    }
    out
}

/// "1 peer found" / "N peers found"
pub fn peer_count_label(count: usize) -> String {
    if count == 1 {
        "1 peer found".to_string()
    } else {
        format!("{} peers found", count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn peer_with(connections: serde_json::Value) -> Peer {
        serde_json::from_value(json!({
            "peerKeyString": "pkAAAABBBBCCCC",
            "connections": connections,
        }))
        .unwrap()
    }

    #[test]
    fn test_both_connection_shapes_summarize_to_one() {
        let list = peer_with(json!([{ "peerKeyString1": "p1", "connectionType": "bluetooth" }]));
        let counts = peer_with(json!({ "bluetooth": 1 }));

        let a = PeerViewModel::build(&list).connections;
        let b = PeerViewModel::build(&counts).connections;
        assert_eq!(a.total, 1);
        assert_eq!(b.total, 1);
        assert_eq!(a.by_type, b.by_type);
        assert_eq!(a.total_label(), "1 connection");
    }

    #[test]
    fn test_absent_and_empty_connections_are_zero() {
        let absent = PeerViewModel::build(&Peer::new("pk1"));
        assert_eq!(absent.connections.total, 0);
        assert!(absent.connections.lines.is_empty());

        let empty = PeerViewModel::build(&peer_with(json!([])));
        assert_eq!(empty.connections.total, 0);
        let empty_map = PeerViewModel::build(&peer_with(json!({})));
        assert_eq!(empty_map.connections.total, 0);
    }

    #[test]
    fn test_duplicate_links_counted_once() {
        let peer = peer_with(json!([
            { "peerKeyString1": "a", "peerKeyString2": "b", "connectionType": "WebSocket" },
            { "peerKeyString1": "b", "peerKeyString2": "a", "connectionType": "WebSocket" },
            { "peerKeyString1": "a", "peerKeyString2": "b", "connectionType": "Bluetooth" }
        ]));
        let summary = PeerViewModel::build(&peer).connections;
        assert_eq!(summary.total, 2);
        assert_eq!(summary.by_type["WebSocket"], 1);
        assert_eq!(summary.by_type["Bluetooth"], 1);
    }

    #[test]
    fn test_labels_fall_back() {
        let model = PeerViewModel::build(&Peer::new(""));
        assert_eq!(model.device_label, UNKNOWN_DEVICE);
        assert_eq!(model.full_id, UNKNOWN);
        assert_eq!(model.sdk_version, UNKNOWN);
        assert!(!model.is_cloud_connected);
    }

    #[test]
    fn test_ids_truncate_for_display() {
        let model = PeerViewModel::build(&Peer::new("pkAAAABBBBCCCC").with_cloud(true));
        assert_eq!(model.full_id, "pkAAAABBBBCCCC");
        assert_eq!(model.short_id, "pkAAAABB…");
        assert!(model.is_cloud_connected);
        assert_eq!(truncate_id("short"), "short");
    }

    #[test]
    fn test_connection_line_labels() {
        let link = ConnectionLine::Link {
            peer_key: "p1".into(),
            connection_type: "Bluetooth".into(),
            distance_m: Some(2.5),
        };
        assert_eq!(link.label(), "p1 - Bluetooth (~2.5 m)");
        let count = ConnectionLine::Count {
            connection_type: "lan".into(),
            count: 3,
        };
        assert_eq!(count.label(), "lan: 3");
    }

    #[test]
    fn test_peer_list_dedupes_by_key_keeping_latest() {
        let peers = vec![
            Peer::new("p1").with_device_name("old"),
            Peer::new("p2"),
            Peer::new("p1").with_device_name("new"),
        ];
        let list = build_peer_list(&peers);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].key, "p1");
        assert_eq!(list[0].device_label, "new");
        assert_eq!(list[1].key, "p2");
    }

    #[test]
    fn test_peer_count_label() {
        assert_eq!(peer_count_label(0), "0 peers found");
        assert_eq!(peer_count_label(1), "1 peer found");
        assert_eq!(peer_count_label(4), "4 peers found");
    }
}
