//! Presence graph types
//!
//! These mirror what the store SDK reports through its presence observer.
//! Every value here is an immutable snapshot: a topology change produces a
//! brand new [`PresenceSnapshot`], never an in-place edit.
//!
//! The wire shape follows the SDK's camelCase JSON so snapshots can be fed
//! straight from `serde_json`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One transport link between two peers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// Transport tag (e.g. "Bluetooth", "AccessPoint", "WebSocket")
    #[serde(default)]
    pub connection_type: String,
    /// First endpoint of the link
    #[serde(default)]
    pub peer_key_string1: String,
    /// Second endpoint of the link
    #[serde(default)]
    pub peer_key_string2: String,
    /// Rough distance estimate, when the transport can provide one
    #[serde(default, rename = "approximateDistanceInMeters")]
    pub approximate_distance_m: Option<f64>,
}

impl Connection {
    /// Create a link of the given type between two peers
    pub fn new(
        connection_type: impl Into<String>,
        peer_key_string1: impl Into<String>,
        peer_key_string2: impl Into<String>,
    ) -> Self {
        Self {
            connection_type: connection_type.into(),
            peer_key_string1: peer_key_string1.into(),
            peer_key_string2: peer_key_string2.into(),
            approximate_distance_m: None,
        }
    }

    /// Set the distance estimate
    pub fn with_distance(mut self, meters: f64) -> Self {
        self.approximate_distance_m = Some(meters);
        self
    }

    /// Identity of the link regardless of endpoint order.
    ///
    /// Two records describing the same link from either side compare equal.
    pub fn link_key(&self) -> (String, String, String) {
        let (a, b) = if self.peer_key_string1 <= self.peer_key_string2 {
            (&self.peer_key_string1, &self.peer_key_string2)
        } else {
            (&self.peer_key_string2, &self.peer_key_string1)
        };
        (self.connection_type.clone(), a.clone(), b.clone())
    }
}

/// The connections field comes in two shapes depending on SDK version:
/// a list of link records, or a tally of links per transport type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Connections {
    /// Ordered link records
    List(Vec<Connection>),
    /// Transport type -> number of links
    Counts(BTreeMap<String, u64>),
}

impl Default for Connections {
    fn default() -> Self {
        Connections::List(Vec::new())
    }
}

/// A device in the presence graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Peer {
    /// Stable peer identifier
    #[serde(default)]
    pub peer_key_string: String,
    /// Human-readable device name, if the peer advertised one
    #[serde(default)]
    pub device_name: Option<String>,
    /// SDK version running on the peer
    #[serde(default, alias = "dittoSdkVersion")]
    pub sdk_version: Option<String>,
    /// Whether the peer currently has a cloud connection
    #[serde(default, alias = "isConnectedToDittoCloud")]
    pub is_connected_to_cloud: bool,
    /// Links the peer reports
    #[serde(default)]
    pub connections: Option<Connections>,
}

impl Peer {
    /// Create a peer with only an identifier
    pub fn new(peer_key_string: impl Into<String>) -> Self {
        Self {
            peer_key_string: peer_key_string.into(),
            ..Default::default()
        }
    }

    /// Set the device name
    pub fn with_device_name(mut self, name: impl Into<String>) -> Self {
        self.device_name = Some(name.into());
        self
    }

    /// Set the SDK version
    pub fn with_sdk_version(mut self, version: impl Into<String>) -> Self {
        self.sdk_version = Some(version.into());
        self
    }

    /// Mark the peer as cloud-connected
    pub fn with_cloud(mut self, connected: bool) -> Self {
        self.is_connected_to_cloud = connected;
        self
    }

    /// Set the connections field
    pub fn with_connections(mut self, connections: Connections) -> Self {
        self.connections = Some(connections);
        self
    }

    /// Key used to identify the peer in rendered lists.
    ///
    /// Falls back to the device name when the SDK omits the peer key.
    pub fn list_key(&self) -> String {
        if !self.peer_key_string.is_empty() {
            self.peer_key_string.clone()
        } else {
            self.device_name.clone().unwrap_or_default()
        }
    }
}

/// Everything the presence observer reports in one callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PresenceSnapshot {
    /// This device
    #[serde(default)]
    pub local_peer: Peer,
    /// Every other reachable device, in SDK order
    #[serde(default)]
    pub remote_peers: Vec<Peer>,
}

impl PresenceSnapshot {
    /// Build a snapshot from its parts
    pub fn new(local_peer: Peer, remote_peers: Vec<Peer>) -> Self {
        Self {
            local_peer,
            remote_peers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_connections_list_shape() {
        let value = json!([{ "peerKeyString1": "p1", "connectionType": "bluetooth" }]);
        let connections: Connections = serde_json::from_value(value).unwrap();
        match connections {
            Connections::List(list) => {
                assert_eq!(list.len(), 1);
                assert_eq!(list[0].peer_key_string1, "p1");
                assert_eq!(list[0].peer_key_string2, "");
            }
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_connections_count_shape() {
        let connections: Connections = serde_json::from_value(json!({ "bluetooth": 1 })).unwrap();
        assert!(matches!(connections, Connections::Counts(ref m) if m["bluetooth"] == 1));
    }

    #[test]
    fn test_peer_accepts_sdk_field_names() {
        let peer: Peer = serde_json::from_value(json!({
            "peerKeyString": "pkAbc",
            "deviceName": "iPad",
            "dittoSdkVersion": "4.8.0",
            "isConnectedToDittoCloud": true
        }))
        .unwrap();
        assert_eq!(peer.sdk_version.as_deref(), Some("4.8.0"));
        assert!(peer.is_connected_to_cloud);
        assert!(peer.connections.is_none());
    }

    #[test]
    fn test_link_key_ignores_endpoint_order() {
        let a = Connection::new("Bluetooth", "p1", "p2");
        let b = Connection::new("Bluetooth", "p2", "p1");
        assert_eq!(a.link_key(), b.link_key());
    }

    #[test]
    fn test_list_key_falls_back_to_device_name() {
        let peer = Peer::new("").with_device_name("Pixel");
        assert_eq!(peer.list_key(), "Pixel");
        assert_eq!(Peer::new("pk1").list_key(), "pk1");
    }
}
