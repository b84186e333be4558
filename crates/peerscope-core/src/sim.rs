//! In-memory store SDK instance
//!
//! Backs the desktop app when no SDK binding is linked, and every test in
//! this workspace. It understands just enough DQL to drive the tools:
//!
//! - `SELECT * FROM <collection>`
//! - `INSERT INTO <collection> DOCUMENTS (<json object or array>)`
//! - `DELETE FROM <collection> [WHERE _id = '<id>']`
//! - `SHOW ALL`
//!
//! Failures can be injected for presence registration, queries, sync calls
//! and item dematerialization.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::Rng;
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use crate::error::{ToolsError, ToolsResult};
use crate::instance::{
    Presence, PresenceCallback, PresenceObserver, QueryResult, QueryResultItem, ShareRequest,
    ShareSink, Store, SyncInstance,
};
use crate::logging::copy_log;
use crate::types::{Connection, Connections, Peer, PresenceSnapshot, TransportConfig};

// ============================================================================
// Presence
// ============================================================================

type Observers = Mutex<BTreeMap<u64, Arc<PresenceCallback>>>;

/// Presence graph that fires whatever snapshot is published.
#[derive(Default)]
pub struct SimPresence {
    observers: Arc<Observers>,
    next_id: AtomicU64,
    latest: Mutex<Option<PresenceSnapshot>>,
    fail_next: Mutex<Option<String>>,
}

struct SimObserver {
    id: u64,
    observers: Weak<Observers>,
}

impl PresenceObserver for SimObserver {
    fn stop(&self) {
        if let Some(observers) = self.observers.upgrade() {
            observers.lock().remove(&self.id);
        }
    }
}

impl Presence for SimPresence {
    fn observe(&self, callback: PresenceCallback) -> ToolsResult<Box<dyn PresenceObserver>> {
        if let Some(msg) = self.fail_next.lock().take() {
            return Err(ToolsError::Presence(msg));
        }

        let callback: Arc<PresenceCallback> = Arc::new(callback);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.observers.lock().insert(id, Arc::clone(&callback));

        // New observers see the current graph straight away
        let current = self.latest.lock().clone();
        if let Some(snapshot) = current {
            (**callback)(snapshot);
        }

        Ok(Box::new(SimObserver {
            id,
            observers: Arc::downgrade(&self.observers),
        }))
    }
}

impl SimPresence {
    fn publish(&self, snapshot: PresenceSnapshot) {
        *self.latest.lock() = Some(snapshot.clone());
        // Callbacks run without the lock held so they may stop themselves
        let callbacks: Vec<_> = self.observers.lock().values().cloned().collect();
        for callback in callbacks {
            (**callback)(snapshot.clone());
        }
    }
}

// ============================================================================
// Store
// ============================================================================

struct SimItem {
    value: Value,
    corrupt_json: bool,
    fail_dematerialize: bool,
    dematerialized: Arc<AtomicUsize>,
}

impl QueryResultItem for SimItem {
    fn json_string(&self) -> String {
        if self.corrupt_json {
            format!("{{truncated: {}", self.value)
        } else {
            self.value.to_string()
        }
    }

    fn value(&self) -> Value {
        self.value.clone()
    }

    fn dematerialize(&mut self) -> ToolsResult<()> {
        if self.fail_dematerialize {
            return Err(ToolsError::Query("item already released".to_string()));
        }
        self.dematerialized.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct SimResult {
    items: Vec<Box<dyn QueryResultItem>>,
    mutated: Option<Vec<Value>>,
    commit_id: Option<String>,
}

impl QueryResult for SimResult {
    fn take_items(&mut self) -> Vec<Box<dyn QueryResultItem>> {
        std::mem::take(&mut self.items)
    }

    fn mutated_document_ids(&self) -> Option<Vec<Value>> {
        self.mutated.clone()
    }

    fn commit_id(&self) -> Option<String> {
        self.commit_id.clone()
    }
}

/// Collections of JSON documents keyed by `_id`, in insertion order.
pub struct SimStore {
    collections: Mutex<BTreeMap<String, Vec<Value>>>,
    settings_rows: Mutex<Vec<Value>>,
    small_peer_info: Mutex<Option<Value>>,
    fail_next: Mutex<Option<String>>,
    corrupt_json: AtomicBool,
    fail_dematerialize: AtomicBool,
    dematerialized: Arc<AtomicUsize>,
    executed: AtomicUsize,
    commits: AtomicU64,
}

impl Default for SimStore {
    fn default() -> Self {
        Self {
            collections: Mutex::new(BTreeMap::new()),
            settings_rows: Mutex::new(default_settings_rows()),
            small_peer_info: Mutex::new(Some(default_small_peer_info())),
            fail_next: Mutex::new(None),
            corrupt_json: AtomicBool::new(false),
            fail_dematerialize: AtomicBool::new(false),
            dematerialized: Arc::new(AtomicUsize::new(0)),
            executed: AtomicUsize::new(0),
            commits: AtomicU64::new(0),
        }
    }
}

fn default_settings_rows() -> Vec<Value> {
    vec![
        json!({ "value": { "mesh_chooser_max_active": 4, "transport_ble_enabled": true } }),
        json!({ "key": "log_level", "value": "info" }),
        json!({ "replication_batch_size": 500, "store_path_override": null }),
    ]
}

fn default_small_peer_info() -> Value {
    json!({
        "_id": "local",
        "device_name": "Simulated Device",
        "device_disk_usage": {
            "device_available": 48_318_382_080u64,
            "device_total": 128_849_018_880u64,
            "ditto_attachments": 2_097_152,
            "ditto_auth": 16_384,
            "ditto_replication": 786_432,
            "ditto_store": 5_242_880,
            "ditto_total": 8_152_576
        },
        "last_updated_at": "2026-01-01T00:00:00Z"
    })
}

/// Match a leading keyword case-insensitively, returning the rest.
fn keyword<'a>(input: &'a str, kw: &str) -> Option<&'a str> {
    let head = input.get(..kw.len())?;
    if head.eq_ignore_ascii_case(kw) {
        Some(input[kw.len()..].trim_start())
    } else {
        None
    }
}

/// Split off the leading identifier.
fn identifier(input: &str) -> Option<(&str, &str)> {
    let end = input
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(input.len());
    if end == 0 {
        return None;
    }
    Some((&input[..end], input[end..].trim_start()))
}

fn new_document_id() -> String {
    let mut rng = rand::rng();
    format!("{:016x}{:08x}", rng.random::<u64>(), rng.random::<u32>())
}

fn document_id(doc: &Value) -> Value {
    doc.get("_id").cloned().unwrap_or(Value::Null)
}

impl SimStore {
    fn invalid(query: &str) -> ToolsError {
        ToolsError::Query(format!("Invalid DQL statement: {}", query))
    }

    fn read(&self, rows: Vec<Value>) -> Box<dyn QueryResult> {
        let corrupt_json = self.corrupt_json.load(Ordering::SeqCst);
        let fail_dematerialize = self.fail_dematerialize.load(Ordering::SeqCst);
        let items = rows
            .into_iter()
            .map(|value| {
                Box::new(SimItem {
                    value,
                    corrupt_json,
                    fail_dematerialize,
                    dematerialized: Arc::clone(&self.dematerialized),
                }) as Box<dyn QueryResultItem>
            })
            .collect();
        Box::new(SimResult {
            items,
            mutated: None,
            commit_id: None,
        })
    }

    fn mutation(&self, ids: Vec<Value>) -> Box<dyn QueryResult> {
        let commit = self.commits.fetch_add(1, Ordering::SeqCst) + 1;
        Box::new(SimResult {
            items: Vec::new(),
            mutated: Some(ids),
            commit_id: Some(commit.to_string()),
        })
    }

    fn select(&self, collection: &str) -> Vec<Value> {
        if collection == "__small_peer_info" {
            return self.small_peer_info.lock().iter().cloned().collect();
        }
        self.collections
            .lock()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    fn insert(&self, collection: &str, payload: &str, query: &str) -> ToolsResult<Vec<Value>> {
        let payload = payload
            .trim()
            .strip_prefix('(')
            .and_then(|p| p.strip_suffix(')'))
            .ok_or_else(|| Self::invalid(query))?;
        let docs = match serde_json::from_str::<Value>(payload) {
            Ok(Value::Array(docs)) => docs,
            Ok(doc @ Value::Object(_)) => vec![doc],
            _ => return Err(Self::invalid(query)),
        };

        let mut collections = self.collections.lock();
        let stored = collections.entry(collection.to_string()).or_default();
        let mut ids = Vec::with_capacity(docs.len());
        for mut doc in docs {
            let Value::Object(ref mut fields) = doc else {
                return Err(Self::invalid(query));
            };
            let id = fields
                .entry("_id")
                .or_insert_with(|| Value::String(new_document_id()))
                .clone();
            stored.retain(|existing| document_id(existing) != id);
            stored.push(doc);
            ids.push(id);
        }
        Ok(ids)
    }

    fn delete(&self, collection: &str, filter: &str, query: &str) -> ToolsResult<Vec<Value>> {
        let target = if filter.is_empty() {
            None
        } else {
            let rest = keyword(filter, "WHERE").ok_or_else(|| Self::invalid(query))?;
            let rest = keyword(rest, "_id").ok_or_else(|| Self::invalid(query))?;
            let rest = rest.strip_prefix('=').ok_or_else(|| Self::invalid(query))?.trim();
            let id = rest
                .strip_prefix('\'')
                .and_then(|r| r.strip_suffix('\''))
                .ok_or_else(|| Self::invalid(query))?;
            Some(Value::String(id.to_string()))
        };

        let mut collections = self.collections.lock();
        let Some(stored) = collections.get_mut(collection) else {
            return Ok(Vec::new());
        };
        let mut removed = Vec::new();
        stored.retain(|doc| {
            let id = document_id(doc);
            let hit = target.as_ref().map_or(true, |t| *t == id);
            if hit {
                removed.push(id);
            }
            !hit
        });
        Ok(removed)
    }
}

#[async_trait]
impl Store for SimStore {
    async fn execute(&self, query: &str) -> ToolsResult<Box<dyn QueryResult>> {
        self.executed.fetch_add(1, Ordering::SeqCst);
        if let Some(msg) = self.fail_next.lock().take() {
            return Err(ToolsError::Query(msg));
        }

        let statement = query.trim().trim_end_matches(';').trim();

        if let Some(rest) = keyword(statement, "SHOW ALL") {
            if !rest.is_empty() {
                return Err(Self::invalid(query));
            }
            let rows = self.settings_rows.lock().clone();
            return Ok(self.read(rows));
        }

        if let Some(rest) = keyword(statement, "SELECT") {
            let rest = rest
                .strip_prefix('*')
                .map(str::trim_start)
                .and_then(|r| keyword(r, "FROM"))
                .ok_or_else(|| Self::invalid(query))?;
            let (collection, tail) = identifier(rest).ok_or_else(|| Self::invalid(query))?;
            if !tail.is_empty() {
                return Err(Self::invalid(query));
            }
            return Ok(self.read(self.select(collection)));
        }

        if let Some(rest) = keyword(statement, "INSERT INTO") {
            let (collection, tail) = identifier(rest).ok_or_else(|| Self::invalid(query))?;
            let payload = keyword(tail, "DOCUMENTS").ok_or_else(|| Self::invalid(query))?;
            let ids = self.insert(collection, payload, query)?;
            return Ok(self.mutation(ids));
        }

        if let Some(rest) = keyword(statement, "DELETE FROM") {
            let (collection, tail) = identifier(rest).ok_or_else(|| Self::invalid(query))?;
            let ids = self.delete(collection, tail, query)?;
            return Ok(self.mutation(ids));
        }

        Err(Self::invalid(query))
    }
}

// ============================================================================
// Instance
// ============================================================================

#[derive(Debug)]
struct SyncState {
    syncing: bool,
    config: Option<TransportConfig>,
    starts: usize,
    fail_next: Option<String>,
}

impl SyncState {
    fn check(&mut self) -> ToolsResult<()> {
        match self.fail_next.take() {
            Some(msg) => Err(ToolsError::Sync(msg)),
            None => Ok(()),
        }
    }
}

/// A complete in-memory [`SyncInstance`].
pub struct SimulatedInstance {
    presence: SimPresence,
    store: SimStore,
    persistence_dir: PathBuf,
    log_source: Mutex<Option<PathBuf>>,
    sync: Mutex<SyncState>,
}

impl Default for SimulatedInstance {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedInstance {
    /// Instance whose persistence directory sits under the system temp dir.
    ///
    /// Nothing is created on disk until something writes there.
    pub fn new() -> Self {
        Self::with_persistence_dir(std::env::temp_dir().join("peerscope-sim").join("store"))
    }

    pub fn with_persistence_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            presence: SimPresence::default(),
            store: SimStore::default(),
            persistence_dir: dir.into(),
            log_source: Mutex::new(None),
            sync: Mutex::new(SyncState {
                syncing: true,
                config: None,
                starts: 0,
                fail_next: None,
            }),
        }
    }

    /// File copied by `export_logs`
    pub fn with_log_source(self, path: impl Into<PathBuf>) -> Self {
        *self.log_source.lock() = Some(path.into());
        self
    }

    // ---- presence ----

    /// Deliver `snapshot` to every registered observer
    pub fn publish_presence(&self, snapshot: PresenceSnapshot) {
        self.presence.publish(snapshot);
    }

    pub fn observer_count(&self) -> usize {
        self.presence.observers.lock().len()
    }

    /// Make the next `observe` call fail with `msg`
    pub fn fail_next_observe(&self, msg: impl Into<String>) {
        *self.presence.fail_next.lock() = Some(msg.into());
    }

    // ---- store ----

    /// Insert documents directly, bypassing DQL
    pub fn seed_documents(&self, collection: &str, docs: impl IntoIterator<Item = Value>) {
        let mut collections = self.store.collections.lock();
        let stored = collections.entry(collection.to_string()).or_default();
        stored.extend(docs);
    }

    pub fn documents(&self, collection: &str) -> Vec<Value> {
        self.store.select(collection)
    }

    /// Rows returned by `SHOW ALL`
    pub fn set_settings_rows(&self, rows: Vec<Value>) {
        *self.store.settings_rows.lock() = rows;
    }

    /// Document returned from `__small_peer_info`; `None` for no rows
    pub fn set_small_peer_info(&self, doc: Option<Value>) {
        *self.store.small_peer_info.lock() = doc;
    }

    /// Make the next statement fail with `msg`
    pub fn fail_next_query(&self, msg: impl Into<String>) {
        *self.store.fail_next.lock() = Some(msg.into());
    }

    /// Serve item JSON strings that do not parse
    pub fn corrupt_item_json(&self, enabled: bool) {
        self.store.corrupt_json.store(enabled, Ordering::SeqCst);
    }

    /// Make every item's dematerialize call fail
    pub fn fail_dematerialize(&self, enabled: bool) {
        self.store.fail_dematerialize.store(enabled, Ordering::SeqCst);
    }

    /// Items successfully dematerialized so far
    pub fn dematerialized_count(&self) -> usize {
        self.store.dematerialized.load(Ordering::SeqCst)
    }

    /// Statements that reached the store
    pub fn executed_count(&self) -> usize {
        self.store.executed.load(Ordering::SeqCst)
    }

    // ---- sync ----

    pub fn is_syncing(&self) -> bool {
        self.sync.lock().syncing
    }

    /// Successful `start_sync` calls
    pub fn start_count(&self) -> usize {
        self.sync.lock().starts
    }

    /// Last config applied through `set_transport_config`
    pub fn transport_config(&self) -> Option<TransportConfig> {
        self.sync.lock().config.clone()
    }

    /// Make the next sync-related call fail with `msg`
    pub fn fail_next_sync_call(&self, msg: impl Into<String>) {
        self.sync.lock().fail_next = Some(msg.into());
    }
}

#[async_trait]
impl SyncInstance for SimulatedInstance {
    fn set_transport_config(&self, config: &TransportConfig) -> ToolsResult<()> {
        let mut sync = self.sync.lock();
        sync.check()?;
        sync.config = Some(config.clone());
        Ok(())
    }

    fn start_sync(&self) -> ToolsResult<()> {
        let mut sync = self.sync.lock();
        sync.check()?;
        sync.syncing = true;
        sync.starts += 1;
        Ok(())
    }

    fn stop_sync(&self) -> ToolsResult<()> {
        let mut sync = self.sync.lock();
        sync.check()?;
        sync.syncing = false;
        Ok(())
    }

    fn presence(&self) -> &dyn Presence {
        &self.presence
    }

    fn store(&self) -> &dyn Store {
        &self.store
    }

    fn persistence_directory(&self) -> PathBuf {
        self.persistence_dir.clone()
    }

    async fn export_logs(&self, path: &Path) -> ToolsResult<u64> {
        let source = self.log_source.lock().clone();
        let Some(source) = source else {
            return Ok(0);
        };
        let dest = path.to_path_buf();
        let bytes = tokio::task::spawn_blocking(move || copy_log(&source, &dest))
            .await
            .map_err(|e| ToolsError::Export(e.to_string()))??;
        Ok(bytes)
    }
}

// ============================================================================
// Presence churn
// ============================================================================

const TRANSPORTS: [&str; 4] = ["Bluetooth", "AccessPoint", "P2PWiFi", "WebSocket"];

fn random_peer(rng: &mut impl Rng, index: usize, local_key: &str) -> Peer {
    let key = format!("pk{:04}{:012x}", index, rng.random::<u64>() & 0xffff_ffff_ffff);
    let links = (0..rng.random_range(0..3))
        .map(|_| {
            let transport = TRANSPORTS[rng.random_range(0..TRANSPORTS.len())];
            let link = Connection::new(transport, key.clone(), local_key);
            if rng.random_bool(0.5) {
                link.with_distance(rng.random_range(0.5..30.0))
            } else {
                link
            }
        })
        .collect();
    let mut peer = Peer::new(key)
        .with_sdk_version("4.11.0")
        .with_cloud(rng.random_bool(0.2))
        .with_connections(Connections::List(links));
    if rng.random_bool(0.8) {
        peer = peer.with_device_name(format!("Device {}", index));
    }
    peer
}

impl SimulatedInstance {
    /// Publish a randomly changing presence graph every `interval` until the
    /// instance is dropped or the handle aborted.
    pub fn spawn_presence_churn(self: &Arc<Self>, interval: Duration, max_peers: usize) -> JoinHandle<()> {
        let weak = Arc::downgrade(self);
        tokio::spawn(async move {
            let local = Peer::new("local-sim")
                .with_device_name("This Device")
                .with_sdk_version("4.11.0");
            let mut remote: Vec<Peer> = Vec::new();
            let mut next_index = 0usize;

            loop {
                {
                    let Some(instance) = weak.upgrade() else {
                        break;
                    };
                    let mut rng = rand::rng();
                    if !remote.is_empty() && (remote.len() >= max_peers || rng.random_bool(0.3)) {
                        let at = rng.random_range(0..remote.len());
                        remote.remove(at);
                    } else if remote.len() < max_peers {
                        next_index += 1;
                        remote.push(random_peer(&mut rng, next_index, &local.peer_key_string));
                    }
                    tracing::trace!(remote_peers = remote.len(), "Simulated presence change");
                    instance.publish_presence(PresenceSnapshot::new(local.clone(), remote.clone()));
                }
                tokio::time::sleep(interval).await;
            }
        })
    }
}

// ============================================================================
// Share sink
// ============================================================================

#[derive(Debug, Clone)]
enum ShareBehavior {
    Succeed,
    Fail(String),
    /// Replace the shared file with a directory so cleanup cannot delete it
    PinFile,
}

/// Share sink that records requests and the file contents it was handed.
pub struct RecordingShareSink {
    behavior: ShareBehavior,
    requests: Mutex<Vec<ShareRequest>>,
    contents: Mutex<Vec<Vec<u8>>>,
}

impl Default for RecordingShareSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingShareSink {
    pub fn new() -> Self {
        Self::with_behavior(ShareBehavior::Succeed)
    }

    /// Every share fails with `msg` after recording the request
    pub fn failing(msg: impl Into<String>) -> Self {
        Self::with_behavior(ShareBehavior::Fail(msg.into()))
    }

    /// Shares succeed but leave an undeletable directory at the file path
    pub fn pinning_file() -> Self {
        Self::with_behavior(ShareBehavior::PinFile)
    }

    fn with_behavior(behavior: ShareBehavior) -> Self {
        Self {
            behavior,
            requests: Mutex::new(Vec::new()),
            contents: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ShareRequest> {
        self.requests.lock().clone()
    }

    /// File bytes as they were when each share was invoked
    pub fn contents(&self) -> Vec<Vec<u8>> {
        self.contents.lock().clone()
    }
}

#[async_trait]
impl ShareSink for RecordingShareSink {
    async fn share(&self, request: &ShareRequest) -> ToolsResult<()> {
        let bytes = tokio::fs::read(&request.path).await.unwrap_or_default();
        self.contents.lock().push(bytes);
        self.requests.lock().push(request.clone());

        match &self.behavior {
            ShareBehavior::Succeed => Ok(()),
            ShareBehavior::Fail(msg) => Err(ToolsError::Export(msg.clone())),
            ShareBehavior::PinFile => {
                tokio::fs::remove_file(&request.path).await?;
                tokio::fs::create_dir(&request.path).await?;
                tokio::fs::write(request.path.join("held"), b"").await?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{run_query, QueryExecutionResult};

    #[tokio::test]
    async fn test_insert_select_delete() {
        let sim = SimulatedInstance::new();
        let store = sim.store();

        let out = run_query(store, r#"INSERT INTO cars DOCUMENTS ({"_id": "a", "color": "red"})"#)
            .await
            .unwrap();
        assert!(out.result.is_mutating());
        run_query(store, r#"insert into cars documents ([{"color": "blue"}])"#)
            .await
            .unwrap();

        let out = run_query(store, "SELECT * FROM cars").await.unwrap();
        assert_eq!(out.result.total_count(), 2);

        let out = run_query(store, "DELETE FROM cars WHERE _id = 'a';").await.unwrap();
        match out.result {
            QueryExecutionResult::Mutation {
                mutated_document_ids,
                commit_id,
                ..
            } => {
                assert_eq!(mutated_document_ids, vec![json!("a")]);
                assert!(commit_id.is_some());
            }
            other => panic!("expected mutation, got {:?}", other),
        }
        assert_eq!(sim.documents("cars").len(), 1);
    }

    #[tokio::test]
    async fn test_insert_same_id_replaces() {
        let sim = SimulatedInstance::new();
        run_query(sim.store(), r#"INSERT INTO c DOCUMENTS ({"_id": 1, "v": 1})"#).await.unwrap();
        run_query(sim.store(), r#"INSERT INTO c DOCUMENTS ({"_id": 1, "v": 2})"#).await.unwrap();
        assert_eq!(sim.documents("c"), vec![json!({"_id": 1, "v": 2})]);
    }

    #[tokio::test]
    async fn test_unknown_statement_is_query_error() {
        let sim = SimulatedInstance::new();
        let err = run_query(sim.store(), "UPSERT cars").await.err().unwrap();
        assert!(err.to_string().contains("Invalid DQL statement"));
        assert!(run_query(sim.store(), "SELECT * FROM").await.is_err());
    }

    #[test]
    fn test_new_observer_gets_current_graph() {
        let sim = SimulatedInstance::new();
        sim.publish_presence(PresenceSnapshot::new(Peer::new("local"), vec![Peer::new("p1")]));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let observer = sim
            .presence()
            .observe(Box::new(move |s| sink.lock().push(s.remote_peers.len())))
            .unwrap();
        assert_eq!(*seen.lock(), vec![1]);

        observer.stop();
        observer.stop();
        assert_eq!(sim.observer_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_churn_publishes_until_instance_dropped() {
        let sim = Arc::new(SimulatedInstance::new());
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let observer = sim
            .presence()
            .observe(Box::new(move |s| {
                assert!(s.remote_peers.len() <= 3);
                seen.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();

        let handle = sim.spawn_presence_churn(Duration::from_millis(100), 3);
        tokio::time::sleep(Duration::from_millis(450)).await;
        assert!(count.load(Ordering::SeqCst) >= 4);

        observer.stop();
        drop(sim);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(handle.is_finished());
    }
}
