//! Process-wide store instance management.
//!
//! The SDK instance is expensive to create and must exist at most once per
//! process. [`InstanceManager`] creates it lazily on the first
//! [`acquire`](InstanceManager::acquire), hands out reference-counted
//! [`InstanceLease`]s, and tears the instance down when the last lease is
//! released.
//!
//! Concurrent `acquire` calls while initialization is running wait for that
//! single attempt and share its outcome, successful or not. A later call
//! after a failure starts a fresh attempt.

use std::ops::Deref;
use std::sync::{Arc, OnceLock};

use futures::future::BoxFuture;
use parking_lot::Mutex;

use crate::error::{ToolsError, ToolsResult};
use crate::instance::SyncInstance;

/// Factory for the SDK instance.
pub type Initializer =
    Box<dyn Fn() -> BoxFuture<'static, ToolsResult<Arc<dyn SyncInstance>>> + Send + Sync>;

static GLOBAL: OnceLock<Arc<InstanceManager>> = OnceLock::new();

/// Lifecycle of the managed instance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InstanceState {
    #[default]
    Uninitialized,
    Initializing,
    Ready,
    Failed(String),
}

struct Slot {
    instance: Option<Arc<dyn SyncInstance>>,
    leases: usize,
    state: InstanceState,
    /// Completed initialization attempts
    attempts: u64,
    /// Attempts started after a failure
    retry_count: u32,
}

/// Lazily-initialized, reference-counted owner of the SDK instance.
pub struct InstanceManager {
    initializer: Initializer,
    slot: Mutex<Slot>,
    /// Held for the duration of one initialization attempt
    init_lock: tokio::sync::Mutex<()>,
}

impl InstanceManager {
    /// Create a manager that builds the instance with `initializer`.
    pub fn new<F>(initializer: F) -> Arc<Self>
    where
        F: Fn() -> BoxFuture<'static, ToolsResult<Arc<dyn SyncInstance>>> + Send + Sync + 'static,
    {
        Arc::new(Self {
            initializer: Box::new(initializer),
            slot: Mutex::new(Slot {
                instance: None,
                leases: 0,
                state: InstanceState::Uninitialized,
                attempts: 0,
                retry_count: 0,
            }),
            init_lock: tokio::sync::Mutex::new(()),
        })
    }

    /// Install the process-wide manager.
    ///
    /// Returns the already-installed manager if one exists.
    pub fn install_global(manager: Arc<InstanceManager>) -> Arc<InstanceManager> {
        GLOBAL.get_or_init(|| manager).clone()
    }

    /// The process-wide manager, if installed
    pub fn global() -> Option<Arc<InstanceManager>> {
        GLOBAL.get().cloned()
    }

    /// Current lifecycle state
    pub fn state(&self) -> InstanceState {
        self.slot.lock().state.clone()
    }

    /// Number of attempts started after a failed one
    pub fn retry_count(&self) -> u32 {
        self.slot.lock().retry_count
    }

    /// Number of outstanding leases
    pub fn lease_count(&self) -> usize {
        self.slot.lock().leases
    }

    /// The instance, if initialized, without taking a lease
    pub fn current(&self) -> Option<Arc<dyn SyncInstance>> {
        self.slot.lock().instance.clone()
    }

    /// Get a lease on the instance, initializing it if needed.
    pub async fn acquire(self: &Arc<Self>) -> ToolsResult<InstanceLease> {
        if let Some(lease) = self.try_lease() {
            return Ok(lease);
        }

        let seen_attempts = self.slot.lock().attempts;
        let _guard = self.init_lock.lock().await;

        // Someone else finished an attempt while we waited: share its outcome
        if let Some(lease) = self.try_lease() {
            tracing::debug!("Reusing existing store instance");
            return Ok(lease);
        }
        {
            let mut slot = self.slot.lock();
            if slot.attempts != seen_attempts {
                if let InstanceState::Failed(ref msg) = slot.state {
                    return Err(ToolsError::Initialization(msg.clone()));
                }
            }
            if matches!(slot.state, InstanceState::Failed(_)) {
                slot.retry_count += 1;
            }
            slot.state = InstanceState::Initializing;
        }

        tracing::info!("Initializing store instance");
        let outcome = (self.initializer)().await;

        let mut slot = self.slot.lock();
        slot.attempts += 1;
        match outcome {
            Ok(instance) => {
                slot.instance = Some(instance.clone());
                slot.state = InstanceState::Ready;
                slot.leases += 1;
                tracing::info!("Store instance ready");
                Ok(InstanceLease {
                    manager: Arc::clone(self),
                    instance,
                    released: false,
                })
            }
            Err(e) => {
                tracing::error!(error = %e, retry_count = slot.retry_count, "Store initialization failed");
                slot.state = InstanceState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    fn try_lease(self: &Arc<Self>) -> Option<InstanceLease> {
        let mut slot = self.slot.lock();
        let instance = slot.instance.clone()?;
        slot.leases += 1;
        Some(InstanceLease {
            manager: Arc::clone(self),
            instance,
            released: false,
        })
    }

    fn release_one(&self) {
        let retired = {
            let mut slot = self.slot.lock();
            slot.leases = slot.leases.saturating_sub(1);
            if slot.leases == 0 {
                slot.state = InstanceState::Uninitialized;
                slot.instance.take()
            } else {
                None
            }
        };

        if let Some(instance) = retired {
            tracing::info!("Last lease released, stopping store instance");
            if let Err(e) = instance.stop_sync() {
                tracing::warn!(error = %e, "Failed to stop sync on release");
            }
        }
    }
}

/// Shared handle on the SDK instance.
///
/// Released explicitly with [`release`](InstanceLease::release) or on drop.
pub struct InstanceLease {
    manager: Arc<InstanceManager>,
    instance: Arc<dyn SyncInstance>,
    released: bool,
}

impl InstanceLease {
    /// The leased instance
    pub fn instance(&self) -> &Arc<dyn SyncInstance> {
        &self.instance
    }

    /// Give the lease back
    pub fn release(mut self) {
        self.released = true;
        self.manager.release_one();
    }
}

impl Deref for InstanceLease {
    type Target = dyn SyncInstance;

    fn deref(&self) -> &Self::Target {
        self.instance.as_ref()
    }
}

impl Drop for InstanceLease {
    fn drop(&mut self) {
        if !self.released {
            self.released = true;
            self.manager.release_one();
        }
    }
}

#[cfg(all(test, feature = "sim"))]
mod tests {
    use super::*;
    use crate::sim::SimulatedInstance;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn counting_manager(calls: Arc<AtomicUsize>, fail_first: bool) -> Arc<InstanceManager> {
        InstanceManager::new(move || {
            let calls = calls.clone();
            Box::pin(async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(50)).await;
                if fail_first && n == 0 {
                    return Err(ToolsError::Initialization("license expired".into()));
                }
                let instance: Arc<dyn SyncInstance> = Arc::new(SimulatedInstance::new());
                Ok(instance)
            })
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_acquire_runs_initializer_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let manager = counting_manager(calls.clone(), false);

        let (a, b, c) = tokio::join!(manager.acquire(), manager.acquire(), manager.acquire());
        let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(manager.lease_count(), 3);
        assert!(Arc::ptr_eq(a.instance(), b.instance()));
        assert!(Arc::ptr_eq(b.instance(), c.instance()));
        assert_eq!(manager.state(), InstanceState::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_share_failure_then_retry_succeeds() {
        let calls = Arc::new(AtomicUsize::new(0));
        let manager = counting_manager(calls.clone(), true);

        let (a, b) = tokio::join!(manager.acquire(), manager.acquire());
        assert!(a.is_err());
        assert!(matches!(b, Err(ToolsError::Initialization(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(manager.state(), InstanceState::Failed(_)));

        let lease = manager.acquire().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(manager.retry_count(), 1);
        drop(lease);
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_release_retires_instance() {
        let calls = Arc::new(AtomicUsize::new(0));
        let manager = counting_manager(calls, false);

        let first = manager.acquire().await.unwrap();
        let second = manager.acquire().await.unwrap();
        first.release();
        assert!(manager.current().is_some());

        drop(second);
        assert!(manager.current().is_none());
        assert_eq!(manager.lease_count(), 0);
        assert_eq!(manager.state(), InstanceState::Uninitialized);
    }
}
