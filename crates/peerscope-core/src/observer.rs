//! Presence observer lifecycle
//!
//! A consumer (a mounted component, a CLI command, a test) owns at most one
//! presence subscription at a time. [`ObserverSlot`] enforces that, defers
//! subscribing until an SDK instance exists, and guarantees that nothing is
//! delivered after [`stop`](PresenceSubscription::stop) returns, even if the
//! SDK fires a callback late from another thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{ToolsError, ToolsResult};
use crate::instance::{Presence, PresenceObserver, SyncInstance};
use crate::types::PresenceSnapshot;

/// An active presence registration.
///
/// Stopped on drop.
pub struct PresenceSubscription {
    observer: Option<Box<dyn PresenceObserver>>,
    active: Arc<AtomicBool>,
}

impl PresenceSubscription {
    /// Register `on_update` with the SDK presence API.
    pub fn start<F>(presence: &dyn Presence, on_update: F) -> ToolsResult<Self>
    where
        F: Fn(PresenceSnapshot) + Send + Sync + 'static,
    {
        let active = Arc::new(AtomicBool::new(true));
        let gate = Arc::clone(&active);

        let observer = presence.observe(Box::new(move |snapshot| {
            if gate.load(Ordering::Acquire) {
                on_update(snapshot);
            }
        }))?;

        tracing::debug!("Presence observer registered");
        Ok(Self {
            observer: Some(observer),
            active,
        })
    }

    /// Whether updates are still being delivered
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Stop delivering updates and unregister from the SDK. Idempotent.
    pub fn stop(&mut self) {
        self.active.store(false, Ordering::Release);
        if let Some(observer) = self.observer.take() {
            observer.stop();
            tracing::debug!("Presence observer stopped");
        }
    }
}

impl Drop for PresenceSubscription {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Result of [`ObserverSlot::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    /// Observer registered
    Subscribed,
    /// No instance yet; call again once one is available
    Deferred,
}

/// Holds the single presence subscription of one consumer.
#[derive(Default)]
pub struct ObserverSlot {
    subscription: Option<PresenceSubscription>,
}

impl ObserverSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe through `instance`, or defer if it is not available yet.
    ///
    /// Fails with [`ToolsError::AlreadySubscribed`] while a previous
    /// subscription is still active.
    pub fn subscribe<F>(
        &mut self,
        instance: Option<&dyn SyncInstance>,
        on_update: F,
    ) -> ToolsResult<SubscribeOutcome>
    where
        F: Fn(PresenceSnapshot) + Send + Sync + 'static,
    {
        if self.is_subscribed() {
            return Err(ToolsError::AlreadySubscribed);
        }
        let Some(instance) = instance else {
            tracing::debug!("Store instance not ready, deferring presence subscription");
            return Ok(SubscribeOutcome::Deferred);
        };

        self.subscription = Some(PresenceSubscription::start(instance.presence(), on_update)?);
        Ok(SubscribeOutcome::Subscribed)
    }

    /// Whether an active subscription is held
    pub fn is_subscribed(&self) -> bool {
        self.subscription.as_ref().is_some_and(|s| s.is_active())
    }

    /// Stop and drop the current subscription, if any. Idempotent.
    pub fn stop(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.stop();
        }
    }
}

#[cfg(all(test, feature = "sim"))]
mod tests {
    use super::*;
    use crate::sim::SimulatedInstance;
    use crate::types::Peer;
    use std::sync::atomic::AtomicUsize;

    fn snapshot(n: usize) -> PresenceSnapshot {
        PresenceSnapshot::new(
            Peer::new("local"),
            (0..n).map(|i| Peer::new(format!("p{}", i))).collect(),
        )
    }

    #[test]
    fn test_subscribe_then_stop_delivers_nothing() {
        let sim = SimulatedInstance::new();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();

        let mut slot = ObserverSlot::new();
        let outcome = slot
            .subscribe(Some(&sim), move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        assert_eq!(outcome, SubscribeOutcome::Subscribed);
        slot.stop();

        sim.publish_presence(snapshot(2));
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(sim.observer_count(), 0);
    }

    #[test]
    fn test_second_subscribe_is_rejected() {
        let sim = SimulatedInstance::new();
        let mut slot = ObserverSlot::new();
        slot.subscribe(Some(&sim), |_| {}).unwrap();

        let err = slot.subscribe(Some(&sim), |_| {}).unwrap_err();
        assert!(matches!(err, ToolsError::AlreadySubscribed));
        assert_eq!(sim.observer_count(), 1);

        // After stop a fresh subscription is allowed
        slot.stop();
        slot.subscribe(Some(&sim), |_| {}).unwrap();
        assert_eq!(sim.observer_count(), 1);
    }

    #[test]
    fn test_missing_instance_defers() {
        let mut slot = ObserverSlot::new();
        let outcome = slot.subscribe(None, |_| {}).unwrap();
        assert_eq!(outcome, SubscribeOutcome::Deferred);
        assert!(!slot.is_subscribed());
    }

    #[test]
    fn test_stop_is_idempotent_and_drop_unregisters() {
        let sim = SimulatedInstance::new();
        {
            let mut sub = PresenceSubscription::start(sim.presence(), |_| {}).unwrap();
            sub.stop();
            sub.stop();
            assert!(!sub.is_active());
        }
        {
            let _sub = PresenceSubscription::start(sim.presence(), |_| {}).unwrap();
            assert_eq!(sim.observer_count(), 1);
        }
        assert_eq!(sim.observer_count(), 0);
    }

    #[test]
    fn test_registration_failure_surfaces_error() {
        let sim = SimulatedInstance::new();
        sim.fail_next_observe("presence unavailable");
        let mut slot = ObserverSlot::new();
        let err = slot.subscribe(Some(&sim), |_| {}).unwrap_err();
        assert!(matches!(err, ToolsError::Presence(_)));
        assert!(!slot.is_subscribed());
    }
}
