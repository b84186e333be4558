//! Periodic disk usage polling.

use dioxus::prelude::*;
use peerscope_core::{fetch_disk_usage, DiskUsageInfo, Store};

use crate::context::{use_instance, use_tools};

#[derive(Clone, Copy)]
pub struct DiskUsageState {
    /// `None` until loaded, or when the store has no usage document
    pub info: Signal<Option<DiskUsageInfo>>,
    pub is_loading: Signal<bool>,
    pub error: Signal<Option<String>>,
    pub refresh: Callback<()>,
}

/// Poll `__small_peer_info` every `disk_refresh_secs` while mounted.
pub fn use_disk_usage() -> DiskUsageState {
    let interval = use_tools().config.disk_refresh_interval();
    let handle = use_instance();
    let info = use_signal(|| None::<DiskUsageInfo>);
    let is_loading = use_signal(|| true);
    let error = use_signal(|| None::<String>);
    let mut poller = use_signal(|| None::<Task>);

    use_effect(move || {
        let Some(instance) = handle.instance.read().clone() else {
            return;
        };
        if let Some(previous) = poller.take() {
            previous.cancel();
        }
        let task = spawn(async move {
            loop {
                load(instance.store(), info, is_loading, error).await;
                tokio::time::sleep(interval).await;
            }
        });
        poller.set(Some(task));
    });

    let refresh = use_callback(move |_: ()| {
        let Some(instance) = handle.instance.peek().clone() else {
            return;
        };
        spawn(async move {
            load(instance.store(), info, is_loading, error).await;
        });
    });

    DiskUsageState {
        info,
        is_loading,
        error,
        refresh,
    }
}

async fn load(
    store: &dyn Store,
    mut info: Signal<Option<DiskUsageInfo>>,
    mut is_loading: Signal<bool>,
    mut error: Signal<Option<String>>,
) {
    match fetch_disk_usage(store).await {
        Ok(usage) => {
            info.set(usage);
            error.set(None);
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch disk usage");
            error.set(Some(e.to_string()));
        }
    }
    is_loading.set(false);
}
