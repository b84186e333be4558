//! Sync start/stop and transport toggles.

use dioxus::prelude::*;
use peerscope_core::{SyncControls, SyncInstance, ToolsError, ToolsResult, TransportOptions};

use crate::context::{use_instance, use_tools, InstanceHandle};

#[derive(Clone, Copy)]
pub struct SyncControlsState {
    pub controls: Signal<SyncControls>,
    /// Last failed operation, cleared by the next success
    pub error: Signal<Option<String>>,
    pub toggle_sync: Callback<()>,
    /// Merge the given toggles into the current options
    pub update_transports: Callback<TransportOptions>,
    pub battery_saving: Callback<()>,
    pub high_performance: Callback<()>,
}

pub fn use_sync_controls() -> SyncControlsState {
    let platform = use_tools().config.platform();
    let handle = use_instance();
    let controls = use_signal(|| SyncControls::new(platform));
    let error = use_signal(|| None::<String>);

    let toggle_sync = use_callback(move |_: ()| {
        apply(handle, controls, error, |c, i| c.toggle_sync(i));
    });
    let update_transports = use_callback(move |partial: TransportOptions| {
        apply(handle, controls, error, |c, i| {
            c.update_transport_options(i, &partial)
        });
    });
    let battery_saving = use_callback(move |_: ()| {
        apply(handle, controls, error, |c, i| c.enable_battery_saving_mode(i));
    });
    let high_performance = use_callback(move |_: ()| {
        apply(handle, controls, error, |c, i| {
            c.enable_high_performance_mode(i)
        });
    });

    SyncControlsState {
        controls,
        error,
        toggle_sync,
        update_transports,
        battery_saving,
        high_performance,
    }
}

/// Run `op` on a copy of the controls and commit it only on success.
fn apply<F>(
    handle: InstanceHandle,
    mut controls: Signal<SyncControls>,
    mut error: Signal<Option<String>>,
    op: F,
) where
    F: FnOnce(&mut SyncControls, &dyn SyncInstance) -> ToolsResult<()>,
{
    let Some(instance) = handle.instance.peek().clone() else {
        error.set(Some(ToolsError::NotInitialized.to_string()));
        return;
    };
    let mut next = controls.peek().clone();
    match op(&mut next, instance.as_ref()) {
        Ok(()) => {
            controls.set(next);
            error.set(None);
        }
        Err(e) => error.set(Some(e.to_string())),
    }
}
