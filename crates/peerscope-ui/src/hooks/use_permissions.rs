//! Transport permission request on mount.

use dioxus::prelude::*;
use peerscope_core::{request_permissions, PermissionReport};

use crate::context::use_tools;

#[derive(Clone, Copy)]
pub struct PermissionsState {
    /// `None` while the first request is pending
    pub report: Signal<Option<PermissionReport>>,
    pub request: Callback<()>,
}

pub fn use_permissions() -> PermissionsState {
    let tools = use_tools();
    let mut report = use_signal(|| None::<PermissionReport>);

    let request = use_callback(move |_: ()| {
        let provider = tools.permissions.clone();
        let platform = tools.config.platform();
        spawn(async move {
            let outcome = request_permissions(provider.as_ref(), platform).await;
            report.set(Some(outcome));
        });
    });

    use_hook(move || request.call(()));

    PermissionsState { report, request }
}
