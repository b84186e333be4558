//! Tools context provider.
//!
//! The host app builds one [`ToolsContext`] and provides it at the root.
//! [`use_instance_provider`] then acquires a lease on the store instance and
//! shares it with every hook below.
//!
//! ## Usage
//!
//! ```ignore
//! // In App component
//! use_context_provider(|| tools);
//! use_instance_provider();
//!
//! // In child components
//! let handle = use_instance();
//! if let Some(instance) = handle.instance.read().as_ref() { .. }
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use dioxus::prelude::*;
use peerscope_core::{
    InstanceManager, InstanceState, PermissionProvider, ShareSink, SyncInstance, ToolsConfig,
};

/// Everything the hooks need from the host app.
#[derive(Clone)]
pub struct ToolsContext {
    pub manager: Arc<InstanceManager>,
    pub share: Arc<dyn ShareSink>,
    pub permissions: Arc<dyn PermissionProvider>,
    pub config: ToolsConfig,
}

impl ToolsContext {
    /// Directory for export artifacts of `instance`
    pub fn export_dir(&self, instance: &dyn SyncInstance) -> PathBuf {
        self.config
            .export_dir
            .clone()
            .unwrap_or_else(|| peerscope_core::instance_export_dir(instance))
    }

    /// Directory for query result exports
    pub fn results_export_dir(&self) -> PathBuf {
        self.config
            .export_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("peerscope-exports"))
    }
}

/// Hook to access the [`ToolsContext`].
pub fn use_tools() -> ToolsContext {
    use_context::<ToolsContext>()
}

/// Reactive view of the shared store instance.
#[derive(Clone, Copy)]
pub struct InstanceHandle {
    /// Set once the lease is held
    pub instance: Signal<Option<Arc<dyn SyncInstance>>>,
    pub state: Signal<InstanceState>,
    retry: Callback<()>,
}

impl InstanceHandle {
    /// Try again after a failed initialization
    pub fn retry(&self) {
        self.retry.call(());
    }
}

/// Acquire the instance lease for this subtree and provide the handle.
///
/// The lease lives in a task owned by the calling scope and is released when
/// that scope unmounts.
pub fn use_instance_provider() -> InstanceHandle {
    let tools = use_tools();
    let mut instance = use_signal(|| None::<Arc<dyn SyncInstance>>);
    let mut state = use_signal(InstanceState::default);

    let connect = use_callback(move |_: ()| {
        if matches!(
            *state.peek(),
            InstanceState::Initializing | InstanceState::Ready
        ) {
            return;
        }
        let manager = tools.manager.clone();
        state.set(InstanceState::Initializing);

        spawn(async move {
            match manager.acquire().await {
                Ok(lease) => {
                    instance.set(Some(Arc::clone(lease.instance())));
                    state.set(InstanceState::Ready);
                    tracing::info!("Store instance ready");

                    // Park until the scope drops this task
                    std::future::pending::<()>().await;
                    drop(lease);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to initialize store instance");
                    state.set(InstanceState::Failed(e.to_string()));
                }
            }
        });
    });

    use_hook(move || connect.call(()));

    let handle = InstanceHandle {
        instance,
        state,
        retry: connect,
    };
    use_context_provider(|| handle)
}

/// Hook to access the shared instance handle.
pub fn use_instance() -> InstanceHandle {
    use_context::<InstanceHandle>()
}
