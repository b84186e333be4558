//! Desktop wiring for the tools context.
//!
//! Command line settings are stored once at startup and turned into a
//! [`ToolsContext`] when the root component mounts.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use futures::FutureExt;
use peerscope_core::{InstanceManager, SimulatedInstance, SyncInstance, ToolsConfig, ToolsError};
use peerscope_ui::ToolsContext;
use serde_json::json;

use crate::share::{DesktopPermissions, SaveDialogShare};

/// Interval between simulated presence changes
const CHURN_INTERVAL: Duration = Duration::from_secs(2);

static SETTINGS: OnceLock<AppSettings> = OnceLock::new();

/// Startup settings resolved from the command line.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub data_dir: PathBuf,
    pub config: ToolsConfig,
    /// Session log written by the tracing layer
    pub log_path: PathBuf,
    pub max_sim_peers: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("peerscope");
        Self {
            log_path: data_dir.join("logs"),
            data_dir,
            config: ToolsConfig::default(),
            max_sim_peers: 6,
        }
    }
}

pub fn install(settings: AppSettings) {
    let _ = SETTINGS.set(settings);
}

pub fn app_settings() -> AppSettings {
    SETTINGS.get().cloned().unwrap_or_default()
}

/// Build the context the UI hooks read.
pub fn tools_context(settings: &AppSettings) -> ToolsContext {
    let manager = InstanceManager::global().unwrap_or_else(|| {
        InstanceManager::install_global(simulated_manager(settings.clone()))
    });

    ToolsContext {
        manager,
        share: Arc::new(SaveDialogShare),
        permissions: Arc::new(DesktopPermissions),
        config: settings.config.clone(),
    }
}

/// Manager whose instance is an in-process simulation with live presence.
fn simulated_manager(settings: AppSettings) -> Arc<InstanceManager> {
    InstanceManager::new(move || {
        let settings = settings.clone();
        async move {
            let store_dir = settings.data_dir.join("store");
            tokio::fs::create_dir_all(&store_dir).await?;
            tokio::fs::write(
                store_dir.join("peerscope-sim.json"),
                json!({ "created_by": "peerscope-desktop" }).to_string(),
            )
            .await?;

            let sim = Arc::new(
                SimulatedInstance::with_persistence_dir(&store_dir)
                    .with_log_source(&settings.log_path),
            );
            sim.seed_documents(
                "cars",
                [
                    json!({ "_id": "car-1", "make": "Volvo", "year": 2019 }),
                    json!({ "_id": "car-2", "make": "Fiat", "year": 2022 }),
                ],
            );
            sim.spawn_presence_churn(CHURN_INTERVAL, settings.max_sim_peers);

            tracing::info!(store = %store_dir.display(), "Simulated store instance started");
            Ok::<_, ToolsError>(sim as Arc<dyn SyncInstance>)
        }
        .boxed()
    })
}
