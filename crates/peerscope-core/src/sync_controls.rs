//! Sync start/stop and transport toggles

use crate::error::{ToolsError, ToolsResult};
use crate::instance::SyncInstance;
use crate::types::{Platform, TransportOptions};

/// BLE and multicast off; LAN discovery stays on
pub const BATTERY_SAVING: TransportOptions = TransportOptions {
    bluetooth_le: Some(false),
    lan: Some(true),
    mdns: Some(true),
    multicast: Some(false),
    awdl: Some(false),
};

/// Every transport on
pub const HIGH_PERFORMANCE: TransportOptions = TransportOptions {
    bluetooth_le: Some(true),
    lan: Some(true),
    mdns: Some(true),
    multicast: Some(true),
    awdl: Some(true),
};

/// Sync state shown by the sync status screen.
///
/// Every operation leaves the state untouched when the instance rejects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncControls {
    is_syncing: bool,
    options: TransportOptions,
    platform: Platform,
}

impl Default for SyncControls {
    fn default() -> Self {
        Self::new(Platform::current())
    }
}

impl SyncControls {
    /// The SDK starts syncing on creation, so the initial state is syncing.
    pub fn new(platform: Platform) -> Self {
        Self {
            is_syncing: true,
            options: TransportOptions::default(),
            platform,
        }
    }

    pub fn is_syncing(&self) -> bool {
        self.is_syncing
    }

    pub fn transport_options(&self) -> TransportOptions {
        self.options
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Whether the AWDL toggle means anything here
    pub fn supports_awdl(&self) -> bool {
        self.platform == Platform::Ios
    }

    fn apply(&self, instance: &dyn SyncInstance, options: &TransportOptions) -> ToolsResult<()> {
        instance
            .set_transport_config(&options.to_config(self.platform))
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to apply transport config");
                ToolsError::Sync(e.to_string())
            })
    }

    /// Apply the transport config and start syncing. No-op when running.
    pub fn start_sync(&mut self, instance: &dyn SyncInstance) -> ToolsResult<()> {
        if self.is_syncing {
            return Ok(());
        }
        self.apply(instance, &self.options)?;
        instance.start_sync().map_err(|e| {
            tracing::error!(error = %e, "Failed to start sync");
            ToolsError::Sync(e.to_string())
        })?;
        self.is_syncing = true;
        tracing::info!("Sync started");
        Ok(())
    }

    /// Stop syncing. No-op when stopped.
    pub fn stop_sync(&mut self, instance: &dyn SyncInstance) -> ToolsResult<()> {
        if !self.is_syncing {
            return Ok(());
        }
        instance.stop_sync().map_err(|e| {
            tracing::error!(error = %e, "Failed to stop sync");
            ToolsError::Sync(e.to_string())
        })?;
        self.is_syncing = false;
        tracing::info!("Sync stopped");
        Ok(())
    }

    pub fn toggle_sync(&mut self, instance: &dyn SyncInstance) -> ToolsResult<()> {
        if self.is_syncing {
            self.stop_sync(instance)
        } else {
            self.start_sync(instance)
        }
    }

    /// Merge `partial` into the current options.
    ///
    /// While syncing the merged config is applied right away; otherwise it
    /// takes effect on the next start.
    pub fn update_transport_options(
        &mut self,
        instance: &dyn SyncInstance,
        partial: &TransportOptions,
    ) -> ToolsResult<()> {
        let merged = self.options.merge(partial);
        if self.is_syncing {
            self.apply(instance, &merged)?;
        }
        self.options = merged;
        tracing::debug!(options = ?self.options, "Transport options updated");
        Ok(())
    }

    pub fn enable_battery_saving_mode(&mut self, instance: &dyn SyncInstance) -> ToolsResult<()> {
        self.update_transport_options(instance, &BATTERY_SAVING)
    }

    pub fn enable_high_performance_mode(
        &mut self,
        instance: &dyn SyncInstance,
    ) -> ToolsResult<()> {
        self.update_transport_options(instance, &HIGH_PERFORMANCE)
    }
}
