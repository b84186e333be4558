//! Runtime permissions for peer-to-peer transports
//!
//! Only Android gates Bluetooth and Wi-Fi discovery behind runtime
//! permissions. Everywhere else the report is granted without asking.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ToolsResult;
use crate::types::Platform;

/// A transport permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Permission {
    BluetoothConnect,
    BluetoothAdvertise,
    BluetoothScan,
    NearbyWifiDevices,
}

impl Permission {
    /// Everything the transports can use
    pub const ALL: [Permission; 4] = [
        Permission::BluetoothConnect,
        Permission::BluetoothAdvertise,
        Permission::BluetoothScan,
        Permission::NearbyWifiDevices,
    ];

    /// Android manifest name
    pub fn android_name(&self) -> &'static str {
        match self {
            Permission::BluetoothConnect => "android.permission.BLUETOOTH_CONNECT",
            Permission::BluetoothAdvertise => "android.permission.BLUETOOTH_ADVERTISE",
            Permission::BluetoothScan => "android.permission.BLUETOOTH_SCAN",
            Permission::NearbyWifiDevices => "android.permission.NEARBY_WIFI_DEVICES",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionStatus {
    Granted,
    Denied,
    NeverAskAgain,
}

/// Platform permission prompt.
#[async_trait]
pub trait PermissionProvider: Send + Sync {
    /// Which of `wanted` this OS version knows about
    fn supported(&self, wanted: &[Permission]) -> Vec<Permission> {
        wanted.to_vec()
    }

    /// Prompt for `permissions` and report each outcome
    async fn request(
        &self,
        permissions: &[Permission],
    ) -> ToolsResult<BTreeMap<Permission, PermissionStatus>>;
}

/// Outcome of [`request_permissions`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PermissionReport {
    pub granted: bool,
    pub statuses: BTreeMap<Permission, PermissionStatus>,
    pub error: Option<String>,
}

impl PermissionReport {
    fn all_granted() -> Self {
        Self {
            granted: true,
            ..Default::default()
        }
    }

    /// Permissions that were not granted
    pub fn missing(&self) -> Vec<Permission> {
        self.statuses
            .iter()
            .filter(|(_, status)| **status != PermissionStatus::Granted)
            .map(|(p, _)| *p)
            .collect()
    }
}

/// Ask for every transport permission the platform needs.
///
/// Never fails: a provider error produces a not-granted report so the rest
/// of the app keeps running with degraded transports.
pub async fn request_permissions(
    provider: &dyn PermissionProvider,
    platform: Platform,
) -> PermissionReport {
    if platform != Platform::Android {
        return PermissionReport::all_granted();
    }

    let wanted = provider.supported(&Permission::ALL);
    if wanted.is_empty() {
        return PermissionReport::all_granted();
    }

    match provider.request(&wanted).await {
        Ok(statuses) => {
            let granted = wanted
                .iter()
                .all(|p| statuses.get(p) == Some(&PermissionStatus::Granted));
            if !granted {
                tracing::warn!(?statuses, "Some transport permissions were denied");
            }
            PermissionReport {
                granted,
                statuses,
                error: None,
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to request permissions");
            PermissionReport {
                granted: false,
                statuses: BTreeMap::new(),
                error: Some(e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolsError;

    struct FixedProvider {
        supported: Vec<Permission>,
        outcome: Result<PermissionStatus, String>,
    }

    #[async_trait]
    impl PermissionProvider for FixedProvider {
        fn supported(&self, _wanted: &[Permission]) -> Vec<Permission> {
            self.supported.clone()
        }

        async fn request(
            &self,
            permissions: &[Permission],
        ) -> ToolsResult<BTreeMap<Permission, PermissionStatus>> {
            match &self.outcome {
                Ok(status) => Ok(permissions.iter().map(|p| (*p, *status)).collect()),
                Err(msg) => Err(ToolsError::Permission(msg.clone())),
            }
        }
    }

    #[tokio::test]
    async fn test_non_android_granted_without_asking() {
        let provider = FixedProvider {
            supported: Permission::ALL.to_vec(),
            outcome: Err("should not be called".into()),
        };
        let report = request_permissions(&provider, Platform::Ios).await;
        assert!(report.granted);
        assert!(report.statuses.is_empty());
    }

    #[tokio::test]
    async fn test_android_denial_reported() {
        let provider = FixedProvider {
            supported: vec![Permission::BluetoothScan],
            outcome: Ok(PermissionStatus::Denied),
        };
        let report = request_permissions(&provider, Platform::Android).await;
        assert!(!report.granted);
        assert_eq!(report.missing(), vec![Permission::BluetoothScan]);
    }

    #[tokio::test]
    async fn test_android_nothing_supported_is_granted() {
        let provider = FixedProvider {
            supported: vec![],
            outcome: Ok(PermissionStatus::Denied),
        };
        assert!(request_permissions(&provider, Platform::Android).await.granted);
    }

    #[tokio::test]
    async fn test_provider_error_is_not_fatal() {
        let provider = FixedProvider {
            supported: Permission::ALL.to_vec(),
            outcome: Err("activity gone".into()),
        };
        let report = request_permissions(&provider, Platform::Android).await;
        assert!(!report.granted);
        assert!(report.error.unwrap().contains("activity gone"));
    }
}
