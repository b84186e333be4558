//! Transport configuration types

use serde::{Deserialize, Serialize};

/// Platform the tools are running on.
///
/// Some transports (AWDL) and runtime permissions only exist on one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    #[default]
    Desktop,
}

impl Platform {
    /// Platform of the running binary
    pub fn current() -> Self {
        if cfg!(target_os = "ios") {
            Platform::Ios
        } else if cfg!(target_os = "android") {
            Platform::Android
        } else {
            Platform::Desktop
        }
    }
}

/// User-facing transport toggles.
///
/// `None` means "leave the SDK default alone".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportOptions {
    pub bluetooth_le: Option<bool>,
    pub lan: Option<bool>,
    pub mdns: Option<bool>,
    pub multicast: Option<bool>,
    pub awdl: Option<bool>,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            bluetooth_le: Some(true),
            lan: Some(true),
            mdns: Some(true),
            multicast: Some(true),
            awdl: Some(true),
        }
    }
}

impl TransportOptions {
    /// Options with every toggle unset
    pub fn unset() -> Self {
        Self {
            bluetooth_le: None,
            lan: None,
            mdns: None,
            multicast: None,
            awdl: None,
        }
    }

    /// Overlay the toggles that are set in `partial`
    pub fn merge(&self, partial: &TransportOptions) -> Self {
        Self {
            bluetooth_le: partial.bluetooth_le.or(self.bluetooth_le),
            lan: partial.lan.or(self.lan),
            mdns: partial.mdns.or(self.mdns),
            multicast: partial.multicast.or(self.multicast),
            awdl: partial.awdl.or(self.awdl),
        }
    }

    /// Translate into the SDK config for `platform`.
    ///
    /// AWDL is only applied on iOS.
    pub fn to_config(&self, platform: Platform) -> TransportConfig {
        let mut config = TransportConfig::default();
        if let Some(enabled) = self.bluetooth_le {
            config.bluetooth_le_enabled = enabled;
        }
        if let Some(enabled) = self.lan {
            config.lan_enabled = enabled;
        }
        if let Some(enabled) = self.mdns {
            config.lan_mdns_enabled = enabled;
        }
        if let Some(enabled) = self.multicast {
            config.lan_multicast_enabled = enabled;
        }
        if platform == Platform::Ios {
            if let Some(enabled) = self.awdl {
                config.awdl_enabled = enabled;
            }
        }
        config
    }
}

/// Peer-to-peer transport configuration handed to the SDK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TransportConfig {
    pub bluetooth_le_enabled: bool,
    pub lan_enabled: bool,
    pub lan_mdns_enabled: bool,
    pub lan_multicast_enabled: bool,
    pub awdl_enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_only_overrides_set_fields() {
        let base = TransportOptions::default();
        let partial = TransportOptions {
            bluetooth_le: Some(false),
            ..TransportOptions::unset()
        };
        let merged = base.merge(&partial);
        assert_eq!(merged.bluetooth_le, Some(false));
        assert_eq!(merged.lan, Some(true));
    }

    #[test]
    fn test_awdl_only_on_ios() {
        let options = TransportOptions::default();
        assert!(options.to_config(Platform::Ios).awdl_enabled);
        assert!(!options.to_config(Platform::Android).awdl_enabled);
        assert!(!options.to_config(Platform::Desktop).awdl_enabled);
    }

    #[test]
    fn test_unset_options_keep_defaults() {
        let config = TransportOptions::unset().to_config(Platform::Ios);
        assert_eq!(config, TransportConfig::default());
    }
}
