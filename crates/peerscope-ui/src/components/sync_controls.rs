//! Sync start/stop and transport toggles.

use dioxus::prelude::*;
use peerscope_core::TransportOptions;

use crate::components::{Button, ButtonVariant, Notice, NoticeKind};
use crate::hooks::use_sync_controls;

/// A transport toggle row.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Transport {
    BluetoothLe,
    Lan,
    Mdns,
    Multicast,
    Awdl,
}

impl Transport {
    pub const ALL: [Transport; 5] = [
        Transport::BluetoothLe,
        Transport::Lan,
        Transport::Mdns,
        Transport::Multicast,
        Transport::Awdl,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Transport::BluetoothLe => "Bluetooth LE",
            Transport::Lan => "LAN",
            Transport::Mdns => "mDNS",
            Transport::Multicast => "Multicast",
            Transport::Awdl => "AWDL",
        }
    }

    pub fn enabled(&self, options: &TransportOptions) -> bool {
        let value = match self {
            Transport::BluetoothLe => options.bluetooth_le,
            Transport::Lan => options.lan,
            Transport::Mdns => options.mdns,
            Transport::Multicast => options.multicast,
            Transport::Awdl => options.awdl,
        };
        value.unwrap_or(false)
    }

    /// Partial options flipping just this transport
    pub fn set(&self, enabled: bool) -> TransportOptions {
        let mut partial = TransportOptions::unset();
        match self {
            Transport::BluetoothLe => partial.bluetooth_le = Some(enabled),
            Transport::Lan => partial.lan = Some(enabled),
            Transport::Mdns => partial.mdns = Some(enabled),
            Transport::Multicast => partial.multicast = Some(enabled),
            Transport::Awdl => partial.awdl = Some(enabled),
        }
        partial
    }
}

#[component]
pub fn SyncControlsPanel() -> Element {
    let sync = use_sync_controls();
    let controls = sync.controls.read().clone();
    let options = controls.transport_options();
    let syncing = controls.is_syncing();

    let transports: Vec<Transport> = Transport::ALL
        .into_iter()
        .filter(|t| *t != Transport::Awdl || controls.supports_awdl())
        .collect();

    rsx! {
        div { class: "sync-controls",
            div { class: "sync-status",
                span { class: if syncing { "status-dot active" } else { "status-dot" } }
                span { class: "status-label", if syncing { "Syncing" } else { "Sync stopped" } }
                Button {
                    variant: if syncing { ButtonVariant::Danger } else { ButtonVariant::Primary },
                    onclick: move |_| sync.toggle_sync.call(()),
                    if syncing { "Stop Sync" } else { "Start Sync" }
                }
            }

            if let Some(error) = sync.error.read().clone() {
                Notice { kind: NoticeKind::Error, message: error }
            }

            ul { class: "transport-list",
                for transport in transports {
                    {
                        let on = transport.enabled(&options);
                        let label = transport.label();
                        rsx! {
                            li { key: "{label}", class: "transport-row",
                                span { class: "transport-label", "{label}" }
                                Button {
                                    variant: ButtonVariant::Chip,
                                    class: if on { "on".to_string() } else { "off".to_string() },
                                    onclick: move |_| sync.update_transports.call(transport.set(!on)),
                                    if on { "On" } else { "Off" }
                                }
                            }
                        }
                    }
                }
            }

            div { class: "transport-presets",
                Button {
                    variant: ButtonVariant::Ghost,
                    onclick: move |_| sync.battery_saving.call(()),
                    "Battery Saving"
                }
                Button {
                    variant: ButtonVariant::Ghost,
                    onclick: move |_| sync.high_performance.call(()),
                    "High Performance"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_touches_only_one_transport() {
        let partial = Transport::Mdns.set(false);
        assert_eq!(partial.mdns, Some(false));
        assert_eq!(partial.lan, None);
        assert_eq!(partial.bluetooth_le, None);
    }

    #[test]
    fn unset_reads_as_disabled() {
        assert!(!Transport::Lan.enabled(&TransportOptions::unset()));
        assert!(Transport::Lan.enabled(&TransportOptions::default()));
    }
}
