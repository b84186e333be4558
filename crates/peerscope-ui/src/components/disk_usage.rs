//! Disk usage breakdown.

use dioxus::prelude::*;
use peerscope_core::format_bytes;

use crate::components::{Button, ButtonVariant, Loading, Notice, NoticeKind};
use crate::hooks::use_disk_usage;

/// Share of `part` in `total` as a CSS width, clamped to 0-100%.
pub fn bar_width(part: u64, total: u64) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    let pct = (part as f64 / total as f64 * 100.0).clamp(0.0, 100.0);
    format!("{:.1}%", pct)
}

#[component]
pub fn DiskUsage() -> Element {
    let usage = use_disk_usage();

    if *usage.is_loading.read() && usage.info.read().is_none() {
        return rsx! { Loading { label: "Reading disk usage..." } };
    }

    let info = usage.info.read().clone();

    rsx! {
        div { class: "disk-usage",
            if let Some(error) = usage.error.read().clone() {
                Notice { kind: NoticeKind::Error, message: error }
            }

            match info {
                None => rsx! {
                    div { class: "empty-state", p { "No disk usage reported yet" } }
                },
                Some(info) => {
                    let data = info.disk_usage.unwrap_or_default();
                    let items = data.items();
                    let store_total = items.iter().map(|i| i.size).sum::<u64>();
                    let store_label = format_bytes(store_total);
                    let rows: Vec<_> = items
                        .into_iter()
                        .map(|item| {
                            let width = bar_width(item.size, store_total);
                            (item, width)
                        })
                        .collect();
                    rsx! {
                        header { class: "disk-usage-header",
                            h3 { class: "section-title", "{info.device_name}" }
                            span { class: "disk-usage-total", "{store_label}" }
                        }
                        ul { class: "disk-usage-items",
                            for (item, width) in rows {
                                li { key: "{item.key}", class: "disk-usage-item",
                                    span { class: "disk-usage-key", "{item.key}" }
                                    span { class: "disk-usage-size", "{item.formatted_size}" }
                                    div { class: "disk-usage-bar",
                                        div {
                                            class: "disk-usage-fill",
                                            style: "width: {width}",
                                        }
                                    }
                                }
                            }
                        }
                        if let Some(at) = info.last_updated_at {
                            p { class: "disk-usage-updated", "Last updated {at}" }
                        }
                    }
                }
            }

            Button {
                variant: ButtonVariant::Ghost,
                onclick: move |_| usage.refresh.call(()),
                "Refresh"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_width_handles_zero_total() {
        assert_eq!(bar_width(10, 0), "0%");
        assert_eq!(bar_width(1, 4), "25.0%");
        assert_eq!(bar_width(4, 4), "100.0%");
    }
}
