//! Searchable system settings table.

use dioxus::prelude::*;
use peerscope_core::SettingValue;

use crate::components::{Button, ButtonVariant, Loading, Notice, NoticeKind};
use crate::hooks::{use_settings_search, use_system_settings};

fn value_class(value: &SettingValue) -> &'static str {
    match value {
        SettingValue::Bool(true) => "setting-value bool-true",
        SettingValue::Bool(false) => "setting-value bool-false",
        SettingValue::Number(_) => "setting-value number",
        SettingValue::Text(_) => "setting-value",
    }
}

/// Text shown when no setting is listed.
pub fn empty_message(term: &str) -> String {
    let term = term.trim();
    if term.is_empty() {
        "No settings found".to_string()
    } else {
        format!("No settings match \"{}\"", term)
    }
}

#[component]
pub fn SystemSettings() -> Element {
    let state = use_system_settings();
    let search = use_settings_search(state.settings);

    let updated = (*state.last_updated_at.read())
        .map(|at| at.format("%H:%M:%S").to_string());
    let total = state.settings.read().len();
    let shown = search.filtered.read().len();
    let empty = empty_message(&search.applied.read());

    if *state.is_loading.read() && total == 0 {
        return rsx! { Loading { label: "Loading settings..." } };
    }

    rsx! {
        div { class: "system-settings",
            div { class: "settings-toolbar",
                input {
                    class: "input settings-search",
                    r#type: "search",
                    placeholder: "Search settings",
                    value: "{search.term}",
                    oninput: move |evt| search.set_term.call(evt.value()),
                }
                Button {
                    variant: ButtonVariant::Ghost,
                    busy: *state.is_loading.read(),
                    onclick: move |_| state.refresh.call(()),
                    "Refresh"
                }
            }

            if let Some(error) = state.error.read().clone() {
                Notice { kind: NoticeKind::Error, message: error }
            }

            p { class: "settings-meta",
                "{shown} of {total} settings"
                if let Some(updated) = updated {
                    span { class: "settings-updated", " · updated {updated}" }
                }
            }

            if shown == 0 {
                div { class: "empty-state", "{empty}" }
            } else {
                table { class: "settings-table",
                    tbody {
                        for setting in search.filtered.read().iter() {
                            tr { key: "{setting.key}",
                                td { class: "setting-key", "{setting.key}" }
                                td { class: value_class(&setting.value), "{setting.value}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans_styled_by_value() {
        assert_eq!(value_class(&SettingValue::Bool(true)), "setting-value bool-true");
        assert_eq!(value_class(&"info".into()), "setting-value");
    }

    #[test]
    fn empty_message_names_search_term() {
        assert_eq!(empty_message(""), "No settings found");
        assert_eq!(empty_message("  "), "No settings found");
        assert_eq!(empty_message("zzz"), "No settings match \"zzz\"");
    }
}
