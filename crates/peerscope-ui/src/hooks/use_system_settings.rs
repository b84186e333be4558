//! System settings snapshot and search.

use chrono::{DateTime, Utc};
use dioxus::prelude::*;
use peerscope_core::{
    fetch_settings, SettingsSearch, SettingsSnapshot, SystemSetting, ToolsResult,
};
use tokio::time::Instant;

use crate::context::{use_instance, use_tools};

/// Settings as of the last refresh.
#[derive(Clone, Copy)]
pub struct SystemSettingsState {
    pub settings: Signal<Vec<SystemSetting>>,
    pub is_loading: Signal<bool>,
    pub error: Signal<Option<String>>,
    pub last_updated_at: Signal<Option<DateTime<Utc>>>,
    pub refresh: Callback<()>,
}

/// Settings list, error and timestamp after one fetch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SettingsLoad {
    pub settings: Vec<SystemSetting>,
    pub error: Option<String>,
    pub last_updated_at: Option<DateTime<Utc>>,
}

impl SettingsLoad {
    /// Apply a fetch result. A failure empties the list and keeps the time of
    /// the last successful fetch.
    pub fn from_fetch(
        outcome: ToolsResult<SettingsSnapshot>,
        previous_update: Option<DateTime<Utc>>,
    ) -> Self {
        match outcome {
            Ok(snapshot) => Self {
                settings: snapshot.settings,
                error: None,
                last_updated_at: Some(snapshot.last_updated_at),
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch system settings");
                Self {
                    settings: Vec::new(),
                    error: Some(e.to_string()),
                    last_updated_at: previous_update,
                }
            }
        }
    }
}

/// Load `SHOW ALL` once the instance is ready; `refresh` reloads it.
///
/// A failed refresh clears the list and sets `error`.
pub fn use_system_settings() -> SystemSettingsState {
    let handle = use_instance();
    let mut settings = use_signal(Vec::<SystemSetting>::new);
    let mut is_loading = use_signal(|| true);
    let mut error = use_signal(|| None::<String>);
    let mut last_updated_at = use_signal(|| None::<DateTime<Utc>>);

    let refresh = use_callback(move |_: ()| {
        let Some(instance) = handle.instance.peek().clone() else {
            return;
        };
        is_loading.set(true);
        error.set(None);

        spawn(async move {
            let outcome = fetch_settings(instance.store()).await;
            let load = SettingsLoad::from_fetch(outcome, *last_updated_at.peek());
            settings.set(load.settings);
            error.set(load.error);
            last_updated_at.set(load.last_updated_at);
            is_loading.set(false);
        });
    });

    use_effect(move || {
        if handle.instance.read().is_some() {
            refresh.call(());
        }
    });

    SystemSettingsState {
        settings,
        is_loading,
        error,
        last_updated_at,
        refresh,
    }
}

/// Debounced search over a settings list.
#[derive(Clone, Copy)]
pub struct SettingsSearchState {
    /// What the user typed
    pub term: Memo<String>,
    /// Term the filter currently uses
    pub applied: Memo<String>,
    /// Settings matching the applied term
    pub filtered: Memo<Vec<SystemSetting>>,
    pub set_term: Callback<String>,
}

pub fn use_settings_search(settings: Signal<Vec<SystemSetting>>) -> SettingsSearchState {
    let delay = use_tools().config.search_debounce();
    let mut search = use_signal(|| SettingsSearch::new(delay));

    let set_term = use_callback(move |term: String| {
        search.write().set_term(Instant::now(), term);
        let Some(deadline) = search.peek().deadline() else {
            return;
        };

        // Each keystroke schedules a poll; only the one after the last
        // keystroke finds the term due
        spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let due = search.peek().deadline().is_some_and(|d| d <= Instant::now());
            if due {
                search.write().poll(Instant::now());
            }
        });
    });

    let term = use_memo(move || search.read().term().to_string());
    let applied = use_memo(move || search.read().applied_term().to_string());
    let filtered = use_memo(move || search.read().filter(&settings.read()));

    SettingsSearchState {
        term,
        applied,
        filtered,
        set_term,
    }
}
