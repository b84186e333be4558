//! System settings aggregation and search
//!
//! `SHOW ALL` returns rows in three different shapes depending on SDK
//! version and setting type. Each row is classified into a [`SettingsRow`]
//! before anything is read from it:
//!
//! | shape | example | yields |
//! |-------|---------|--------|
//! | nested value object | `{"value": {"a": 1, "b": "x"}}` | one setting per entry |
//! | explicit pair | `{"key": "c", "value": true}` | one setting |
//! | flat bag | `{"d": 2, "e": null}` | one setting per entry |

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tokio::time::Instant;

use crate::error::ToolsResult;
use crate::instance::Store;
use crate::query::{run_query, QueryExecutionResult};
use crate::throttle::Debouncer;
use crate::types::{SettingValue, SystemSetting};

/// Introspection statement listing every system setting
pub const SHOW_ALL: &str = "SHOW ALL";

/// Quiet period before a typed search term is applied
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// One `SHOW ALL` row, classified.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsRow {
    /// `value` holds an object (or array) of many settings
    Nested(Map<String, Value>),
    /// Explicit `key` and `value` fields
    Pair { key: String, value: Value },
    /// The row itself is a bag of settings
    Flat(Map<String, Value>),
}

impl SettingsRow {
    /// Classify a raw row. Non-object rows become an empty bag.
    pub fn parse(row: Value) -> Self {
        let Value::Object(mut fields) = row else {
            return SettingsRow::Flat(Map::new());
        };

        match fields.get("value") {
            Some(Value::Object(_)) => {
                if let Some(Value::Object(inner)) = fields.remove("value") {
                    return SettingsRow::Nested(inner);
                }
            }
            Some(Value::Array(_)) => {
                if let Some(Value::Array(items)) = fields.remove("value") {
                    let inner = items
                        .into_iter()
                        .enumerate()
                        .map(|(i, v)| (i.to_string(), v))
                        .collect();
                    return SettingsRow::Nested(inner);
                }
            }
            Some(_) if fields.contains_key("key") => {
                let key = match fields.remove("key") {
                    Some(Value::String(s)) => s,
                    Some(other) => other.to_string(),
                    None => String::new(),
                };
                let value = fields.remove("value").unwrap_or(Value::Null);
                return SettingsRow::Pair { key, value };
            }
            _ => {}
        }
        SettingsRow::Flat(fields)
    }

    /// Expand into `(key, raw value)` entries
    pub fn into_entries(self) -> Vec<(String, Value)> {
        match self {
            SettingsRow::Nested(map) | SettingsRow::Flat(map) => map.into_iter().collect(),
            SettingsRow::Pair { key, value } => vec![(key, value)],
        }
    }
}

/// Convert a raw value into its display form.
///
/// Booleans, numbers and strings pass through; null becomes `"null"`;
/// objects and arrays become compact JSON.
pub fn format_value(value: Value) -> SettingValue {
    match value {
        Value::Null => SettingValue::Text("null".to_string()),
        Value::Bool(b) => SettingValue::Bool(b),
        Value::Number(n) => SettingValue::Number(n),
        Value::String(s) => SettingValue::Text(s),
        other @ (Value::Array(_) | Value::Object(_)) => SettingValue::Text(other.to_string()),
    }
}

/// Merge rows of any shape into one list sorted by key, ignoring case.
///
/// When a key appears more than once the later row wins. Keys equal up to
/// case keep byte order.
pub fn aggregate_settings(rows: impl IntoIterator<Item = Value>) -> Vec<SystemSetting> {
    let mut merged: BTreeMap<String, SettingValue> = BTreeMap::new();
    for row in rows {
        for (key, value) in SettingsRow::parse(row).into_entries() {
            merged.insert(key, format_value(value));
        }
    }
    let mut settings: Vec<SystemSetting> = merged
        .into_iter()
        .map(|(key, value)| SystemSetting { key, value })
        .collect();
    settings.sort_by_cached_key(|s| (s.key.to_lowercase(), s.key.clone()));
    settings
}

/// Result of a settings fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsSnapshot {
    pub settings: Vec<SystemSetting>,
    pub last_updated_at: DateTime<Utc>,
}

/// Run `SHOW ALL` and aggregate the rows.
pub async fn fetch_settings(store: &dyn Store) -> ToolsResult<SettingsSnapshot> {
    let output = run_query(store, SHOW_ALL).await?;
    let rows = match output.result {
        QueryExecutionResult::Read { items, .. } => items,
        QueryExecutionResult::Mutation { .. } => Vec::new(),
    };
    let settings = aggregate_settings(rows);
    tracing::debug!(count = settings.len(), "System settings fetched");
    Ok(SettingsSnapshot {
        settings,
        last_updated_at: Utc::now(),
    })
}

/// Case-insensitive match on key or displayed value. Blank terms match all.
pub fn filter_settings(settings: &[SystemSetting], term: &str) -> Vec<SystemSetting> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return settings.to_vec();
    }
    settings
        .iter()
        .filter(|s| {
            s.key.to_lowercase().contains(&needle)
                || s.value.to_string().to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Search box state with a debounced applied term.
#[derive(Debug)]
pub struct SettingsSearch {
    term: String,
    applied: String,
    debounce: Debouncer<String>,
}

impl Default for SettingsSearch {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

impl SettingsSearch {
    pub fn new(delay: Duration) -> Self {
        Self {
            term: String::new(),
            applied: String::new(),
            debounce: Debouncer::new(delay),
        }
    }

    /// What the user has typed
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Term the filter currently uses
    pub fn applied_term(&self) -> &str {
        &self.applied
    }

    pub fn set_term(&mut self, now: Instant, term: impl Into<String>) {
        let term = term.into();
        self.term = term.clone();
        self.debounce.push(now, term);
    }

    /// When the pending term becomes due
    pub fn deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    /// Apply the typed term if the quiet period has passed.
    ///
    /// Returns true when the applied term changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.debounce.poll(now) {
            Some(term) if term != self.applied => {
                self.applied = term;
                true
            }
            _ => false,
        }
    }

    pub fn filter(&self, settings: &[SystemSetting]) -> Vec<SystemSetting> {
        filter_settings(settings, &self.applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_mixed_shapes_merge_sorted() {
        let settings = aggregate_settings(vec![
            json!({ "value": { "b": "x", "a": 1 } }),
            json!({ "key": "c", "value": true }),
        ]);
        assert_eq!(
            settings,
            vec![
                SystemSetting::new("a", 1),
                SystemSetting::new("b", "x"),
                SystemSetting::new("c", true),
            ]
        );
    }

    #[test]
    fn test_keys_sort_ignoring_case() {
        let settings = aggregate_settings(vec![json!({
            "Zeta": 1,
            "alpha": 2,
            "a": 3,
            "A": 4
        })]);
        let keys: Vec<&str> = settings.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["A", "a", "alpha", "Zeta"]);
    }

    #[test]
    fn test_flat_bag_and_value_formatting() {
        let settings = aggregate_settings(vec![json!({
            "zeta": null,
            "alpha": { "nested": [1, 2] },
            "mid": 2.5
        })]);
        assert_eq!(settings[0].key, "alpha");
        assert_eq!(settings[0].value, SettingValue::Text("{\"nested\":[1,2]}".into()));
        assert_eq!(settings[1].value.to_string(), "2.5");
        assert_eq!(settings[2].value, SettingValue::Text("null".into()));
    }

    #[test]
    fn test_row_classification() {
        assert!(matches!(
            SettingsRow::parse(json!({ "value": { "a": 1 } })),
            SettingsRow::Nested(_)
        ));
        assert!(matches!(
            SettingsRow::parse(json!({ "key": "k", "value": null })),
            SettingsRow::Pair { .. }
        ));
        // A scalar value without a key is just another flat entry
        assert!(matches!(
            SettingsRow::parse(json!({ "value": 5 })),
            SettingsRow::Flat(ref m) if m["value"] == 5
        ));
        assert_eq!(SettingsRow::parse(json!("oops")), SettingsRow::Flat(Map::new()));
    }

    #[test]
    fn test_non_string_key_is_stringified() {
        let settings = aggregate_settings(vec![json!({ "key": 7, "value": "seven" })]);
        assert_eq!(settings, vec![SystemSetting::new("7", "seven")]);
    }

    #[test]
    fn test_later_row_wins_on_duplicate_key() {
        let settings = aggregate_settings(vec![
            json!({ "key": "k", "value": 1 }),
            json!({ "k": 2 }),
        ]);
        assert_eq!(settings, vec![SystemSetting::new("k", 2)]);
    }

    #[test]
    fn test_filter_matches_key_or_value() {
        let settings = vec![
            SystemSetting::new("mesh_chooser_max_active", 4),
            SystemSetting::new("transport_ble", true),
            SystemSetting::new("log_level", "Debug"),
        ];
        assert_eq!(filter_settings(&settings, "MESH").len(), 1);
        assert_eq!(filter_settings(&settings, "debug")[0].key, "log_level");
        assert_eq!(filter_settings(&settings, "TRUE")[0].key, "transport_ble");
        assert_eq!(filter_settings(&settings, "   ").len(), 3);
    }

    #[test]
    fn test_search_applies_after_debounce() {
        let t0 = Instant::now();
        let settings = vec![SystemSetting::new("a", 1), SystemSetting::new("b", 2)];
        let mut search = SettingsSearch::default();

        search.set_term(t0, "b");
        assert_eq!(search.term(), "b");
        assert!(!search.poll(t0 + Duration::from_millis(100)));
        assert_eq!(search.filter(&settings).len(), 2);

        assert!(search.poll(t0 + SEARCH_DEBOUNCE));
        assert_eq!(search.applied_term(), "b");
        assert_eq!(search.filter(&settings), vec![SystemSetting::new("b", 2)]);
    }

    proptest! {
        #[test]
        fn prop_aggregate_sorted_and_unique(rows in proptest::collection::vec(
            proptest::collection::btree_map("[a-e]{1,2}", 0i64..100, 0..5), 0..6)
        ) {
            let raw: Vec<Value> = rows.iter().map(|m| json!(m)).collect();
            let settings = aggregate_settings(raw);
            for pair in settings.windows(2) {
                prop_assert!(pair[0].key < pair[1].key);
            }
        }
    }
}
