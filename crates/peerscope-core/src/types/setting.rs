//! System setting types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Display value of a system setting.
///
/// Booleans and numbers keep their type so the UI can style them; everything
/// else is rendered to text when the setting is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(b) => write!(f, "{}", b),
            SettingValue::Number(n) => write!(f, "{}", n),
            SettingValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Bool(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Number(value.into())
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Text(value.to_string())
    }
}

/// One row of the settings screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSetting {
    pub key: String,
    pub value: SettingValue,
}

impl SystemSetting {
    pub fn new(key: impl Into<String>, value: impl Into<SettingValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_value_display() {
        assert_eq!(SettingValue::Bool(true).to_string(), "true");
        assert_eq!(SettingValue::from(42).to_string(), "42");
        assert_eq!(SettingValue::from("on").to_string(), "on");
    }
}
