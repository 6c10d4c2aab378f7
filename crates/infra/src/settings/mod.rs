//! Plugin settings: the admin-editable switches consumed by bulk creation.
//!
//! Settings are read once per request into a [`PluginSettings`] snapshot and
//! passed explicitly to the code that needs them.

use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Snapshot of the plugin settings.
///
/// Serialized with the host's setting keys.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginSettings {
    /// Whether the bulk-create endpoint may write at all.
    #[serde(rename = "ALLOW_CREATE")]
    pub allow_create: bool,

    /// Location used for stock-in when an item names none; `0` means unset.
    #[serde(rename = "DEFAULT_STOCK_LOCATION_ID")]
    pub default_stock_location_id: i64,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            allow_create: true,
            default_stock_location_id: 0,
        }
    }
}

impl PluginSettings {
    /// The default stock location, if one is configured.
    pub fn default_location(&self) -> Option<i64> {
        (self.default_stock_location_id > 0).then_some(self.default_stock_location_id)
    }
}

/// Partial settings update; absent keys keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SettingsPatch {
    #[serde(default, rename = "ALLOW_CREATE")]
    pub allow_create: Option<bool>,

    #[serde(default, rename = "DEFAULT_STOCK_LOCATION_ID")]
    pub default_stock_location_id: Option<i64>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// The settings source cannot be read (the plugin is effectively not loaded).
    #[error("settings unavailable: {0}")]
    Unavailable(String),

    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Source of plugin settings.
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Result<PluginSettings, SettingsError>;

    /// Apply a partial update and return the resulting snapshot.
    fn update(&self, patch: SettingsPatch) -> Result<PluginSettings, SettingsError>;
}

/// Process-local settings store, seeded from configuration.
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    inner: RwLock<PluginSettings>,
}

impl InMemorySettingsStore {
    pub fn new(initial: PluginSettings) -> Self {
        Self {
            inner: RwLock::new(initial),
        }
    }
}

impl SettingsStore for InMemorySettingsStore {
    fn load(&self) -> Result<PluginSettings, SettingsError> {
        self.inner
            .read()
            .map(|s| *s)
            .map_err(|_| SettingsError::Unavailable("lock poisoned".to_string()))
    }

    fn update(&self, patch: SettingsPatch) -> Result<PluginSettings, SettingsError> {
        if let Some(id) = patch.default_stock_location_id {
            if id < 0 {
                return Err(SettingsError::Invalid {
                    key: "DEFAULT_STOCK_LOCATION_ID",
                    reason: "must be 0 (none) or a positive location id".to_string(),
                });
            }
        }

        let mut settings = self
            .inner
            .write()
            .map_err(|_| SettingsError::Unavailable("lock poisoned".to_string()))?;

        if let Some(allow) = patch.allow_create {
            settings.allow_create = allow;
        }
        if let Some(id) = patch.default_stock_location_id {
            settings.default_stock_location_id = id;
        }
        Ok(*settings)
    }
}
