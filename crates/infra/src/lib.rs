//! Infrastructure layer: catalog persistence and plugin settings.

pub mod catalog_store;
pub mod settings;

pub use catalog_store::{
    CatalogStore, CatalogTransaction, InMemoryCatalogStore, PostgresCatalogStore, StoreError,
};
pub use settings::{InMemorySettingsStore, PluginSettings, SettingsError, SettingsPatch, SettingsStore};
