//! Data backing the bulk-products page.

use serde::Serialize;

use bulkparts_catalog::{Category, Location};
use bulkparts_infra::{CatalogStore, PluginSettings, SettingsError, StoreError};

pub const PAGE_TITLE: &str = "Bulk Products";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageContext {
    pub title: &'static str,
    pub categories: Vec<Category>,
    pub locations: Vec<Location>,
    /// `0` when no default is configured or settings cannot be read.
    pub default_location_id: i64,
}

/// Gather categories and locations (tree order) plus the default location.
pub async fn page_context<S>(
    store: &S,
    settings: Result<PluginSettings, SettingsError>,
) -> Result<PageContext, StoreError>
where
    S: CatalogStore + ?Sized,
{
    let categories = store.categories().await?;
    let locations = store.locations().await?;
    let default_location_id = settings
        .ok()
        .and_then(|s| s.default_location())
        .unwrap_or(0);

    Ok(PageContext {
        title: PAGE_TITLE,
        categories,
        locations,
        default_location_id,
    })
}
