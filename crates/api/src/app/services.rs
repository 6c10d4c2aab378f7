//! Service wiring: which catalog and settings stores back the API.

use std::sync::Arc;

use anyhow::Context;
use secrecy::ExposeSecret;
use sqlx::PgPool;

use bulkparts_infra::{
    CatalogStore, InMemoryCatalogStore, InMemorySettingsStore, PostgresCatalogStore, SettingsStore, StoreError,
};

use crate::config::AppConfig;

/// Shared per-process services, injected into handlers as an `Extension`.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<dyn CatalogStore>,
    pub settings: Arc<dyn SettingsStore>,
}

impl AppServices {
    pub fn new(catalog: Arc<dyn CatalogStore>, settings: Arc<dyn SettingsStore>) -> Self {
        Self { catalog, settings }
    }
}

/// Build services from configuration.
///
/// With `DATABASE_URL` set the host's Postgres catalog is used; otherwise a
/// small in-memory demo catalog is seeded.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let settings: Arc<dyn SettingsStore> = Arc::new(InMemorySettingsStore::new(config.settings));

    let catalog: Arc<dyn CatalogStore> = match &config.database_url {
        Some(url) => {
            let pool = PgPool::connect(url.expose_secret())
                .await
                .context("failed to connect to Postgres")?;
            tracing::info!("using Postgres catalog store");
            Arc::new(PostgresCatalogStore::new(pool, config.part_url_prefix.clone()))
        }
        None => {
            let store = InMemoryCatalogStore::with_part_url_prefix(config.part_url_prefix.clone());
            seed_demo_catalog(&store).context("failed to seed in-memory catalog")?;
            tracing::warn!("DATABASE_URL not set; using in-memory demo catalog");
            Arc::new(store)
        }
    };

    Ok(AppServices::new(catalog, settings))
}

fn seed_demo_catalog(store: &InMemoryCatalogStore) -> Result<(), StoreError> {
    let electronics = store.add_category("Electronics", None)?;
    store.add_category("Passives", Some(electronics.id))?;
    store.add_category("Mechanical", None)?;

    let warehouse = store.add_location("Warehouse", None)?;
    store.add_location("Shelf A", Some(warehouse.id))?;
    store.add_location("Shelf B", Some(warehouse.id))?;
    Ok(())
}
