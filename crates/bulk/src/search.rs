//! Location typeahead used by the bulk form.

use serde::Serialize;
use tracing::instrument;

use bulkparts_core::LocationId;
use bulkparts_infra::{CatalogStore, StoreError};

/// Maximum number of locations returned for one query.
pub const LOCATION_SEARCH_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationHit {
    pub id: LocationId,
    /// Full display path (`Warehouse/Shelf A`).
    pub text: String,
}

/// Locations whose name contains `query`, case-insensitively, in tree order.
///
/// A blank query returns nothing and does not consult the store.
#[instrument(skip(store))]
pub async fn search_locations<S>(store: &S, query: &str) -> Result<Vec<LocationHit>, StoreError>
where
    S: CatalogStore + ?Sized,
{
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let locations = store.search_locations(query, LOCATION_SEARCH_LIMIT).await?;
    Ok(locations
        .into_iter()
        .map(|loc| LocationHit {
            id: loc.id,
            text: loc.display_path().to_string(),
        })
        .collect())
}
