//! Transactional bulk creation of parts and initial stock.
//!
//! Items are processed strictly in order. Each item gets its own catalog
//! transaction, so a failure on one item never undoes an earlier one.

use serde_json::Value;
use tracing::{info, instrument, warn};

use bulkparts_catalog::{Category, Location, NewPart, NewStockItem, Part, StockItem};
use bulkparts_core::{CategoryId, LocationId};
use bulkparts_infra::{CatalogStore, CatalogTransaction, PluginSettings, StoreError};

use crate::coerce;
use crate::error::BatchError;
use crate::item::{ItemRequest, ResolvedItem};
use crate::result::{BulkCreateResponse, Created, CreatedPart, CreatedStock, ItemError, ItemResult};

/// Parse a raw request body and create every item in it.
///
/// Batch-level checks run first and short-circuit: creation must be enabled,
/// the body must be JSON (an empty body reads as `{}`) and `items` must be a
/// non-empty list. Item failures are reported inline.
pub async fn bulk_create<S>(
    store: &S,
    settings: &PluginSettings,
    body: &[u8],
) -> Result<BulkCreateResponse, BatchError>
where
    S: CatalogStore + ?Sized,
{
    if !settings.allow_create {
        return Err(BatchError::CreationDisabled);
    }

    let payload = parse_body(body)?;
    let items = match payload.get("items") {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => return Err(BatchError::ItemsRequired),
    };

    Ok(create_items(store, settings, items).await)
}

fn parse_body(body: &[u8]) -> Result<Value, BatchError> {
    if body.is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_slice(body).map_err(|e| BatchError::InvalidJson(e.to_string()))
}

/// Create each item in order, one transaction per item.
#[instrument(skip_all, fields(items = items.len()))]
pub async fn create_items<S>(store: &S, settings: &PluginSettings, items: &[Value]) -> BulkCreateResponse
where
    S: CatalogStore + ?Sized,
{
    let mut results = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let outcome = create_item(store, settings, item).await;
        if let Err(err) = &outcome {
            warn!(index, error = err.code(), detail = err.detail(), "bulk item not created");
        }
        results.push(ItemResult { index, outcome });
    }

    let response = BulkCreateResponse { results };
    info!(
        created = response.succeeded(),
        failed = response.failed(),
        "bulk create finished"
    );
    response
}

/// Validate, resolve and persist a single item.
pub async fn create_item<S>(store: &S, settings: &PluginSettings, item: &Value) -> Result<Created, ItemError>
where
    S: CatalogStore + ?Sized,
{
    let item = ItemRequest::from_json(item)?.resolve(settings)?;

    let category = lookup_category(store, &item.category_id)
        .await
        .ok_or(ItemError::InvalidCategory)?;

    let location = if item.wants_stock() {
        let found = match &item.location_id {
            Some(raw) => lookup_location(store, raw).await,
            None => None,
        };
        Some(found.ok_or(ItemError::InvalidLocation)?)
    } else {
        None
    };

    let (part, stock_item) = persist(store, &item, &category, location.as_ref()).await?;

    Ok(Created {
        part: CreatedPart {
            id: part.id,
            name: part.name,
            ipn: part.ipn,
            url: part.canonical_url,
        },
        stock_item: CreatedStock {
            id: stock_item.map(|s| s.id),
            quantity: item.quantity,
            location_id: item.reported_location_id(),
        },
    })
}

// Lookup failures of any kind read as "does not exist".
async fn lookup_category<S>(store: &S, raw: &Value) -> Option<Category>
where
    S: CatalogStore + ?Sized,
{
    let id = CategoryId::new(coerce::as_integer(raw)?);
    match store.category(id).await {
        Ok(found) => found,
        Err(err) => {
            warn!(category_id = %id, error = %err, "category lookup failed");
            None
        }
    }
}

async fn lookup_location<S>(store: &S, raw: &Value) -> Option<Location>
where
    S: CatalogStore + ?Sized,
{
    let id = LocationId::new(coerce::as_integer(raw)?);
    match store.location(id).await {
        Ok(found) => found,
        Err(err) => {
            warn!(location_id = %id, error = %err, "location lookup failed");
            None
        }
    }
}

async fn persist<S>(
    store: &S,
    item: &ResolvedItem,
    category: &Category,
    location: Option<&Location>,
) -> Result<(Part, Option<StockItem>), ItemError>
where
    S: CatalogStore + ?Sized,
{
    let mut tx = store.begin().await.map_err(store_failure)?;

    match write(tx.as_mut(), item, category, location).await {
        Ok(created) => {
            tx.commit().await.map_err(store_failure)?;
            Ok(created)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}

async fn write(
    tx: &mut dyn CatalogTransaction,
    item: &ResolvedItem,
    category: &Category,
    location: Option<&Location>,
) -> Result<(Part, Option<StockItem>), ItemError> {
    let new_part = NewPart::new(&item.name, &item.description, category.id, &item.ipn)
        .map_err(|e| ItemError::Exception(e.to_string()))?;
    let part = tx.create_part(new_part).await.map_err(store_failure)?;

    let stock_item = match location {
        Some(location) if item.wants_stock() => {
            let new_stock = NewStockItem::new(part.id, location.id, item.quantity)
                .map_err(|e| ItemError::Exception(e.to_string()))?;
            Some(tx.create_stock_item(new_stock).await.map_err(store_failure)?)
        }
        _ => None,
    };

    Ok((part, stock_item))
}

fn store_failure(err: StoreError) -> ItemError {
    match err {
        StoreError::Integrity(detail) => ItemError::Integrity(detail),
        other => ItemError::Exception(other.to_string()),
    }
}
