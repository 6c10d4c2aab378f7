use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use bulkparts_catalog::{Category, Location, NewPart, NewStockItem, Part, StockItem};
use bulkparts_core::{CategoryId, LocationId};

/// Catalog store operation error.
///
/// These are **infrastructure errors**. Callers distinguish integrity
/// violations (constraint failures that a different input would avoid) from
/// everything else.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness, foreign-key or check constraint rejected the write.
    #[error("integrity violation: {0}")]
    Integrity(String),

    /// The transaction was already committed or rolled back.
    #[error("transaction already finished")]
    TransactionClosed,

    /// Any other backend failure (connection, lock poisoning, decoding...).
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_integrity(&self) -> bool {
        matches!(self, StoreError::Integrity(_))
    }
}

/// Read access to the host catalog plus a way to open write transactions.
///
/// ## Design Principles
///
/// - **Host-owned data**: this service never updates or deletes catalog rows;
///   it reads categories/locations and creates parts and stock items.
/// - **Tree order**: every listing of categories or locations is returned in
///   the host's depth-first tree order.
/// - **Narrow transactions**: [`CatalogStore::begin`] opens one transaction;
///   callers decide its scope (the batch creator uses one per item).
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Look up a category by id.
    async fn category(&self, id: CategoryId) -> Result<Option<Category>, StoreError>;

    /// Look up a stock location by id.
    async fn location(&self, id: LocationId) -> Result<Option<Location>, StoreError>;

    /// All categories, in tree order.
    async fn categories(&self) -> Result<Vec<Category>, StoreError>;

    /// All stock locations, in tree order.
    async fn locations(&self) -> Result<Vec<Location>, StoreError>;

    /// Locations whose name contains `needle` (case-insensitive), in tree
    /// order, at most `limit` of them.
    async fn search_locations(&self, needle: &str, limit: usize) -> Result<Vec<Location>, StoreError>;

    /// Open a write transaction.
    async fn begin(&self) -> Result<Box<dyn CatalogTransaction>, StoreError>;
}

/// One atomic unit of catalog writes.
///
/// Writes become visible only after [`CatalogTransaction::commit`]. Dropping
/// an unfinished transaction discards its writes.
#[async_trait]
pub trait CatalogTransaction: Send {
    async fn create_part(&mut self, part: NewPart) -> Result<Part, StoreError>;

    async fn create_stock_item(&mut self, item: NewStockItem) -> Result<StockItem, StoreError>;

    async fn commit(&mut self) -> Result<(), StoreError>;

    async fn rollback(&mut self) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    async fn category(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        (**self).category(id).await
    }

    async fn location(&self, id: LocationId) -> Result<Option<Location>, StoreError> {
        (**self).location(id).await
    }

    async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        (**self).categories().await
    }

    async fn locations(&self) -> Result<Vec<Location>, StoreError> {
        (**self).locations().await
    }

    async fn search_locations(&self, needle: &str, limit: usize) -> Result<Vec<Location>, StoreError> {
        (**self).search_locations(needle, limit).await
    }

    async fn begin(&self) -> Result<Box<dyn CatalogTransaction>, StoreError> {
        (**self).begin().await
    }
}
