//! Store wrappers shared by the unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use bulkparts_catalog::{Category, Location, NewPart, NewStockItem, Part, StockItem};
use bulkparts_core::{CategoryId, LocationId};
use bulkparts_infra::{CatalogStore, CatalogTransaction, InMemoryCatalogStore, StoreError};

/// Counts store calls and, with `fail_stock`, fails every stock write.
pub(crate) struct FlakyStore {
    pub(crate) inner: InMemoryCatalogStore,
    pub(crate) calls: Arc<AtomicUsize>,
    pub(crate) fail_stock: bool,
}

impl FlakyStore {
    /// A passthrough wrapper that only counts.
    pub(crate) fn counting(inner: InMemoryCatalogStore) -> Self {
        Self {
            inner,
            calls: Arc::new(AtomicUsize::new(0)),
            fail_stock: false,
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

struct FlakyTransaction {
    inner: Box<dyn CatalogTransaction>,
    fail_stock: bool,
}

#[async_trait]
impl CatalogStore for FlakyStore {
    async fn category(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.category(id).await
    }

    async fn location(&self, id: LocationId) -> Result<Option<Location>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.location(id).await
    }

    async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.categories().await
    }

    async fn locations(&self) -> Result<Vec<Location>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.locations().await
    }

    async fn search_locations(&self, needle: &str, limit: usize) -> Result<Vec<Location>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.search_locations(needle, limit).await
    }

    async fn begin(&self) -> Result<Box<dyn CatalogTransaction>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FlakyTransaction {
            inner: self.inner.begin().await?,
            fail_stock: self.fail_stock,
        }))
    }
}

#[async_trait]
impl CatalogTransaction for FlakyTransaction {
    async fn create_part(&mut self, part: NewPart) -> Result<Part, StoreError> {
        self.inner.create_part(part).await
    }

    async fn create_stock_item(&mut self, item: NewStockItem) -> Result<StockItem, StoreError> {
        if self.fail_stock {
            return Err(StoreError::Backend("disk full".to_string()));
        }
        self.inner.create_stock_item(item).await
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        self.inner.commit().await
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        self.inner.rollback().await
    }
}
