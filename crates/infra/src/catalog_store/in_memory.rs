use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use bulkparts_catalog::{
    Category, Location, NewPart, NewStockItem, Part, StockItem, child_pathstring, tree_order,
};
use bulkparts_core::{CategoryId, LocationId, PartId, StockItemId};

use super::r#trait::{CatalogStore, CatalogTransaction, StoreError};

#[derive(Debug, Default)]
struct CatalogState {
    categories: BTreeMap<CategoryId, Category>,
    locations: BTreeMap<LocationId, Location>,
    parts: BTreeMap<PartId, Part>,
    stock_items: BTreeMap<StockItemId, StockItem>,
}

impl CatalogState {
    fn has_part_key(&self, name: &str, ipn: &str) -> bool {
        self.parts.values().any(|p| p.name == name && p.ipn == ipn)
    }
}

#[derive(Debug)]
struct Inner {
    state: RwLock<CatalogState>,
    next_category_id: AtomicI64,
    next_location_id: AtomicI64,
    next_part_id: AtomicI64,
    next_stock_item_id: AtomicI64,
    part_url_prefix: Option<String>,
}

impl Inner {
    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, CatalogState>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, CatalogState>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    fn part_url(&self, id: PartId) -> Option<String> {
        self.part_url_prefix.as_ref().map(|prefix| format!("{prefix}{id}/"))
    }
}

/// In-memory catalog.
///
/// Intended for tests/dev. Mirrors the host's integrity rules that matter to
/// bulk creation:
/// - a part's `(name, IPN)` pair is unique
/// - parts reference an existing category
/// - stock items reference an existing part and location
///
/// Identifiers come from monotonically increasing counters; ids handed out
/// to rolled-back writes are never reused (like database sequences).
#[derive(Debug, Clone)]
pub struct InMemoryCatalogStore {
    inner: Arc<Inner>,
}

impl Default for InMemoryCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::with_part_url_prefix(None)
    }

    /// Created parts get `canonical_url = "{prefix}{id}/"` when a prefix is set.
    pub fn with_part_url_prefix(prefix: Option<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(CatalogState::default()),
                next_category_id: AtomicI64::new(1),
                next_location_id: AtomicI64::new(1),
                next_part_id: AtomicI64::new(1),
                next_stock_item_id: AtomicI64::new(1),
                part_url_prefix: prefix,
            }),
        }
    }

    /// Add a category (seeding; the host owns category management).
    pub fn add_category(
        &self,
        name: impl Into<String>,
        parent_id: Option<CategoryId>,
    ) -> Result<Category, StoreError> {
        let name = name.into();
        let mut state = self.inner.write()?;

        let parent_path = match parent_id {
            Some(pid) => Some(
                state
                    .categories
                    .get(&pid)
                    .map(|c| c.pathstring.clone())
                    .ok_or_else(|| StoreError::Integrity(format!("parent category {pid} does not exist")))?,
            ),
            None => None,
        };

        let id = CategoryId::new(self.inner.next_category_id.fetch_add(1, Ordering::SeqCst));
        let category = Category {
            id,
            pathstring: child_pathstring(parent_path.as_deref(), &name),
            name,
            description: String::new(),
            parent_id,
        };
        state.categories.insert(id, category.clone());
        Ok(category)
    }

    /// Add a stock location (seeding; the host owns location management).
    pub fn add_location(
        &self,
        name: impl Into<String>,
        parent_id: Option<LocationId>,
    ) -> Result<Location, StoreError> {
        let name = name.into();
        let mut state = self.inner.write()?;

        let parent_path = match parent_id {
            Some(pid) => Some(
                state
                    .locations
                    .get(&pid)
                    .map(|l| l.pathstring.clone())
                    .ok_or_else(|| StoreError::Integrity(format!("parent location {pid} does not exist")))?,
            ),
            None => None,
        };

        let id = LocationId::new(self.inner.next_location_id.fetch_add(1, Ordering::SeqCst));
        let location = Location {
            id,
            pathstring: child_pathstring(parent_path.as_deref(), &name),
            name,
            description: String::new(),
            parent_id,
        };
        state.locations.insert(id, location.clone());
        Ok(location)
    }

    /// Committed parts, by id.
    pub fn parts(&self) -> Vec<Part> {
        match self.inner.read() {
            Ok(state) => state.parts.values().cloned().collect(),
            Err(_) => vec![],
        }
    }

    /// Committed stock items, by id.
    pub fn stock_items(&self) -> Vec<StockItem> {
        match self.inner.read() {
            Ok(state) => state.stock_items.values().cloned().collect(),
            Err(_) => vec![],
        }
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn category(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        Ok(self.inner.read()?.categories.get(&id).cloned())
    }

    async fn location(&self, id: LocationId) -> Result<Option<Location>, StoreError> {
        Ok(self.inner.read()?.locations.get(&id).cloned())
    }

    async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        let all: Vec<Category> = self.inner.read()?.categories.values().cloned().collect();
        Ok(tree_order(&all))
    }

    async fn locations(&self) -> Result<Vec<Location>, StoreError> {
        let all: Vec<Location> = self.inner.read()?.locations.values().cloned().collect();
        Ok(tree_order(&all))
    }

    async fn search_locations(&self, needle: &str, limit: usize) -> Result<Vec<Location>, StoreError> {
        let needle = needle.to_lowercase();
        let all: Vec<Location> = self.inner.read()?.locations.values().cloned().collect();

        Ok(tree_order(&all)
            .into_iter()
            .filter(|l| l.name.to_lowercase().contains(&needle))
            .take(limit)
            .collect())
    }

    async fn begin(&self) -> Result<Box<dyn CatalogTransaction>, StoreError> {
        Ok(Box::new(InMemoryTransaction {
            inner: self.inner.clone(),
            parts: Vec::new(),
            stock_items: Vec::new(),
            finished: false,
        }))
    }
}

/// Buffered writes applied atomically on commit.
struct InMemoryTransaction {
    inner: Arc<Inner>,
    parts: Vec<Part>,
    stock_items: Vec<StockItem>,
    finished: bool,
}

impl InMemoryTransaction {
    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.finished {
            Err(StoreError::TransactionClosed)
        } else {
            Ok(())
        }
    }

    fn duplicate_part(name: &str, ipn: &str) -> StoreError {
        StoreError::Integrity(format!(
            "duplicate key value violates unique constraint \"part_name_ipn\": (name, ipn)=({name}, {ipn})"
        ))
    }
}

#[async_trait]
impl CatalogTransaction for InMemoryTransaction {
    async fn create_part(&mut self, part: NewPart) -> Result<Part, StoreError> {
        self.ensure_open()?;

        {
            let state = self.inner.read()?;
            if !state.categories.contains_key(&part.category_id) {
                return Err(StoreError::Integrity(format!(
                    "category {} does not exist",
                    part.category_id
                )));
            }
            let staged_dup = self.parts.iter().any(|p| p.name == part.name && p.ipn == part.ipn);
            if staged_dup || state.has_part_key(&part.name, &part.ipn) {
                return Err(Self::duplicate_part(&part.name, &part.ipn));
            }
        }

        let id = PartId::new(self.inner.next_part_id.fetch_add(1, Ordering::SeqCst));
        let created = part.into_part(id, self.inner.part_url(id));
        self.parts.push(created.clone());
        Ok(created)
    }

    async fn create_stock_item(&mut self, item: NewStockItem) -> Result<StockItem, StoreError> {
        self.ensure_open()?;

        if item.quantity.is_sign_negative() {
            return Err(StoreError::Integrity("stock quantity must not be negative".to_string()));
        }

        {
            let state = self.inner.read()?;
            let part_known = self.parts.iter().any(|p| p.id == item.part_id)
                || state.parts.contains_key(&item.part_id);
            if !part_known {
                return Err(StoreError::Integrity(format!("part {} does not exist", item.part_id)));
            }
            if !state.locations.contains_key(&item.location_id) {
                return Err(StoreError::Integrity(format!(
                    "location {} does not exist",
                    item.location_id
                )));
            }
        }

        let id = StockItemId::new(self.inner.next_stock_item_id.fetch_add(1, Ordering::SeqCst));
        let created = item.into_stock_item(id);
        self.stock_items.push(created.clone());
        Ok(created)
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.finished = true;

        let parts = std::mem::take(&mut self.parts);
        let stock_items = std::mem::take(&mut self.stock_items);

        let mut state = self.inner.write()?;

        // Another transaction may have committed the same key since staging.
        for p in &parts {
            if state.has_part_key(&p.name, &p.ipn) {
                return Err(Self::duplicate_part(&p.name, &p.ipn));
            }
        }

        for p in parts {
            state.parts.insert(p.id, p);
        }
        for s in stock_items {
            state.stock_items.insert(s.id, s);
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.finished = true;
        self.parts.clear();
        self.stock_items.clear();
        Ok(())
    }
}
