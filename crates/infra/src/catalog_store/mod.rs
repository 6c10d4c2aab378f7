//! Catalog persistence: the host's categories, locations, parts and stock.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryCatalogStore;
pub use postgres::PostgresCatalogStore;
pub use r#trait::{CatalogStore, CatalogTransaction, StoreError};
