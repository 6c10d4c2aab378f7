//! Catalog domain module: the host-owned entities this service reads and
//! creates (categories, locations, parts, stock items).
//!
//! Pure data and invariants only (no IO, no HTTP, no storage).

pub mod category;
pub mod location;
pub mod part;
pub mod stock_item;
pub mod tree;

pub use category::Category;
pub use location::Location;
pub use part::{NewPart, Part};
pub use stock_item::{NewStockItem, StockItem};
pub use tree::{child_pathstring, tree_order, tree_sort_key};
