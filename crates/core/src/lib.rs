//! `bulkparts-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;

pub use entity::{Entity, TreeNode};
pub use error::DomainError;
pub use id::{CategoryId, LocationId, PartId, StockItemId};
