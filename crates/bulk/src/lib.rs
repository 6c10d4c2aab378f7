//! `bulkparts-bulk` — bulk part creation.
//!
//! - [`validate`]: dry-run validation of a `{"parts": [...]}` payload
//! - [`create`]: transactional, per-item creation from an `{"items": [...]}` body
//! - [`search`]: location typeahead
//! - [`page`]: context for the bulk form

pub mod coerce;
pub mod create;
pub mod error;
pub mod item;
pub mod page;
pub mod result;
pub mod search;
pub mod validate;

#[cfg(test)]
mod test_support;

pub use create::{bulk_create, create_item, create_items};
pub use error::BatchError;
pub use item::{ItemRequest, ResolvedItem};
pub use page::{PAGE_TITLE, PageContext, page_context};
pub use result::{BulkCreateResponse, Created, CreatedPart, CreatedStock, ItemError, ItemResult, MissingFields};
pub use search::{LOCATION_SEARCH_LIMIT, LocationHit, search_locations};
pub use validate::{DRY_RUN_ACTION, DryRunReport, NormalizedPart, PlanEntry, Validation, dry_run, validate_payload};
