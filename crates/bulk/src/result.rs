//! Per-item outcomes of a bulk create.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

use bulkparts_core::{PartId, StockItemId};

/// Which of the two required fields were present on a rejected item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct MissingFields {
    pub category_id: bool,
    pub name: bool,
}

/// Why one item was not created.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ItemError {
    #[error("item must be an object")]
    ItemMustBeObject,

    #[error("missing required fields (category_id present: {}, name present: {})", .0.category_id, .0.name)]
    MissingRequiredFields(MissingFields),

    #[error("quantity must be an integer >= 0")]
    InvalidQuantity,

    #[error("quantity > 0 requires a stock location")]
    LocationRequiredForStockIn,

    #[error("category does not exist")]
    InvalidCategory,

    #[error("location does not exist")]
    InvalidLocation,

    #[error("{0}")]
    Integrity(String),

    #[error("{0}")]
    Exception(String),
}

impl ItemError {
    pub fn code(&self) -> &'static str {
        match self {
            ItemError::ItemMustBeObject => "item_must_be_object",
            ItemError::MissingRequiredFields(_) => "missing_required_fields",
            ItemError::InvalidQuantity => "invalid_quantity",
            ItemError::LocationRequiredForStockIn => "location_required_for_stock_in",
            ItemError::InvalidCategory => "invalid_category",
            ItemError::InvalidLocation => "invalid_location",
            ItemError::Integrity(_) => "integrity_error",
            ItemError::Exception(_) => "exception",
        }
    }

    /// Backend message for write failures.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ItemError::Integrity(detail) | ItemError::Exception(detail) => Some(detail),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedPart {
    pub id: PartId,
    pub name: String,
    pub ipn: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedStock {
    /// `None` when the item had no quantity.
    pub id: Option<StockItemId>,
    pub quantity: i64,
    pub location_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub part: CreatedPart,
    pub stock_item: CreatedStock,
}

/// Result for the item at `index` of the submitted list.
///
/// Serializes as `{"index", "success": true, "part", "stock_item"}` or
/// `{"index", "success": false, "error", "detail"?, "fields"?}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemResult {
    pub index: usize,
    pub outcome: Result<Created, ItemError>,
}

impl ItemResult {
    pub fn success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn error(&self) -> Option<&ItemError> {
        self.outcome.as_ref().err()
    }
}

impl Serialize for ItemResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("index", &self.index)?;
        match &self.outcome {
            Ok(created) => {
                map.serialize_entry("success", &true)?;
                map.serialize_entry("part", &created.part)?;
                map.serialize_entry("stock_item", &created.stock_item)?;
            }
            Err(err) => {
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", err.code())?;
                if let Some(detail) = err.detail() {
                    map.serialize_entry("detail", detail)?;
                }
                if let ItemError::MissingRequiredFields(fields) = err {
                    map.serialize_entry("fields", fields)?;
                }
            }
        }
        map.end()
    }
}

/// Response body of the bulk-create endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkCreateResponse {
    pub results: Vec<ItemResult>,
}

impl BulkCreateResponse {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}
