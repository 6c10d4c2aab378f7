use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bulkparts_core::{DomainError, Entity, LocationId, PartId, StockItemId};

/// A created stock item: a quantity of one part held at one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    pub id: StockItemId,
    pub part_id: PartId,
    pub location_id: LocationId,
    pub quantity: Decimal,
}

impl Entity for StockItem {
    type Id = StockItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Values for a stock item that is about to be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStockItem {
    pub part_id: PartId,
    pub location_id: LocationId,
    pub quantity: Decimal,
}

impl NewStockItem {
    /// Stock-in a positive whole quantity of a part.
    pub fn new(part_id: PartId, location_id: LocationId, quantity: i64) -> Result<Self, DomainError> {
        if quantity <= 0 {
            return Err(DomainError::validation("stock quantity must be positive"));
        }

        Ok(Self {
            part_id,
            location_id,
            quantity: Decimal::from(quantity),
        })
    }

    pub fn into_stock_item(self, id: StockItemId) -> StockItem {
        StockItem {
            id,
            part_id: self.part_id,
            location_id: self.location_id,
            quantity: self.quantity,
        }
    }
}
