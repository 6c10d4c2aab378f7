//! Reading one bulk-create item and resolving its defaults.
//!
//! Everything here is pure. Catalog lookups happen afterwards, in
//! [`crate::create`].

use serde_json::Value;

use bulkparts_infra::PluginSettings;

use crate::coerce;
use crate::result::{ItemError, MissingFields};

/// Fields of one submitted item, as read from the JSON body.
///
/// Ids are kept raw: presence is judged on the raw value, and coercion to an
/// id happens only when the catalog is consulted.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRequest {
    pub category_id: Value,
    pub name: String,
    pub description: String,
    pub ipn: String,
    pub quantity: Value,
    pub location_id: Option<Value>,
}

impl ItemRequest {
    pub fn from_json(item: &Value) -> Result<Self, ItemError> {
        let Value::Object(fields) = item else {
            return Err(ItemError::ItemMustBeObject);
        };

        Ok(Self {
            category_id: fields.get("category_id").cloned().unwrap_or(Value::Null),
            name: coerce::trimmed_text(fields.get("name")),
            description: coerce::trimmed_text(fields.get("description")),
            ipn: coerce::trimmed_text(fields.get("ipn")),
            quantity: fields.get("quantity").cloned().unwrap_or(Value::Null),
            location_id: fields.get("location_id").cloned(),
        })
    }

    /// Check required fields and quantity, then fill in the default location.
    pub fn resolve(self, settings: &PluginSettings) -> Result<ResolvedItem, ItemError> {
        let has_category = coerce::is_truthy(&self.category_id);
        let has_name = !self.name.is_empty();
        if !has_category || !has_name {
            return Err(ItemError::MissingRequiredFields(MissingFields {
                category_id: has_category,
                name: has_name,
            }));
        }

        let quantity = match coerce::quantity(Some(&self.quantity)) {
            Some(q) if q >= 0 => q,
            _ => return Err(ItemError::InvalidQuantity),
        };

        let mut location_id = self.location_id;
        if coerce::is_unset_id(location_id.as_ref()) {
            if let Some(default) = settings.default_location() {
                location_id = Some(Value::from(default));
            }
        }

        let has_location = location_id.as_ref().is_some_and(coerce::is_truthy);
        if quantity > 0 && !has_location {
            return Err(ItemError::LocationRequiredForStockIn);
        }

        Ok(ResolvedItem {
            category_id: self.category_id,
            name: self.name,
            description: self.description,
            ipn: self.ipn,
            quantity,
            location_id: location_id.filter(coerce::is_truthy),
        })
    }
}

/// An item that passed the shape checks and has its location defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedItem {
    pub category_id: Value,
    pub name: String,
    pub description: String,
    pub ipn: String,
    pub quantity: i64,
    /// Present (truthy) location id, if any.
    pub location_id: Option<Value>,
}

impl ResolvedItem {
    pub fn wants_stock(&self) -> bool {
        self.quantity > 0
    }

    /// The location id to report back, when it reads as an integer.
    pub fn reported_location_id(&self) -> Option<i64> {
        self.location_id.as_ref().and_then(coerce::as_integer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings(default_location: i64) -> PluginSettings {
        PluginSettings {
            allow_create: true,
            default_stock_location_id: default_location,
        }
    }

    fn resolve(item: Value, default_location: i64) -> Result<ResolvedItem, ItemError> {
        ItemRequest::from_json(&item)?.resolve(&settings(default_location))
    }

    #[test]
    fn non_object_is_rejected() {
        assert_eq!(ItemRequest::from_json(&json!([1])), Err(ItemError::ItemMustBeObject));
        assert_eq!(ItemRequest::from_json(&json!("x")), Err(ItemError::ItemMustBeObject));
    }

    #[test]
    fn text_fields_are_trimmed_and_non_strings_blank() {
        let req = ItemRequest::from_json(&json!({
            "category_id": 1, "name": " Widget ", "description": null, "ipn": 42
        }))
        .unwrap();
        assert_eq!(req.name, "Widget");
        assert_eq!(req.description, "");
        assert_eq!(req.ipn, "");
    }

    #[test]
    fn missing_fields_reports_which_are_present() {
        assert_eq!(
            resolve(json!({"name": "A"}), 0),
            Err(ItemError::MissingRequiredFields(MissingFields {
                category_id: false,
                name: true
            }))
        );
        assert_eq!(
            resolve(json!({"category_id": 0, "name": "  "}), 0),
            Err(ItemError::MissingRequiredFields(MissingFields {
                category_id: false,
                name: false
            }))
        );
        assert_eq!(
            resolve(json!({"category_id": "3"}), 0),
            Err(ItemError::MissingRequiredFields(MissingFields {
                category_id: true,
                name: false
            }))
        );
    }

    #[test]
    fn quantity_must_be_a_non_negative_integer() {
        for bad in [json!(-1), json!("abc"), json!("-2"), json!([1]), json!({"n": 1})] {
            assert_eq!(
                resolve(json!({"category_id": 1, "name": "A", "quantity": bad}), 0),
                Err(ItemError::InvalidQuantity)
            );
        }

        let ok = resolve(json!({"category_id": 1, "name": "A", "quantity": " 4 ", "location_id": 2}), 0).unwrap();
        assert_eq!(ok.quantity, 4);
        let float = resolve(json!({"category_id": 1, "name": "A", "quantity": 2.7, "location_id": 2}), 0).unwrap();
        assert_eq!(float.quantity, 2);
    }

    #[test]
    fn default_location_fills_unset_ids_only() {
        let item = resolve(json!({"category_id": 1, "name": "A", "quantity": 3}), 9).unwrap();
        assert_eq!(item.location_id, Some(json!(9)));

        let blank = resolve(json!({"category_id": 1, "name": "A", "quantity": 3, "location_id": ""}), 9).unwrap();
        assert_eq!(blank.reported_location_id(), Some(9));

        let explicit = resolve(json!({"category_id": 1, "name": "A", "quantity": 3, "location_id": 4}), 9).unwrap();
        assert_eq!(explicit.reported_location_id(), Some(4));
    }

    #[test]
    fn stock_in_without_location_is_rejected() {
        assert_eq!(
            resolve(json!({"category_id": 1, "name": "A", "quantity": 3}), 0),
            Err(ItemError::LocationRequiredForStockIn)
        );
        // An explicit 0 is not "unset", so the default does not apply.
        assert_eq!(
            resolve(json!({"category_id": 1, "name": "A", "quantity": 3, "location_id": 0}), 9),
            Err(ItemError::LocationRequiredForStockIn)
        );
    }

    #[test]
    fn zero_quantity_needs_no_location() {
        let item = resolve(json!({"category_id": 1, "name": "A"}), 0).unwrap();
        assert!(!item.wants_stock());
        assert_eq!(item.reported_location_id(), None);
    }
}
