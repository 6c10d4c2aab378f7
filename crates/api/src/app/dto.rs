use serde::Deserialize;
use serde_json::Value;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct SearchLocationsQuery {
    #[serde(default)]
    pub q: String,
}

/// Plugin action call: `{"action": "bulkproducts.dry_run", "data": {...}}`.
#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub action: String,
    #[serde(default)]
    pub data: Value,
}
