//! Dry-run validation of a bulk payload.
//!
//! The validator never touches the catalog. It checks shape only and reports
//! every problem it finds, together with the normalized items it could read.

use serde::Serialize;
use serde_json::Value;

use bulkparts_infra::PluginSettings;

/// One item as the validator understood it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedPart {
    pub name: String,
    pub ipn: Option<String>,
    pub description: String,
    /// Passed through untouched (`null` becomes `0`).
    pub quantity: Value,
}

/// Outcome of [`validate_payload`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validation {
    pub parts: Vec<NormalizedPart>,
    pub errors: Vec<String>,
}

impl Validation {
    /// Valid when nothing was reported and at least one item was read.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && !self.parts.is_empty()
    }
}

/// Validate a `{"parts": [...]}` payload.
///
/// Errors name items by 0-based position (`parts[2].name ...`). A non-object
/// element produces an error but no normalized entry, so `parts.len()` may be
/// smaller than the input length.
pub fn validate_payload(data: &Value) -> Validation {
    let mut out = Validation::default();

    let Value::Object(root) = data else {
        out.errors.push("data must be an object".to_string());
        return out;
    };

    let items = match root.get("parts") {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => {
            out.errors.push("data.parts must be a non-empty list".to_string());
            return out;
        }
    };

    for (idx, item) in items.iter().enumerate() {
        let Value::Object(fields) = item else {
            out.errors.push(format!("parts[{idx}] must be an object"));
            continue;
        };

        let name = fields.get("name");
        let name_ok = matches!(name, Some(Value::String(s)) if !s.trim().is_empty());
        if !name_ok {
            out.errors.push(format!("parts[{idx}].name is required"));
        }

        let ipn = match fields.get("ipn") {
            None | Some(Value::Null) => None,
            Some(v) => Some(v),
        };
        if let Some(v) = ipn {
            if !matches!(v, Value::String(s) if !s.trim().is_empty()) {
                out.errors.push(format!("parts[{idx}].ipn must be a non-empty string if provided"));
            }
        }

        let quantity = match fields.get("quantity") {
            None | Some(Value::Null) => Value::from(0),
            Some(v) => v.clone(),
        };
        if !is_non_negative_integer(&quantity) {
            out.errors.push(format!("parts[{idx}].quantity must be an integer >= 0"));
        }

        out.parts.push(NormalizedPart {
            name: match name {
                Some(Value::String(s)) => s.trim().to_string(),
                _ => String::new(),
            },
            ipn: match ipn {
                Some(Value::String(s)) => Some(s.trim().to_string()),
                _ => None,
            },
            description: match fields.get("description") {
                Some(Value::String(s)) => s.clone(),
                _ => String::new(),
            },
            quantity,
        });
    }

    out
}

/// JSON integers only; booleans and floats (even `5.0`) are rejected.
///
/// Stricter than the host plugin's own validator, which counts `true` and
/// `false` as integers.
fn is_non_negative_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_u64() || n.as_i64().is_some_and(|i| i >= 0),
        _ => false,
    }
}

/// Name under which the dry run is exposed as a plugin action.
pub const DRY_RUN_ACTION: &str = "bulkproducts.dry_run";

/// What a real run would do for one item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanEntry {
    pub create_part: PlannedPart,
    /// `null` when the item carries no stock.
    pub stock_in: Option<PlannedStock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedPart {
    pub name: String,
    pub ipn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedStock {
    pub quantity: Value,
}

/// Dry-run report for the plugin action endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DryRunReport {
    pub mode: &'static str,
    pub errors: Vec<String>,
    pub count: usize,
    pub plan: Vec<PlanEntry>,
    pub settings: PluginSettings,
    pub user: Option<String>,
}

impl DryRunReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty() && self.count > 0
    }
}

/// Validate `data` and describe what would be created, without writing.
pub fn dry_run(data: &Value, settings: PluginSettings, user: Option<String>) -> DryRunReport {
    let Validation { parts, errors } = validate_payload(data);

    let plan = parts
        .iter()
        .map(|p| PlanEntry {
            create_part: PlannedPart {
                name: p.name.clone(),
                ipn: p.ipn.clone(),
            },
            stock_in: crate::coerce::is_truthy(&p.quantity).then(|| PlannedStock {
                quantity: p.quantity.clone(),
            }),
        })
        .collect();

    DryRunReport {
        mode: "dry-run",
        errors,
        count: parts.len(),
        plan,
        settings,
        user,
    }
}
