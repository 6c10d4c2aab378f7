//! Lenient readers for loosely-typed JSON form input.
//!
//! The bulk form posts whatever the browser collected: ids and quantities
//! may arrive as numbers, numeric strings, empty strings or `null`. These
//! helpers define how such values are interpreted.

use serde_json::Value;

/// Whether a value counts as "present".
///
/// `null`, `false`, zero, the empty string, and empty arrays/objects are
/// blank; everything else is present.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Trimmed text of an optional string field; blank or non-string → `""`.
pub fn trimmed_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        _ => String::new(),
    }
}

/// Interpret a value as an integer.
///
/// - integers as-is
/// - finite floats truncated toward zero
/// - `true`/`false` as 1/0
/// - strings trimmed and parsed as base-10 integers (an optional sign is allowed)
///
/// Anything else, or anything outside the `i64` range, is `None`.
pub fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else if n.is_u64() {
                None
            } else {
                n.as_f64().and_then(truncate_f64)
            }
        }
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn truncate_f64(f: f64) -> Option<i64> {
    if !f.is_finite() {
        return None;
    }
    let t = f.trunc();
    // i64::MAX is not exactly representable; compare against 2^63.
    if t < -9_223_372_036_854_775_808.0 || t >= 9_223_372_036_854_775_808.0 {
        return None;
    }
    Some(t as i64)
}

/// Quantity of an item: blank → 0, otherwise [`as_integer`].
pub fn quantity(value: Option<&Value>) -> Option<i64> {
    match value {
        Some(v) if is_truthy(v) => as_integer(v),
        _ => Some(0),
    }
}

/// Whether an optional id field was left empty (absent, `null` or `""`).
pub fn is_unset_id(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truthiness_matches_form_semantics() {
        for blank in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([]), json!({})] {
            assert!(!is_truthy(&blank), "{blank} should be blank");
        }
        for present in [json!(true), json!(3), json!(-1), json!("0"), json!(" "), json!([0]), json!({"a": 1})] {
            assert!(is_truthy(&present), "{present} should be present");
        }
    }

    #[test]
    fn trimmed_text_ignores_non_strings() {
        assert_eq!(trimmed_text(Some(&json!("  Widget "))), "Widget");
        assert_eq!(trimmed_text(Some(&json!(null))), "");
        assert_eq!(trimmed_text(Some(&json!(5))), "");
        assert_eq!(trimmed_text(None), "");
    }

    #[test]
    fn as_integer_accepts_numbers_strings_and_bools() {
        assert_eq!(as_integer(&json!(5)), Some(5));
        assert_eq!(as_integer(&json!(-2)), Some(-2));
        assert_eq!(as_integer(&json!(2.9)), Some(2));
        assert_eq!(as_integer(&json!(-2.9)), Some(-2));
        assert_eq!(as_integer(&json!(" 12 ")), Some(12));
        assert_eq!(as_integer(&json!("+7")), Some(7));
        assert_eq!(as_integer(&json!(true)), Some(1));
        assert_eq!(as_integer(&json!("1.5")), None);
        assert_eq!(as_integer(&json!("abc")), None);
        assert_eq!(as_integer(&json!([1])), None);
        assert_eq!(as_integer(&json!(null)), None);
        assert_eq!(as_integer(&json!(u64::MAX)), None);
    }

    #[test]
    fn quantity_defaults_blank_to_zero() {
        assert_eq!(quantity(None), Some(0));
        assert_eq!(quantity(Some(&json!(null))), Some(0));
        assert_eq!(quantity(Some(&json!(""))), Some(0));
        assert_eq!(quantity(Some(&json!("5"))), Some(5));
        assert_eq!(quantity(Some(&json!("five"))), None);
    }

    #[test]
    fn unset_id_is_absent_null_or_empty_string() {
        assert!(is_unset_id(None));
        assert!(is_unset_id(Some(&json!(null))));
        assert!(is_unset_id(Some(&json!(""))));
        assert!(!is_unset_id(Some(&json!(0))));
        assert!(!is_unset_id(Some(&json!("3"))));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: any i64 survives both numeric and string encodings.
            #[test]
            fn integers_round_trip_through_strings(n in any::<i64>()) {
                prop_assert_eq!(as_integer(&json!(n)), Some(n));
                prop_assert_eq!(as_integer(&json!(format!(" {n} "))), Some(n));
            }

            /// Property: truncation never moves away from zero.
            #[test]
            fn float_truncation_moves_toward_zero(f in -1.0e12f64..1.0e12f64) {
                let i = as_integer(&json!(f)).unwrap();
                prop_assert!((i as f64).abs() <= f.abs());
                prop_assert!((f - i as f64).abs() < 1.0);
            }
        }
    }
}
