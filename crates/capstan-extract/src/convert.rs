//! Per-parameter type coercion.
//!
//! Raw values arrive as strings from the path and query string, and as
//! arbitrary JSON values from the body. Conversion targets the parameter's
//! inner (non-optional) hint. A value whose runtime type already matches
//! the target is accepted unchanged; complex shapes (lists, records,
//! unconstrained values) pass through untouched and are the schema layer's
//! concern.

use capstan_schema::{ScalarKind, TypeDescriptor};
use serde_json::Value;

use crate::error::ResolveError;

/// Converts a raw value to the target descriptor.
///
/// Scalar rules: integer/float parse from text; booleans use the fixed
/// case-insensitive vocabulary {true,1,yes,on} / {false,0,no,off}; byte
/// sequences keep their UTF-8 text representation; text passes through.
/// Enumerated types check membership and report all valid members on
/// failure.
pub fn convert_value(
    raw: &Value,
    target: &TypeDescriptor,
    name: &str,
) -> Result<Value, ResolveError> {
    match target {
        TypeDescriptor::Optional(inner) => {
            if raw.is_null() {
                Ok(Value::Null)
            } else {
                convert_value(raw, inner, name)
            }
        }
        TypeDescriptor::Scalar(kind) => convert_scalar(raw, *kind, name),
        TypeDescriptor::Enum(en) => match raw {
            Value::String(s) if en.variants.iter().any(|v| v == s) => Ok(raw.clone()),
            other => Err(ResolveError::InvalidEnumMember {
                name: name.to_string(),
                value: raw_display(other),
                allowed: en.variants.clone(),
            }),
        },
        // Lists, records, and unconstrained values are not string-coerced;
        // the generated schema validates their shape.
        TypeDescriptor::List(_)
        | TypeDescriptor::Record(_)
        | TypeDescriptor::Any
        | TypeDescriptor::Opaque(_) => Ok(raw.clone()),
    }
}

fn convert_scalar(raw: &Value, kind: ScalarKind, name: &str) -> Result<Value, ResolveError> {
    // Only textual values need conversion; anything else either already
    // matches the target or is passed through for the schema to judge.
    let Value::String(text) = raw else {
        return Ok(raw.clone());
    };

    match kind {
        ScalarKind::Integer => {
            text.parse::<i64>()
                .map(Value::from)
                .map_err(|_| ResolveError::Conversion {
                    name: name.to_string(),
                    value: text.clone(),
                    target: "integer".to_string(),
                })
        }
        ScalarKind::Float => {
            text.parse::<f64>()
                .map(Value::from)
                .map_err(|_| ResolveError::Conversion {
                    name: name.to_string(),
                    value: text.clone(),
                    target: "float".to_string(),
                })
        }
        ScalarKind::Boolean => match text.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Value::Bool(true)),
            "false" | "0" | "no" | "off" => Ok(Value::Bool(false)),
            _ => Err(ResolveError::InvalidBoolean {
                name: name.to_string(),
                value: text.clone(),
            }),
        },
        // Text passes through; bytes keep their UTF-8 text carrier.
        ScalarKind::Text | ScalarKind::Bytes => Ok(raw.clone()),
    }
}

fn raw_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn convert(raw: Value, target: &TypeDescriptor) -> Result<Value, ResolveError> {
        convert_value(&raw, target, "param")
    }

    #[test]
    fn integer_round_trip() {
        assert_eq!(
            convert(json!("123"), &TypeDescriptor::integer()).unwrap(),
            json!(123)
        );
    }

    #[test]
    fn float_round_trip() {
        assert_eq!(
            convert(json!("19.99"), &TypeDescriptor::float()).unwrap(),
            json!(19.99)
        );
    }

    #[test]
    fn boolean_vocabulary() {
        for truthy in ["true", "True", "1", "yes", "on", "YES", "On"] {
            assert_eq!(
                convert(json!(truthy), &TypeDescriptor::boolean()).unwrap(),
                json!(true),
                "expected '{truthy}' to be true"
            );
        }
        for falsy in ["false", "False", "0", "no", "off", "NO", "Off"] {
            assert_eq!(
                convert(json!(falsy), &TypeDescriptor::boolean()).unwrap(),
                json!(false),
                "expected '{falsy}' to be false"
            );
        }
    }

    #[test]
    fn invalid_boolean_is_a_boolean_error() {
        let err = convert(json!("maybe"), &TypeDescriptor::boolean()).unwrap_err();
        assert_eq!(
            err,
            ResolveError::InvalidBoolean {
                name: "param".to_string(),
                value: "maybe".to_string(),
            }
        );
    }

    #[test]
    fn invalid_integer_names_value_and_target() {
        let err = convert(json!("not-a-number"), &TypeDescriptor::integer()).unwrap_err();
        assert_eq!(
            err,
            ResolveError::Conversion {
                name: "param".to_string(),
                value: "not-a-number".to_string(),
                target: "integer".to_string(),
            }
        );
    }

    #[test]
    fn already_typed_values_short_circuit() {
        assert_eq!(
            convert(json!(42), &TypeDescriptor::integer()).unwrap(),
            json!(42)
        );
        assert_eq!(
            convert(json!(true), &TypeDescriptor::boolean()).unwrap(),
            json!(true)
        );
    }

    #[test]
    fn text_and_bytes_pass_through() {
        assert_eq!(
            convert(json!("hello"), &TypeDescriptor::text()).unwrap(),
            json!("hello")
        );
        assert_eq!(
            convert(json!("raw-bytes"), &TypeDescriptor::bytes()).unwrap(),
            json!("raw-bytes")
        );
    }

    #[test]
    fn optional_unwraps_and_accepts_null() {
        let target = TypeDescriptor::optional(TypeDescriptor::integer());
        assert_eq!(convert(json!("7"), &target).unwrap(), json!(7));
        assert_eq!(convert(Value::Null, &target).unwrap(), Value::Null);
    }

    #[test]
    fn enum_membership() {
        let target = TypeDescriptor::enumeration("Status", vec!["Draft", "Published"]);
        assert_eq!(convert(json!("Draft"), &target).unwrap(), json!("Draft"));

        let err = convert(json!("deleted"), &target).unwrap_err();
        let ResolveError::InvalidEnumMember { allowed, .. } = &err else {
            panic!("expected enum error");
        };
        assert_eq!(allowed, &["Draft", "Published"]);
    }

    #[test]
    fn complex_values_pass_through() {
        let record = TypeDescriptor::record("P", vec![("x", TypeDescriptor::integer())]);
        let raw = json!({"x": 1, "y": 2});
        assert_eq!(convert(raw.clone(), &record).unwrap(), raw);

        let list = TypeDescriptor::list(TypeDescriptor::integer());
        assert_eq!(convert(json!([1, 2]), &list).unwrap(), json!([1, 2]));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_i64_text_round_trips(n in any::<i64>()) {
                let converted =
                    convert_value(&json!(n.to_string()), &TypeDescriptor::integer(), "n").unwrap();
                prop_assert_eq!(converted, json!(n));
            }

            #[test]
            fn finite_floats_round_trip(x in proptest::num::f64::NORMAL) {
                let converted =
                    convert_value(&json!(x.to_string()), &TypeDescriptor::float(), "x").unwrap();
                prop_assert_eq!(converted, json!(x));
            }

            #[test]
            fn text_is_never_rejected(s in ".*") {
                let converted =
                    convert_value(&json!(s.clone()), &TypeDescriptor::text(), "s").unwrap();
                prop_assert_eq!(converted, json!(s));
            }
        }
    }
}
