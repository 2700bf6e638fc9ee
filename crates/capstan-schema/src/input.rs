//! Input validation schemas.
//!
//! An [`InputSchema`] carries one field per non-request parameter of a
//! handler. It is generated once at registration time; the host's upstream
//! validation step can run [`InputSchema::load`] over merged request data
//! and stash the result on the request handle for the bridge to pick up.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::descriptor::ScalarKind;
use crate::error::{LoadError, SchemaError};
use crate::field::{json_kind, FieldKind, FieldSchema};
use crate::signature::FunctionSignature;

/// One input field: shape, requiredness, and absent-value substitution.
#[derive(Debug, Clone, PartialEq)]
pub struct InputField {
    /// Wire shape of the field.
    pub schema: FieldSchema,
    /// True when the value must be supplied by the request.
    pub required: bool,
    /// Substituted when the value is absent. Optional parameters without an
    /// explicit default substitute `null`.
    pub default: Option<Value>,
}

/// Validation schema for a handler's input parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSchema {
    /// Schema name, derived from the function name.
    pub name: String,
    /// Fields in parameter declaration order.
    pub fields: IndexMap<String, InputField>,
}

/// Generates the input schema for a signature.
///
/// Field rules, per parameter:
/// - required parameter → required field, no default;
/// - parameter with an explicit default → field substituting that default
///   when absent (a `null` default also makes the field nullable);
/// - optional-typed parameter without a default → nullable field
///   substituting `null` when absent.
pub fn generate_input_schema(signature: &FunctionSignature) -> Result<InputSchema, SchemaError> {
    let mut fields = IndexMap::new();

    for (name, param) in signature.non_request_parameters() {
        let mut schema = FieldSchema::from_descriptor(param.hint(), name).map_err(|e| {
            SchemaError::Input {
                function: signature.function().to_string(),
                source: Box::new(e),
            }
        })?;

        let (required, default) = if let Some(default) = param.default() {
            if default.is_null() {
                schema.nullable = true;
            }
            (false, Some(default.clone()))
        } else if param.is_optional() {
            schema.nullable = true;
            (false, Some(Value::Null))
        } else {
            (true, None)
        };

        fields.insert(
            name.to_string(),
            InputField {
                schema,
                required,
                default,
            },
        );
    }

    Ok(InputSchema {
        name: format!("{}InputSchema", signature.function()),
        fields,
    })
}

impl InputSchema {
    /// Validates candidate data against the schema.
    ///
    /// Present values are shape-checked (scalar values supplied as strings
    /// are parsed, matching how path and query data arrive); absent values
    /// fall back to the field's default; absent required fields fail.
    /// Keys with no matching field are ignored: merged request data
    /// routinely carries more than the schema declares.
    pub fn load(&self, data: &Map<String, Value>) -> Result<Map<String, Value>, LoadError> {
        let mut out = Map::with_capacity(self.fields.len());

        for (name, field) in &self.fields {
            match data.get(name) {
                Some(value) => {
                    let checked = check_field(&field.schema, value, name)?;
                    out.insert(name.clone(), checked);
                }
                None => match &field.default {
                    Some(default) => {
                        out.insert(name.clone(), default.clone());
                    }
                    None => {
                        return Err(LoadError::MissingField { field: name.clone() });
                    }
                },
            }
        }

        Ok(out)
    }
}

fn check_field(schema: &FieldSchema, value: &Value, name: &str) -> Result<Value, LoadError> {
    if value.is_null() {
        if schema.nullable {
            return Ok(Value::Null);
        }
        return Err(LoadError::InvalidField {
            field: name.to_string(),
            reason: "value may not be null".to_string(),
        });
    }

    match &schema.kind {
        FieldKind::Scalar(kind) => check_scalar(*kind, value, name),
        FieldKind::Enum(en) => match value {
            Value::String(s) if en.variants.iter().any(|v| v == s) => Ok(value.clone()),
            _ => Err(LoadError::InvalidField {
                field: name.to_string(),
                reason: format!("expected one of {:?}", en.variants),
            }),
        },
        FieldKind::List(item) => match value {
            Value::Array(values) => {
                let checked: Result<Vec<_>, _> = values
                    .iter()
                    .map(|v| check_field(item, v, name))
                    .collect();
                Ok(Value::Array(checked?))
            }
            other => Err(LoadError::InvalidField {
                field: name.to_string(),
                reason: format!("expected an array, got {}", json_kind(other)),
            }),
        },
        FieldKind::Nested(record) => match value {
            Value::Object(map) => {
                let mut checked = Map::with_capacity(map.len());
                for (field_name, field_schema) in &record.fields {
                    match map.get(field_name) {
                        Some(v) => {
                            checked.insert(
                                field_name.clone(),
                                check_field(field_schema, v, field_name)?,
                            );
                        }
                        None if field_schema.nullable => {
                            checked.insert(field_name.clone(), Value::Null);
                        }
                        None => {
                            return Err(LoadError::MissingField {
                                field: field_name.clone(),
                            });
                        }
                    }
                }
                Ok(Value::Object(checked))
            }
            other => Err(LoadError::InvalidField {
                field: name.to_string(),
                reason: format!("expected an object, got {}", json_kind(other)),
            }),
        },
        FieldKind::Raw => Ok(value.clone()),
    }
}

fn check_scalar(kind: ScalarKind, value: &Value, name: &str) -> Result<Value, LoadError> {
    let invalid = |reason: String| LoadError::InvalidField {
        field: name.to_string(),
        reason,
    };

    match kind {
        ScalarKind::Integer => match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
            Value::String(s) => s
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| invalid(format!("cannot parse '{s}' as integer"))),
            other => Err(invalid(format!("expected integer, got {}", json_kind(other)))),
        },
        ScalarKind::Float => match value {
            Value::Number(_) => Ok(value.clone()),
            Value::String(s) => s
                .parse::<f64>()
                .map(Value::from)
                .map_err(|_| invalid(format!("cannot parse '{s}' as float"))),
            other => Err(invalid(format!("expected float, got {}", json_kind(other)))),
        },
        ScalarKind::Boolean => match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(s) => match s.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(Value::Bool(true)),
                "false" | "0" | "no" | "off" => Ok(Value::Bool(false)),
                _ => Err(invalid(format!("cannot parse '{s}' as boolean"))),
            },
            other => Err(invalid(format!("expected boolean, got {}", json_kind(other)))),
        },
        ScalarKind::Text | ScalarKind::Bytes => match value {
            Value::String(_) => Ok(value.clone()),
            other => Err(invalid(format!("expected string, got {}", json_kind(other)))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::{inspect, HandlerMetadata};
    use serde_json::json;

    fn schema_for(metadata: HandlerMetadata) -> InputSchema {
        let signature = inspect(&metadata).unwrap();
        generate_input_schema(&signature).unwrap()
    }

    fn object(value: Value) -> Map<String, Value> {
        let Value::Object(map) = value else {
            panic!("expected object")
        };
        map
    }

    #[test]
    fn required_default_and_optional_fields() {
        let schema = schema_for(
            HandlerMetadata::new("list_posts")
                .request()
                .param::<i64>("user_id")
                .param_with_default::<i64>("limit", json!(10))
                .param::<Option<String>>("search"),
        );

        assert_eq!(schema.name, "list_postsInputSchema");
        assert!(schema.fields["user_id"].required);
        assert_eq!(schema.fields["limit"].default, Some(json!(10)));
        assert_eq!(schema.fields["search"].default, Some(Value::Null));
        assert!(schema.fields["search"].schema.nullable);
    }

    #[test]
    fn load_substitutes_defaults_and_null() {
        let schema = schema_for(
            HandlerMetadata::new("list_posts")
                .request()
                .param::<i64>("user_id")
                .param_with_default::<i64>("limit", json!(10))
                .param::<Option<String>>("search"),
        );

        let loaded = schema.load(&object(json!({"user_id": "7"}))).unwrap();
        assert_eq!(loaded["user_id"], json!(7));
        assert_eq!(loaded["limit"], json!(10));
        assert_eq!(loaded["search"], Value::Null);
    }

    #[test]
    fn load_fails_on_missing_required() {
        let schema = schema_for(
            HandlerMetadata::new("get_user")
                .request()
                .param::<i64>("user_id"),
        );

        let err = schema.load(&object(json!({}))).unwrap_err();
        assert_eq!(
            err,
            LoadError::MissingField {
                field: "user_id".to_string()
            }
        );
    }

    #[test]
    fn load_parses_string_scalars() {
        let schema = schema_for(
            HandlerMetadata::new("f")
                .request()
                .param::<bool>("active")
                .param::<f64>("price"),
        );

        let loaded = schema
            .load(&object(json!({"active": "yes", "price": "19.99"})))
            .unwrap();
        assert_eq!(loaded["active"], json!(true));
        assert_eq!(loaded["price"], json!(19.99));
    }

    #[test]
    fn load_rejects_bad_scalars() {
        let schema = schema_for(HandlerMetadata::new("f").request().param::<i64>("n"));
        let err = schema.load(&object(json!({"n": "abc"}))).unwrap_err();
        assert!(matches!(err, LoadError::InvalidField { ref field, .. } if field == "n"));
    }

    #[test]
    fn load_ignores_unknown_keys() {
        let schema = schema_for(HandlerMetadata::new("f").request().param::<i64>("n"));
        let loaded = schema
            .load(&object(json!({"n": 1, "extra": "ignored"})))
            .unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(!loaded.contains_key("extra"));
    }

    #[test]
    fn load_checks_lists_and_nested_records() {
        use crate::descriptor::TypeDescriptor;

        let record = TypeDescriptor::record(
            "Point",
            vec![
                ("x", TypeDescriptor::integer()),
                ("y", TypeDescriptor::integer()),
            ],
        );
        let schema = schema_for(
            HandlerMetadata::new("f")
                .request()
                .hinted_param("tags", TypeDescriptor::list(TypeDescriptor::text()))
                .hinted_param("origin", record),
        );

        let loaded = schema
            .load(&object(json!({
                "tags": ["a", "b"],
                "origin": {"x": 1, "y": 2},
            })))
            .unwrap();
        assert_eq!(loaded["tags"], json!(["a", "b"]));
        assert_eq!(loaded["origin"], json!({"x": 1, "y": 2}));

        let err = schema
            .load(&object(json!({"tags": "nope", "origin": {"x": 1, "y": 2}})))
            .unwrap_err();
        assert!(matches!(err, LoadError::InvalidField { ref field, .. } if field == "tags"));
    }

    #[test]
    fn unsupported_parameter_type_fails_generation() {
        use crate::descriptor::TypeDescriptor;

        let metadata = HandlerMetadata::new("f")
            .request()
            .hinted_param("store", TypeDescriptor::opaque("DataStore"));
        let signature = inspect(&metadata).unwrap();

        let err = generate_input_schema(&signature).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("input schema"));
        assert!(message.contains("store"));
        assert!(message.contains("DataStore"));
    }
}
