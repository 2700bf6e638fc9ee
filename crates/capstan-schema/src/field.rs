//! Field descriptor trees and record serialization.
//!
//! A [`FieldSchema`] is the wire-level shape compiled from a
//! [`TypeDescriptor`]: optional wrappers are unwrapped into a `nullable`
//! flag, lists wrap their item schema, and records become nested
//! [`RecordSchema`] trees. Schemas are generated once at registration time
//! and shared read-only across requests.

use indexmap::IndexMap;
use serde_json::Value;

use crate::descriptor::{classify, EnumDescriptor, RecordDescriptor, ScalarKind, TypeClass, TypeDescriptor};
use crate::error::{DumpError, SchemaError};

/// Shape of one field on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Primitive scalar.
    Scalar(ScalarKind),
    /// Closed textual set.
    Enum(EnumDescriptor),
    /// Homogeneous list of the inner field shape.
    List(Box<FieldSchema>),
    /// Nested record.
    Nested(RecordSchema),
    /// Unconstrained value, passed through unvalidated.
    Raw,
}

/// One field descriptor: a shape plus nullability.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    /// The field's wire shape.
    pub kind: FieldKind,
    /// True when `null` is an acceptable value.
    pub nullable: bool,
}

impl FieldSchema {
    /// Compiles a field schema from a type descriptor.
    ///
    /// Optional wrappers are unwrapped one level at a time, marking the
    /// resulting field nullable. Unclassifiable types fail with an error
    /// naming the offending field.
    pub fn from_descriptor(
        descriptor: &TypeDescriptor,
        field_name: &str,
    ) -> Result<Self, SchemaError> {
        let class = classify(descriptor)
            .map_err(|e| SchemaError::from(e).in_field(field_name))?;
        match class {
            TypeClass::Scalar(kind) => Ok(Self {
                kind: FieldKind::Scalar(kind),
                nullable: false,
            }),
            TypeClass::Optional(inner) => {
                let mut field = Self::from_descriptor(inner, field_name)?;
                field.nullable = true;
                Ok(field)
            }
            TypeClass::List(item) => {
                let item_field = Self::from_descriptor(item, &format!("{field_name}_item"))?;
                Ok(Self {
                    kind: FieldKind::List(Box::new(item_field)),
                    nullable: false,
                })
            }
            TypeClass::Record(record) => Ok(Self {
                kind: FieldKind::Nested(RecordSchema::from_descriptor(record)?),
                nullable: false,
            }),
            TypeClass::Enum(en) => Ok(Self {
                kind: FieldKind::Enum(en.clone()),
                nullable: false,
            }),
            TypeClass::Unconstrained => Ok(Self {
                kind: FieldKind::Raw,
                nullable: false,
            }),
        }
    }
}

/// Serialization schema for one record type.
///
/// `dump` is deliberately tolerant: an object whose keys are not a subset
/// of the declared fields is returned unchanged, so handlers can return
/// ad-hoc payloads (error bodies, status messages) that do not conform to
/// the declared success shape.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    /// Record type name.
    pub name: String,
    /// Declared fields, in order.
    pub fields: IndexMap<String, FieldSchema>,
}

impl RecordSchema {
    /// Compiles a record schema from a record descriptor.
    pub fn from_descriptor(record: &RecordDescriptor) -> Result<Self, SchemaError> {
        let mut fields = IndexMap::new();
        for (field_name, field_descriptor) in &record.fields {
            let field = FieldSchema::from_descriptor(field_descriptor, field_name)?;
            fields.insert(field_name.clone(), field);
        }
        Ok(Self {
            name: record.name.clone(),
            fields,
        })
    }

    /// Serializes a value through this schema.
    ///
    /// The output carries exactly the declared fields; fields absent from
    /// the input are emitted as `null`. Objects with undeclared keys pass
    /// through unchanged (see the type-level docs). Non-object values fail.
    pub fn dump(&self, value: &Value) -> Result<Value, DumpError> {
        let Value::Object(map) = value else {
            return Err(DumpError {
                record: self.name.clone(),
                reason: format!("expected an object, got {}", json_kind(value)),
            });
        };

        // Undeclared keys mean this is not an instance of the record
        // (typically a hand-built error payload); hand it back untouched.
        if map.keys().any(|k| !self.fields.contains_key(k)) {
            return Ok(value.clone());
        }

        let mut out = serde_json::Map::with_capacity(self.fields.len());
        for (field_name, field) in &self.fields {
            let dumped = match map.get(field_name) {
                Some(v) => dump_field(field, v)?,
                None => Value::Null,
            };
            out.insert(field_name.clone(), dumped);
        }
        Ok(Value::Object(out))
    }
}

fn dump_field(field: &FieldSchema, value: &Value) -> Result<Value, DumpError> {
    match (&field.kind, value) {
        (_, Value::Null) => Ok(Value::Null),
        (FieldKind::Nested(record), v) => record.dump(v),
        (FieldKind::List(item), Value::Array(values)) => {
            let dumped: Result<Vec<_>, _> = values.iter().map(|v| dump_field(item, v)).collect();
            Ok(Value::Array(dumped?))
        }
        (FieldKind::List(_), other) => Err(DumpError {
            record: "list".to_string(),
            reason: format!("expected an array, got {}", json_kind(other)),
        }),
        // Scalars, enums, and raw fields pass through as-is.
        (_, v) => Ok(v.clone()),
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_record() -> RecordDescriptor {
        let TypeDescriptor::Record(record) = TypeDescriptor::record(
            "User",
            vec![
                ("id", TypeDescriptor::integer()),
                ("name", TypeDescriptor::text()),
                ("email", TypeDescriptor::optional(TypeDescriptor::text())),
            ],
        ) else {
            unreachable!()
        };
        record
    }

    #[test]
    fn compiles_optional_into_nullable() {
        let field = FieldSchema::from_descriptor(
            &TypeDescriptor::optional(TypeDescriptor::integer()),
            "age",
        )
        .unwrap();
        assert!(field.nullable);
        assert_eq!(field.kind, FieldKind::Scalar(ScalarKind::Integer));
    }

    #[test]
    fn compiles_list_of_records() {
        let descriptor = TypeDescriptor::list(TypeDescriptor::Record(user_record()));
        let field = FieldSchema::from_descriptor(&descriptor, "users").unwrap();
        let FieldKind::List(item) = field.kind else {
            panic!("expected list field");
        };
        assert!(matches!(item.kind, FieldKind::Nested(_)));
    }

    #[test]
    fn opaque_field_error_names_the_field() {
        let err = FieldSchema::from_descriptor(&TypeDescriptor::opaque("DataStore"), "store")
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("store"));
        assert!(message.contains("DataStore"));
    }

    #[test]
    fn nested_opaque_error_propagates_cause() {
        let descriptor = TypeDescriptor::record(
            "Holder",
            vec![("inner", TypeDescriptor::opaque("Mystery"))],
        );
        let TypeDescriptor::Record(record) = descriptor else {
            unreachable!()
        };
        let err = RecordSchema::from_descriptor(&record).unwrap_err();
        assert!(err.to_string().contains("inner"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn dump_emits_declared_fields_with_null_for_omitted() {
        let schema = RecordSchema::from_descriptor(&user_record()).unwrap();
        let dumped = schema.dump(&json!({"id": 1, "name": "alice"})).unwrap();
        assert_eq!(dumped, json!({"id": 1, "name": "alice", "email": null}));
    }

    #[test]
    fn dump_passes_unknown_key_objects_through() {
        let schema = RecordSchema::from_descriptor(&user_record()).unwrap();
        let payload = json!({"error": "Not Found", "message": "no such user"});
        assert_eq!(schema.dump(&payload).unwrap(), payload);
    }

    #[test]
    fn dump_rejects_non_objects() {
        let schema = RecordSchema::from_descriptor(&user_record()).unwrap();
        let err = schema.dump(&json!(42)).unwrap_err();
        assert!(err.to_string().contains("expected an object"));
    }

    #[test]
    fn dump_recurses_into_nested_records() {
        let descriptor = TypeDescriptor::record(
            "Post",
            vec![
                ("title", TypeDescriptor::text()),
                ("author", TypeDescriptor::Record(user_record())),
            ],
        );
        let TypeDescriptor::Record(record) = descriptor else {
            unreachable!()
        };
        let schema = RecordSchema::from_descriptor(&record).unwrap();

        let dumped = schema
            .dump(&json!({"title": "hi", "author": {"id": 2, "name": "bo"}}))
            .unwrap();
        assert_eq!(
            dumped,
            json!({"title": "hi", "author": {"id": 2, "name": "bo", "email": null}})
        );
    }
}
