//! Output serialization schemas.
//!
//! Return hints compile into at most one [`OutputSchema`]. Scalars, enums,
//! permissive values, and lists of scalars need no transformation and yield
//! `None` (pass-through); record returns get a [`RecordSchema`]; lists of
//! records get the list-of-records marker so the bridge serializes each
//! element through the item schema instead of treating the list as one
//! record.

use crate::descriptor::{classify, TypeClass, TypeDescriptor};
use crate::error::SchemaError;
use crate::field::RecordSchema;

/// Serialization plan for a handler's return value.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputSchema {
    /// Serialize the single value through the record schema.
    Record(RecordSchema),
    /// Map the per-item record schema over each list element.
    ListOfRecords(RecordSchema),
}

impl OutputSchema {
    /// The underlying record schema.
    #[must_use]
    pub fn record_schema(&self) -> &RecordSchema {
        match self {
            Self::Record(schema) | Self::ListOfRecords(schema) => schema,
        }
    }
}

/// Generates the output schema for a declared return hint.
///
/// `None` (no declared return type) and directly serializable shapes yield
/// `Ok(None)`: the bridge passes such values through unchanged. Optional
/// wrappers are unwrapped before classification.
pub fn generate_output_schema(
    return_hint: Option<&TypeDescriptor>,
) -> Result<Option<OutputSchema>, SchemaError> {
    let Some(hint) = return_hint else {
        return Ok(None);
    };

    let wrap = |e: SchemaError| SchemaError::Output {
        type_name: hint.type_name(),
        source: Box::new(e),
    };

    match classify(hint).map_err(|e| wrap(e.into()))? {
        TypeClass::Optional(inner) => generate_output_schema(Some(inner)),
        TypeClass::Scalar(_) | TypeClass::Enum(_) | TypeClass::Unconstrained => Ok(None),
        TypeClass::Record(record) => {
            let schema = RecordSchema::from_descriptor(record).map_err(wrap)?;
            Ok(Some(OutputSchema::Record(schema)))
        }
        TypeClass::List(item) => match classify(item).map_err(|e| wrap(e.into()))? {
            TypeClass::Record(record) => {
                let schema = RecordSchema::from_descriptor(record).map_err(wrap)?;
                Ok(Some(OutputSchema::ListOfRecords(schema)))
            }
            TypeClass::Scalar(_) | TypeClass::Enum(_) | TypeClass::Unconstrained => Ok(None),
            TypeClass::Optional(_) | TypeClass::List(_) => Err(wrap(
                crate::error::UnsupportedTypeError {
                    type_name: item.type_name(),
                }
                .into(),
            )),
        },
    }
}
