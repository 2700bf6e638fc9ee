//! Signature and schema generation errors.
//!
//! All of these are registration-time errors: they surface while an
//! endpoint is being set up and prevent it from ever receiving traffic.

use thiserror::Error;

/// A type descriptor that the classifier cannot place in any supported
/// category.
#[derive(Debug, Clone, Error)]
#[error(
    "type '{type_name}' is not supported; supported categories: \
     integer, float, text, boolean, bytes, optional<T>, list<T>, \
     record types, enum types, and the permissive 'any' type"
)]
pub struct UnsupportedTypeError {
    /// Name of the offending type.
    pub type_name: String,
}

/// Errors raised while inspecting handler metadata into a signature.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The handler did not declare the request handle.
    #[error("function '{function}' must have a 'request' parameter as the first argument")]
    MissingRequestParameter {
        /// Handler function name.
        function: String,
    },

    /// A parameter carries no resolvable type hint. Variadic parameters
    /// fail the same way, since they cannot carry a single hint.
    #[error("parameter '{parameter}' in function '{function}' must have a type hint")]
    MissingTypeHint {
        /// Handler function name.
        function: String,
        /// Offending parameter name.
        parameter: String,
    },

    /// A typed parameter tried to use the reserved request-handle name.
    #[error("parameter name 'request' is reserved for the request handle in function '{function}'")]
    ReservedParameterName {
        /// Handler function name.
        function: String,
    },

    /// The same parameter name was declared twice.
    #[error("duplicate parameter '{parameter}' in function '{function}'")]
    DuplicateParameter {
        /// Handler function name.
        function: String,
        /// Offending parameter name.
        parameter: String,
    },
}

/// Errors raised while generating input or output schemas.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// An unclassifiable type was encountered directly.
    #[error(transparent)]
    Unsupported(#[from] UnsupportedTypeError),

    /// A field somewhere in the type tree could not be generated; carries
    /// the nested cause.
    #[error("failed to create field '{field}': {source}")]
    Field {
        /// Field (or parameter) name.
        field: String,
        /// Inner cause.
        #[source]
        source: Box<SchemaError>,
    },

    /// Input-schema generation failed for a function.
    #[error("failed to generate input schema for '{function}': {source}")]
    Input {
        /// Handler function name.
        function: String,
        /// Inner cause.
        #[source]
        source: Box<SchemaError>,
    },

    /// Output-schema generation failed for a return type.
    #[error("failed to generate output schema for type '{type_name}': {source}")]
    Output {
        /// Name of the declared return type.
        type_name: String,
        /// Inner cause.
        #[source]
        source: Box<SchemaError>,
    },
}

impl SchemaError {
    /// Wraps an error with the field it occurred under.
    #[must_use]
    pub fn in_field(self, field: impl Into<String>) -> Self {
        Self::Field {
            field: field.into(),
            source: Box::new(self),
        }
    }
}

/// Errors raised while loading request data through an input schema.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    /// A required field was absent from the candidate data.
    #[error("required field '{field}' is missing")]
    MissingField {
        /// Field name.
        field: String,
    },

    /// A field value did not fit its declared shape.
    #[error("invalid value for field '{field}': {reason}")]
    InvalidField {
        /// Field name.
        field: String,
        /// Human-readable reason.
        reason: String,
    },
}

/// Error raised when a value cannot be serialized through a record schema.
///
/// The view handler bridge deliberately swallows this and falls back to the
/// raw value, so handlers can return ad-hoc error payloads.
#[derive(Debug, Clone, Error)]
#[error("cannot serialize value through record schema '{record}': {reason}")]
pub struct DumpError {
    /// Record schema name.
    pub record: String,
    /// Human-readable reason.
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_type_names_the_type_and_categories() {
        let err = UnsupportedTypeError {
            type_name: "DataStore".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("DataStore"));
        assert!(message.contains("supported categories"));
        assert!(message.contains("record"));
    }

    #[test]
    fn field_error_chains_the_cause() {
        let inner = SchemaError::from(UnsupportedTypeError {
            type_name: "Weird".to_string(),
        });
        let err = inner.in_field("payload");

        let message = err.to_string();
        assert!(message.contains("payload"));
        assert!(message.contains("Weird"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn signature_error_messages_name_parameter_and_function() {
        let err = SignatureError::MissingTypeHint {
            function: "get_user".to_string(),
            parameter: "user_id".to_string(),
        };
        assert!(err.to_string().contains("user_id"));
        assert!(err.to_string().contains("get_user"));
    }
}
