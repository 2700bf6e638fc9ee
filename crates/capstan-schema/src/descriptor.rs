//! Type descriptors and classification.
//!
//! A [`TypeDescriptor`] is the runtime stand-in for a language-level type
//! annotation: a closed tagged tree describing what a parameter, field, or
//! return value looks like on the wire. [`classify`] is the single point
//! where a descriptor is admitted into one of the supported categories or
//! rejected with the fixed unsupported-type message.

use crate::error::UnsupportedTypeError;

/// The directly string-convertible scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Whole numbers (parsed as `i64`).
    Integer,
    /// Floating-point numbers (parsed as `f64`).
    Float,
    /// UTF-8 text.
    Text,
    /// Booleans with the fixed textual vocabulary.
    Boolean,
    /// Byte sequences carried as UTF-8 text.
    Bytes,
}

impl ScalarKind {
    /// Lowercase name used in error messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Text => "text",
            Self::Boolean => "boolean",
            Self::Bytes => "bytes",
        }
    }
}

/// A structured record: a named aggregate of typed fields.
///
/// Records are recognized by their declared field annotations, not by any
/// inheritance marker. Field order is the declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDescriptor {
    /// Record type name.
    pub name: String,
    /// Ordered (field name, field type) pairs.
    pub fields: Vec<(String, TypeDescriptor)>,
}

/// A closed set of textual members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDescriptor {
    /// Enum type name.
    pub name: String,
    /// Valid members, in declaration order.
    pub variants: Vec<String>,
}

/// Runtime descriptor for a declared type.
///
/// # Example
///
/// ```rust
/// use capstan_schema::{classify, TypeClass, TypeDescriptor, ScalarKind};
///
/// let hint = TypeDescriptor::optional(TypeDescriptor::integer());
/// match classify(&hint).unwrap() {
///     TypeClass::Optional(inner) => {
///         assert_eq!(classify(inner).unwrap(), TypeClass::Scalar(ScalarKind::Integer));
///     }
///     _ => panic!("expected optional"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    /// A primitive scalar.
    Scalar(ScalarKind),
    /// A value that may legitimately be absent/null.
    Optional(Box<TypeDescriptor>),
    /// A homogeneous list.
    List(Box<TypeDescriptor>),
    /// A structured record with named, typed fields.
    Record(RecordDescriptor),
    /// A closed set of textual members.
    Enum(EnumDescriptor),
    /// Permissive escape hatch: bypasses validation entirely.
    Any,
    /// A type the system knows nothing about; classification rejects it.
    Opaque(String),
}

impl TypeDescriptor {
    /// Integer scalar.
    #[must_use]
    pub fn integer() -> Self {
        Self::Scalar(ScalarKind::Integer)
    }

    /// Float scalar.
    #[must_use]
    pub fn float() -> Self {
        Self::Scalar(ScalarKind::Float)
    }

    /// Text scalar.
    #[must_use]
    pub fn text() -> Self {
        Self::Scalar(ScalarKind::Text)
    }

    /// Boolean scalar.
    #[must_use]
    pub fn boolean() -> Self {
        Self::Scalar(ScalarKind::Boolean)
    }

    /// Byte-sequence scalar.
    #[must_use]
    pub fn bytes() -> Self {
        Self::Scalar(ScalarKind::Bytes)
    }

    /// Wraps a descriptor as optional.
    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Wraps a descriptor as a homogeneous list.
    #[must_use]
    pub fn list(item: Self) -> Self {
        Self::List(Box::new(item))
    }

    /// Builds a record descriptor from (name, descriptor) field pairs.
    #[must_use]
    pub fn record<N: Into<String>>(name: impl Into<String>, fields: Vec<(N, Self)>) -> Self {
        Self::Record(RecordDescriptor {
            name: name.into(),
            fields: fields.into_iter().map(|(n, d)| (n.into(), d)).collect(),
        })
    }

    /// Builds an enum descriptor from its member names.
    #[must_use]
    pub fn enumeration<V: Into<String>>(name: impl Into<String>, variants: Vec<V>) -> Self {
        Self::Enum(EnumDescriptor {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        })
    }

    /// Builds an opaque (unsupported) descriptor carrying the type's name.
    #[must_use]
    pub fn opaque(name: impl Into<String>) -> Self {
        Self::Opaque(name.into())
    }

    /// True when the descriptor is an optional wrapper.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// Human-readable type name for error messages.
    #[must_use]
    pub fn type_name(&self) -> String {
        match self {
            Self::Scalar(kind) => kind.name().to_string(),
            Self::Optional(inner) => format!("optional<{}>", inner.type_name()),
            Self::List(item) => format!("list<{}>", item.type_name()),
            Self::Record(record) => record.name.clone(),
            Self::Enum(en) => en.name.clone(),
            Self::Any => "any".to_string(),
            Self::Opaque(name) => name.clone(),
        }
    }
}

/// Classification of a descriptor into exactly one supported category.
///
/// Nested combinations are classified one layer at a time: classifying
/// `optional<list<Record>>` yields `Optional`, and the caller recurses into
/// the inner descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeClass<'a> {
    /// Primitive scalar.
    Scalar(ScalarKind),
    /// Optional wrapper; carries the inner descriptor.
    Optional(&'a TypeDescriptor),
    /// Homogeneous list; carries the item descriptor.
    List(&'a TypeDescriptor),
    /// Structured record.
    Record(&'a RecordDescriptor),
    /// Closed textual set.
    Enum(&'a EnumDescriptor),
    /// Permissive escape hatch, bypasses validation.
    Unconstrained,
}

/// Classifies a descriptor, rejecting unclassifiable types.
pub fn classify(descriptor: &TypeDescriptor) -> Result<TypeClass<'_>, UnsupportedTypeError> {
    match descriptor {
        TypeDescriptor::Scalar(kind) => Ok(TypeClass::Scalar(*kind)),
        TypeDescriptor::Optional(inner) => Ok(TypeClass::Optional(inner)),
        TypeDescriptor::List(item) => Ok(TypeClass::List(item)),
        TypeDescriptor::Record(record) => Ok(TypeClass::Record(record)),
        TypeDescriptor::Enum(en) => Ok(TypeClass::Enum(en)),
        TypeDescriptor::Any => Ok(TypeClass::Unconstrained),
        TypeDescriptor::Opaque(name) => Err(UnsupportedTypeError {
            type_name: name.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_scalars() {
        assert_eq!(
            classify(&TypeDescriptor::integer()).unwrap(),
            TypeClass::Scalar(ScalarKind::Integer)
        );
        assert_eq!(
            classify(&TypeDescriptor::boolean()).unwrap(),
            TypeClass::Scalar(ScalarKind::Boolean)
        );
    }

    #[test]
    fn classifies_one_layer_at_a_time() {
        let hint = TypeDescriptor::optional(TypeDescriptor::list(TypeDescriptor::record(
            "User",
            vec![("id", TypeDescriptor::integer())],
        )));

        let TypeClass::Optional(inner) = classify(&hint).unwrap() else {
            panic!("expected optional");
        };
        let TypeClass::List(item) = classify(inner).unwrap() else {
            panic!("expected list");
        };
        let TypeClass::Record(record) = classify(item).unwrap() else {
            panic!("expected record");
        };
        assert_eq!(record.name, "User");
    }

    #[test]
    fn any_is_unconstrained() {
        assert_eq!(classify(&TypeDescriptor::Any).unwrap(), TypeClass::Unconstrained);
    }

    #[test]
    fn opaque_is_rejected_with_type_name() {
        let err = classify(&TypeDescriptor::opaque("DataStore")).unwrap_err();
        assert_eq!(err.type_name, "DataStore");
        assert!(err.to_string().contains("not supported"));
    }

    #[test]
    fn type_names_render_nested_shapes() {
        let hint = TypeDescriptor::optional(TypeDescriptor::list(TypeDescriptor::text()));
        assert_eq!(hint.type_name(), "optional<list<text>>");
    }

    #[test]
    fn enum_descriptor_keeps_member_order() {
        let hint = TypeDescriptor::enumeration("Status", vec!["draft", "published"]);
        let TypeDescriptor::Enum(en) = hint else {
            panic!("expected enum");
        };
        assert_eq!(en.variants, vec!["draft", "published"]);
    }
}
