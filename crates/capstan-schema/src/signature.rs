//! Handler metadata and signature inspection.
//!
//! A handler's "annotations" are declared once, at registration time,
//! through the [`HandlerMetadata`] builder, and [`inspect`] turns them into
//! an immutable [`FunctionSignature`]. Inspection is where the structural
//! preconditions are enforced: the request handle must be declared, every
//! other parameter needs a type hint, and variadic parameters are rejected
//! the same way as missing hints since they cannot carry a single hint.

use indexmap::IndexMap;
use serde_json::Value;

use crate::descriptor::TypeDescriptor;
use crate::error::SignatureError;
use crate::hint::TypeHint;

/// Reserved name of the request handle.
pub const REQUEST_PARAM: &str = "request";

/// One declared parameter, before inspection.
#[derive(Debug, Clone)]
pub enum RawParameter {
    /// The request handle slot.
    Request,
    /// An ordinary named parameter.
    Typed {
        /// Parameter name.
        name: String,
        /// Declared type hint; `None` models a missing annotation.
        hint: Option<TypeDescriptor>,
        /// Declared default value, if any.
        default: Option<Value>,
    },
    /// A variadic parameter (rejected at inspection).
    Variadic {
        /// Parameter name.
        name: String,
    },
}

/// Declared metadata for a handler function.
///
/// # Example
///
/// ```rust
/// use capstan_schema::{inspect, HandlerMetadata};
/// use serde_json::json;
///
/// let metadata = HandlerMetadata::new("list_posts")
///     .request()
///     .param::<i64>("user_id")
///     .param_with_default::<i64>("limit", json!(10))
///     .param::<Option<String>>("search")
///     .returns::<Vec<String>>();
///
/// let signature = inspect(&metadata).unwrap();
/// assert_eq!(signature.required_parameters().count(), 1);
/// assert_eq!(signature.optional_parameters().count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct HandlerMetadata {
    function: String,
    parameters: Vec<RawParameter>,
    return_hint: Option<TypeDescriptor>,
}

impl HandlerMetadata {
    /// Starts metadata for the named function.
    #[must_use]
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            parameters: Vec::new(),
            return_hint: None,
        }
    }

    /// Declares the request handle at the current position.
    #[must_use]
    pub fn request(mut self) -> Self {
        self.parameters.push(RawParameter::Request);
        self
    }

    /// Declares a typed parameter.
    #[must_use]
    pub fn param<T: TypeHint>(self, name: impl Into<String>) -> Self {
        self.hinted_param(name, T::descriptor())
    }

    /// Declares a typed parameter with a default value.
    #[must_use]
    pub fn param_with_default<T: TypeHint>(
        mut self,
        name: impl Into<String>,
        default: Value,
    ) -> Self {
        self.parameters.push(RawParameter::Typed {
            name: name.into(),
            hint: Some(T::descriptor()),
            default: Some(default),
        });
        self
    }

    /// Declares a parameter with an explicit descriptor.
    #[must_use]
    pub fn hinted_param(mut self, name: impl Into<String>, hint: TypeDescriptor) -> Self {
        self.parameters.push(RawParameter::Typed {
            name: name.into(),
            hint: Some(hint),
            default: None,
        });
        self
    }

    /// Declares a parameter without a type hint (an inspection error).
    #[must_use]
    pub fn untyped_param(mut self, name: impl Into<String>) -> Self {
        self.parameters.push(RawParameter::Typed {
            name: name.into(),
            hint: None,
            default: None,
        });
        self
    }

    /// Declares a variadic parameter (an inspection error).
    #[must_use]
    pub fn variadic(mut self, name: impl Into<String>) -> Self {
        self.parameters.push(RawParameter::Variadic { name: name.into() });
        self
    }

    /// Declares the return type.
    #[must_use]
    pub fn returns<T: TypeHint>(mut self) -> Self {
        self.return_hint = Some(T::descriptor());
        self
    }

    /// Declares the return type from an explicit descriptor.
    #[must_use]
    pub fn returns_hint(mut self, hint: TypeDescriptor) -> Self {
        self.return_hint = Some(hint);
        self
    }

    /// The declared function name.
    #[must_use]
    pub fn function(&self) -> &str {
        &self.function
    }
}

/// One parameter's inspected metadata. Immutable after inspection.
#[derive(Debug, Clone)]
pub struct ParameterInfo {
    name: String,
    hint: TypeDescriptor,
    default: Option<Value>,
}

impl ParameterInfo {
    /// Parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type hint.
    #[must_use]
    pub fn hint(&self) -> &TypeDescriptor {
        &self.hint
    }

    /// Declared default value, if any. `Some(Value::Null)` is an explicit
    /// null default, distinct from having no default.
    #[must_use]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// True when a default value was declared.
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// True when the hint is an optional wrapper.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.hint.is_optional()
    }

    /// The non-optional arm of an optional hint, or the hint itself.
    #[must_use]
    pub fn inner_hint(&self) -> &TypeDescriptor {
        match &self.hint {
            TypeDescriptor::Optional(inner) => inner,
            other => other,
        }
    }
}

/// Inspected signature of a handler function.
///
/// Parameters are kept in declaration order and never include the request
/// handle itself.
#[derive(Debug, Clone)]
pub struct FunctionSignature {
    function: String,
    parameters: IndexMap<String, ParameterInfo>,
    return_hint: Option<TypeDescriptor>,
    has_request_param: bool,
}

impl FunctionSignature {
    /// The function name this signature was inspected from.
    #[must_use]
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Declared return hint, or `None` for "no output schema, pass through".
    #[must_use]
    pub fn return_hint(&self) -> Option<&TypeDescriptor> {
        self.return_hint.as_ref()
    }

    /// True when the request handle was declared.
    #[must_use]
    pub fn has_request_param(&self) -> bool {
        self.has_request_param
    }

    /// All parameters except the request handle, in declaration order.
    pub fn non_request_parameters(&self) -> impl Iterator<Item = (&str, &ParameterInfo)> {
        self.parameters.iter().map(|(n, p)| (n.as_str(), p))
    }

    /// Parameters with no default that are not optional.
    pub fn required_parameters(&self) -> impl Iterator<Item = (&str, &ParameterInfo)> {
        self.non_request_parameters()
            .filter(|(_, p)| !p.has_default() && !p.is_optional())
    }

    /// Parameters with a default or an optional hint.
    pub fn optional_parameters(&self) -> impl Iterator<Item = (&str, &ParameterInfo)> {
        self.non_request_parameters()
            .filter(|(_, p)| p.has_default() || p.is_optional())
    }

    /// Looks up a parameter by name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ParameterInfo> {
        self.parameters.get(name)
    }

    /// Number of non-request parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// True when the function declares no non-request parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

/// Inspects handler metadata into a [`FunctionSignature`].
///
/// # Errors
///
/// - [`SignatureError::MissingRequestParameter`] when no request handle was
///   declared.
/// - [`SignatureError::MissingTypeHint`] for untyped and variadic
///   parameters.
/// - [`SignatureError::ReservedParameterName`] when a typed parameter uses
///   the name `request`.
/// - [`SignatureError::DuplicateParameter`] for repeated names.
pub fn inspect(metadata: &HandlerMetadata) -> Result<FunctionSignature, SignatureError> {
    let function = metadata.function.clone();
    let mut parameters = IndexMap::new();
    let mut has_request_param = false;

    for raw in &metadata.parameters {
        match raw {
            RawParameter::Request => {
                has_request_param = true;
            }
            RawParameter::Typed { name, hint, default } => {
                if name == REQUEST_PARAM {
                    return Err(SignatureError::ReservedParameterName { function });
                }
                let Some(hint) = hint.clone() else {
                    return Err(SignatureError::MissingTypeHint {
                        function,
                        parameter: name.clone(),
                    });
                };
                let info = ParameterInfo {
                    name: name.clone(),
                    hint,
                    default: default.clone(),
                };
                if parameters.insert(name.clone(), info).is_some() {
                    return Err(SignatureError::DuplicateParameter {
                        function,
                        parameter: name.clone(),
                    });
                }
            }
            RawParameter::Variadic { name } => {
                // Variadics cannot carry a single type hint, so they fail
                // exactly like a missing annotation.
                return Err(SignatureError::MissingTypeHint {
                    function,
                    parameter: name.clone(),
                });
            }
        }
    }

    if !has_request_param {
        return Err(SignatureError::MissingRequestParameter { function });
    }

    Ok(FunctionSignature {
        function: metadata.function.clone(),
        parameters,
        return_hint: metadata.return_hint.clone(),
        has_request_param,
    })
}
