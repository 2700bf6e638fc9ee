//! Resolution and template errors.
//!
//! Template and conflict errors are registration-time (they abort endpoint
//! setup); [`ResolveError`] is the per-request family, translated by the
//! host into client-error responses.

use http::StatusCode;
use thiserror::Error;

/// Structural problems in a path template, one variant per violation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PathTemplateError {
    /// The template does not start with `/`.
    #[error("path template '{template}' must start with '/'")]
    MissingLeadingSlash {
        /// The offending template.
        template: String,
    },

    /// `{` and `}` do not pair up.
    #[error("unbalanced braces in path template '{template}'")]
    UnbalancedBraces {
        /// The offending template.
        template: String,
    },

    /// A `{}` placeholder with no name.
    #[error("empty placeholder name in path template '{template}'")]
    EmptyPlaceholder {
        /// The offending template.
        template: String,
    },

    /// A placeholder name that is not a legal bare identifier.
    #[error("invalid placeholder name '{name}' in path template '{template}': must be a valid identifier")]
    InvalidPlaceholderName {
        /// The offending template.
        template: String,
        /// The illegal name.
        name: String,
    },
}

/// A path template names placeholders the function signature lacks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error(
    "path parameters {orphaned:?} are not present in the signature of '{function}'; \
     function parameters: {parameters:?}"
)]
pub struct ConflictError {
    /// Handler function name.
    pub function: String,
    /// Template placeholders with no matching parameter.
    pub orphaned: Vec<String>,
    /// The function's non-request parameter names.
    pub parameters: Vec<String>,
}

/// Per-request resolution failures.
///
/// These indicate a malformed request, not a system fault: every variant
/// maps to a client-error status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// A required parameter was supplied by no source.
    #[error("required parameter '{name}' is missing from request")]
    MissingParameter {
        /// Parameter name.
        name: String,
    },

    /// A raw value could not be converted to the declared type.
    #[error("cannot convert parameter '{name}' value '{value}' to {target}")]
    Conversion {
        /// Parameter name.
        name: String,
        /// The raw value as received.
        value: String,
        /// Target type name.
        target: String,
    },

    /// A value outside the fixed boolean vocabulary.
    #[error("cannot convert parameter '{name}' value '{value}' to boolean")]
    InvalidBoolean {
        /// Parameter name.
        name: String,
        /// The raw value as received.
        value: String,
    },

    /// A value that is not a member of the declared enumerated type.
    #[error("invalid value '{value}' for parameter '{name}': expected one of {allowed:?}")]
    InvalidEnumMember {
        /// Parameter name.
        name: String,
        /// The raw value as received.
        value: String,
        /// All valid members.
        allowed: Vec<String>,
    },
}

impl ResolveError {
    /// HTTP status the host should translate this error into.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}
