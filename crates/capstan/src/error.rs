//! Registration-time errors.
//!
//! Everything here surfaces during [`Registrar::finalize`], never per
//! request: a registrar that finalizes cleanly produces a router whose
//! endpoints can only fail with request-level errors.
//!
//! [`Registrar::finalize`]: crate::Registrar::finalize

use capstan_extract::{ConflictError, PathTemplateError};
use capstan_schema::{SchemaError, SignatureError};
use http::Method;
use thiserror::Error;

/// A view could not be registered or a path service could not be built.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The path template is structurally invalid.
    #[error("failed to create service for path '{path}'")]
    Template {
        /// The offending template.
        path: String,
        /// The structural violation.
        #[source]
        source: PathTemplateError,
    },

    /// The handler's declared metadata failed inspection.
    #[error("failed to register view '{function}' for {method} {path}")]
    Signature {
        /// Handler function name.
        function: String,
        /// HTTP method being registered.
        method: Method,
        /// Path template being registered.
        path: String,
        /// The inspection failure.
        #[source]
        source: SignatureError,
    },

    /// The path template names placeholders the signature lacks.
    #[error("failed to register view '{function}' for {method} {path}")]
    Conflict {
        /// Handler function name.
        function: String,
        /// HTTP method being registered.
        method: Method,
        /// Path template being registered.
        path: String,
        /// The orphaned placeholders.
        #[source]
        source: ConflictError,
    },

    /// Schema generation rejected a declared type.
    #[error("failed to register view '{function}' for {method} {path}")]
    Schema {
        /// Handler function name.
        function: String,
        /// HTTP method being registered.
        method: Method,
        /// Path template being registered.
        path: String,
        /// The unsupported-type failure.
        #[source]
        source: SchemaError,
    },

    /// Two views registered for the same method and path.
    #[error("duplicate registration for {method} {path}")]
    DuplicateRoute {
        /// HTTP method registered twice.
        method: Method,
        /// Path template registered twice.
        path: String,
    },

    /// A method outside the supported set (GET, POST, PUT, PATCH, DELETE,
    /// HEAD, OPTIONS) was registered.
    #[error("method {method} is not supported for {path}")]
    UnsupportedMethod {
        /// The unsupported method.
        method: Method,
        /// Path template being registered.
        path: String,
    },
}
