//! # Capstan
//!
//! **Typed-handler HTTP endpoint adapter**
//!
//! Capstan turns plain functions with declared parameter types into HTTP
//! API endpoints. The handler declares what it needs; the adapter does the
//! rest:
//!
//! - **Declared signatures** – parameters and return types are described
//!   once, at registration time, and inspected into an immutable signature
//! - **Source merging** – path, query-string, and JSON-body values are
//!   merged with fixed precedence and converted to the declared types
//! - **Schema generation** – input validation schemas and output
//!   serialization plans are derived from the signature, never written by
//!   hand
//! - **Uniform errors** – malformed requests become 400 responses with a
//!   consistent payload; handler failures become 500s
//!
//! ## Quick Start
//!
//! ```rust
//! use capstan::{Registrar, ViewOptions};
//! use capstan_schema::HandlerMetadata;
//! use http::{HeaderMap, Method};
//! use serde_json::json;
//!
//! let mut registrar = Registrar::new();
//! registrar.get(
//!     "/greetings/{name}",
//!     HandlerMetadata::new("greet")
//!         .request()
//!         .param::<String>("name")
//!         .param_with_default::<i64>("times", json!(1)),
//!     ViewOptions::new(),
//!     |_request, args| {
//!         let name = args.get_str("name").unwrap_or_default();
//!         let times = args.get_i64("times").unwrap_or(1);
//!         Ok(Some(json!({ "greeting": name.repeat(times as usize) })))
//!     },
//! );
//!
//! let router = registrar.finalize().unwrap();
//! let response = router.dispatch(
//!     Method::GET,
//!     "/greetings/hi?times=2",
//!     HeaderMap::new(),
//!     "",
//! );
//! assert_eq!(response.status, 200);
//! assert_eq!(response.body.unwrap()["greeting"], "hihi");
//! ```
//!
//! ## Architecture
//!
//! Registration is two-phase: views are queued, and
//! [`Registrar::finalize`] builds one service per path template before any
//! request is served.
//!
//! ```text
//! register(metadata, handler) → finalize → ApiRouter
//!                                              ↓ per request
//! Request → match path → resolve args → handler → shape output → ApiResponse
//! ```

#![doc(html_root_url = "https://docs.rs/capstan/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod endpoint;
mod error;
mod registrar;
mod response;
mod router;
mod service;

pub use endpoint::{BoxError, Endpoint, Handler};
pub use error::RegistrationError;
pub use registrar::Registrar;
pub use response::ApiResponse;
pub use router::ApiRouter;
pub use service::{RoutedService, ViewOptions};

// Re-export the schema types
pub use capstan_schema as schema;

// Re-export the request/resolution types
pub use capstan_extract as extract;

// Re-export the routing types
pub use capstan_router as routing;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use capstan::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        ApiResponse, ApiRouter, BoxError, Endpoint, Registrar, RegistrationError, RoutedService,
        ViewOptions,
    };

    // Metadata declaration and schema generation
    pub use capstan_schema::{
        api_enum, api_record, generate_input_schema, generate_output_schema, inspect,
        FunctionSignature, HandlerMetadata, TypeDescriptor, TypeHint,
    };

    // Request handle and resolution
    pub use capstan_extract::{
        ParameterContext, PathTemplate, Request, RequestBuilder, ResolveError, ResolvedArgs,
    };
}
