//! # Capstan Extract
//!
//! Request handle and parameter resolution for the Capstan endpoint
//! adapter.
//!
//! This crate covers the per-request half of the pipeline:
//!
//! 1. **Request handle** — [`Request`] carries the raw HTTP parts, the
//!    matched path parameters, and the handler-facing response-status
//!    override; [`RequestBuilder`] assembles one.
//! 2. **Path templates** — [`PathTemplate`] parses and structurally
//!    validates `/users/{user_id}`-style templates at registration time.
//! 3. **Resolution** — [`ParameterContext`] merges path, query-string, and
//!    JSON-body values with fixed precedence and converts each declared
//!    parameter to its hinted type, producing a [`ResolvedArgs`] set.
//! 4. **Conversion** — [`convert_value`] coerces a single raw value to a
//!    target descriptor, with lenient string parsing for scalars and the
//!    fixed boolean vocabulary.
//!
//! # Example
//!
//! ```rust
//! use capstan_extract::{ParameterContext, PathTemplate, RequestBuilder};
//! use capstan_schema::{inspect, HandlerMetadata};
//! use http::Method;
//!
//! let context = ParameterContext::new(PathTemplate::parse("/items/{item_id}").unwrap());
//!
//! let metadata = HandlerMetadata::new("get_item")
//!     .request()
//!     .param::<i64>("item_id")
//!     .param::<Option<f64>>("max_price");
//! let signature = inspect(&metadata).unwrap();
//!
//! let request = RequestBuilder::new()
//!     .method(Method::GET)
//!     .uri("/items/12?max_price=19.99")
//!     .path_param("item_id", "12")
//!     .build();
//!
//! let args = context.resolve(&request, &signature).unwrap();
//! assert_eq!(args.get_i64("item_id"), Some(12));
//! assert_eq!(args.get_f64("max_price"), Some(19.99));
//! ```

#![doc(html_root_url = "https://docs.rs/capstan-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod convert;
mod error;
mod request;
mod resolve;
mod template;

pub use convert::convert_value;
pub use error::{ConflictError, PathTemplateError, ResolveError};
pub use request::{Request, RequestBuilder};
pub use resolve::{ParameterContext, ResolvedArgs};
pub use template::PathTemplate;
