//! # Capstan Schema
//!
//! Type descriptors, signature inspection, and schema generation for the
//! Capstan endpoint adapter.
//!
//! This crate covers the static half of the signature-to-schema-to-request
//! pipeline, all of it running once at endpoint-registration time:
//!
//! 1. **Type hints** — [`TypeHint`] produces a [`TypeDescriptor`] for a
//!    Rust type; the [`api_record!`] and [`api_enum!`] macros generate
//!    implementations for user-declared records and enums.
//! 2. **Signature inspection** — [`HandlerMetadata`] declares a handler's
//!    parameters; [`inspect`] validates it into a [`FunctionSignature`].
//! 3. **Classification** — [`classify`] admits a descriptor into one of the
//!    supported categories or rejects it with the fixed unsupported-type
//!    message.
//! 4. **Schema generation** — [`generate_input_schema`] builds the
//!    validation schema for a signature's parameters;
//!    [`generate_output_schema`] builds the serialization plan for its
//!    return hint (or `None` for pass-through shapes).
//!
//! All artifacts produced here are immutable, shareable data: they are
//! generated once and read concurrently by every request.
//!
//! # Example
//!
//! ```rust
//! use capstan_schema::{
//!     api_record, generate_input_schema, generate_output_schema, inspect,
//!     HandlerMetadata, OutputSchema,
//! };
//!
//! api_record! {
//!     /// A user returned by the API.
//!     pub struct UserResponse {
//!         pub id: i64,
//!         pub name: String,
//!     }
//! }
//!
//! let metadata = HandlerMetadata::new("list_users")
//!     .request()
//!     .param::<Option<String>>("search")
//!     .returns::<Vec<UserResponse>>();
//!
//! let signature = inspect(&metadata).unwrap();
//! let input = generate_input_schema(&signature).unwrap();
//! assert!(!input.fields["search"].required);
//!
//! let output = generate_output_schema(signature.return_hint()).unwrap();
//! assert!(matches!(output, Some(OutputSchema::ListOfRecords(_))));
//! ```

#![doc(html_root_url = "https://docs.rs/capstan-schema/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod descriptor;
mod error;
mod field;
mod hint;
mod input;
mod output;
mod signature;

pub use descriptor::{
    classify, EnumDescriptor, RecordDescriptor, ScalarKind, TypeClass, TypeDescriptor,
};
pub use error::{DumpError, LoadError, SchemaError, SignatureError, UnsupportedTypeError};
pub use field::{FieldKind, FieldSchema, RecordSchema};
pub use hint::TypeHint;
pub use input::{generate_input_schema, InputField, InputSchema};
pub use output::{generate_output_schema, OutputSchema};
pub use signature::{
    inspect, FunctionSignature, HandlerMetadata, ParameterInfo, RawParameter, REQUEST_PARAM,
};
