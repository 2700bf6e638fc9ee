//! The handler bridge.
//!
//! An [`Endpoint`] packages one handler with everything derived from its
//! declared metadata at registration time: the inspected signature, the
//! resolution context, and the generated input and output schemas. Per
//! request it resolves arguments, invokes the handler, and shapes the
//! result into an [`ApiResponse`].

use std::sync::Arc;

use capstan_extract::{ParameterContext, Request, ResolvedArgs};
use capstan_schema::{FunctionSignature, InputSchema, LoadError, OutputSchema};
use http::StatusCode;
use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use crate::response::ApiResponse;

/// Boxed error returned by handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The handler function signature the bridge accepts.
///
/// Handlers receive the request handle and the fully resolved arguments,
/// and return an optional JSON value; `None` becomes an empty 204 response.
pub type Handler =
    Arc<dyn Fn(&Request, &ResolvedArgs) -> Result<Option<Value>, BoxError> + Send + Sync>;

/// One registered view: a handler plus its registration-time artifacts.
#[derive(Clone)]
pub struct Endpoint {
    handler: Handler,
    signature: FunctionSignature,
    context: ParameterContext,
    input_schema: InputSchema,
    output_schema: Option<OutputSchema>,
    permission: Option<String>,
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("function", &self.signature.function())
            .field("template", &self.context.template().as_str())
            .field("permission", &self.permission)
            .finish_non_exhaustive()
    }
}

impl Endpoint {
    pub(crate) fn new(
        handler: Handler,
        signature: FunctionSignature,
        context: ParameterContext,
        input_schema: InputSchema,
        output_schema: Option<OutputSchema>,
        permission: Option<String>,
    ) -> Self {
        Self {
            handler,
            signature,
            context,
            input_schema,
            output_schema,
            permission,
        }
    }

    /// The inspected handler signature.
    #[must_use]
    pub fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    /// The generated input schema.
    #[must_use]
    pub fn input_schema(&self) -> &InputSchema {
        &self.input_schema
    }

    /// The generated output schema, or `None` for pass-through returns.
    #[must_use]
    pub fn output_schema(&self) -> Option<&OutputSchema> {
        self.output_schema.as_ref()
    }

    /// Declared permission requirement, if any.
    ///
    /// The adapter records it for the host's authorization layer; it does
    /// not enforce it.
    #[must_use]
    pub fn permission(&self) -> Option<&str> {
        self.permission.as_deref()
    }

    /// Validates a raw argument map against the input schema.
    ///
    /// Host middleware can run this ahead of dispatch and attach the result
    /// to the request as pre-validated data, which [`handle`](Self::handle)
    /// then uses in place of full resolution.
    pub fn validate(&self, data: &Map<String, Value>) -> Result<Map<String, Value>, LoadError> {
        self.input_schema.load(data)
    }

    /// Handles one request end to end.
    ///
    /// Resolution failures become 400 responses; handler errors become 500
    /// responses; a `None` result becomes an empty 204. Successful values
    /// are shaped through the output schema when one exists, and the status
    /// honors any override the handler set on the request. The override
    /// applies to payload-bearing results only: an empty result is 204
    /// unconditionally.
    #[must_use]
    pub fn handle(&self, request: &Request) -> ApiResponse {
        let args = if let Some(validated) = request.validated() {
            ResolvedArgs::from_validated(validated)
        } else {
            match self.context.resolve(request, &self.signature) {
                Ok(args) => args,
                Err(resolve_error) => {
                    debug!(
                        function = self.signature.function(),
                        %resolve_error,
                        "argument resolution failed"
                    );
                    return ApiResponse::error(
                        resolve_error.status_code(),
                        resolve_error.to_string(),
                    );
                }
            }
        };

        let result = match (self.handler)(request, &args) {
            Ok(result) => result,
            Err(handler_error) => {
                error!(
                    function = self.signature.function(),
                    %handler_error,
                    "handler failed"
                );
                return ApiResponse::internal_error(handler_error.to_string());
            }
        };

        let Some(value) = result else {
            return ApiResponse::no_content();
        };

        let body = self.shape_output(value);
        let status = request.response_status().unwrap_or(StatusCode::OK);
        ApiResponse::with_status(status, body)
    }

    /// Serializes a handler result through the output schema.
    ///
    /// Shapes the schema cannot serialize are returned as produced rather
    /// than failing the request.
    fn shape_output(&self, value: Value) -> Value {
        match &self.output_schema {
            None => value,
            Some(OutputSchema::Record(schema)) => match schema.dump(&value) {
                Ok(dumped) => dumped,
                Err(dump_error) => {
                    warn!(
                        function = self.signature.function(),
                        %dump_error,
                        "output serialization failed, returning raw result"
                    );
                    value
                }
            },
            Some(OutputSchema::ListOfRecords(schema)) => match value {
                Value::Array(items) => Value::Array(
                    items
                        .into_iter()
                        .map(|item| match schema.dump(&item) {
                            Ok(dumped) => dumped,
                            Err(dump_error) => {
                                warn!(
                                    function = self.signature.function(),
                                    %dump_error,
                                    "item serialization failed, returning raw item"
                                );
                                item
                            }
                        })
                        .collect(),
                ),
                other => other,
            },
        }
    }
}
