//! The request handle.
//!
//! [`Request`] is the per-request context handed to every handler. It
//! carries the raw HTTP parts (method, URI, headers, buffered body), the
//! path parameters captured by the router match, an optional slot for data
//! an upstream validation step already produced, and a status cell the
//! handler can set to override the response status.

use std::cell::Cell;

use bytes::Bytes;
use capstan_router::Params;
use http::{HeaderMap, Method, StatusCode, Uri};
use serde_json::{Map, Value};

/// Per-request context passed to handlers.
///
/// Owned exclusively by one request-handling invocation; registration-time
/// artifacts never hold on to it.
///
/// # Example
///
/// ```rust
/// use capstan_extract::RequestBuilder;
/// use http::Method;
///
/// let request = RequestBuilder::new()
///     .method(Method::GET)
///     .uri("/users/42?verbose=true")
///     .path_param("user_id", "42")
///     .build();
///
/// assert_eq!(request.path(), "/users/42");
/// assert_eq!(request.query_string(), Some("verbose=true"));
/// assert_eq!(request.path_params().get("user_id"), Some("42"));
/// ```
#[derive(Debug)]
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    path_params: Params,
    validated: Option<Map<String, Value>>,
    response_status: Cell<Option<StatusCode>>,
}

impl Request {
    /// The HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// The path portion of the URI.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// The query string, if present.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.uri.query()
    }

    /// The request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A header value as a string, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The Content-Type header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// The buffered request body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// True when the body is empty.
    #[must_use]
    pub fn is_body_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Path parameters captured by the router match.
    #[must_use]
    pub fn path_params(&self) -> &Params {
        &self.path_params
    }

    /// Argument data an upstream validation step already produced, if any.
    ///
    /// When present, the view handler bridge uses it directly instead of
    /// running full parameter resolution.
    #[must_use]
    pub fn validated(&self) -> Option<&Map<String, Value>> {
        self.validated.as_ref()
    }

    /// Overrides the response status for this request.
    ///
    /// Handlers use this to return e.g. 404 or 201 alongside a payload.
    pub fn set_response_status(&self, status: StatusCode) {
        self.response_status.set(Some(status));
    }

    /// The status override set by the handler, if any.
    #[must_use]
    pub fn response_status(&self) -> Option<StatusCode> {
        self.response_status.get()
    }
}

/// Builder for [`Request`].
#[derive(Debug, Default)]
pub struct RequestBuilder {
    method: Option<Method>,
    uri: Option<Uri>,
    headers: HeaderMap,
    body: Bytes,
    path_params: Params,
    validated: Option<Map<String, Value>>,
}

impl RequestBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the URI from its string form.
    ///
    /// Invalid URIs are ignored, leaving the slot unset.
    #[must_use]
    pub fn uri(mut self, uri: &str) -> Self {
        if let Ok(parsed) = uri.parse() {
            self.uri = Some(parsed);
        }
        self
    }

    /// Sets all headers at once.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Adds a single header; invalid values are ignored.
    #[must_use]
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = value.parse() {
            self.headers.insert(name, value);
        }
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the matched path parameters.
    #[must_use]
    pub fn path_params(mut self, params: Params) -> Self {
        self.path_params = params;
        self
    }

    /// Adds a single matched path parameter.
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.push(name, value);
        self
    }

    /// Attaches upstream-validated argument data.
    #[must_use]
    pub fn validated(mut self, data: Map<String, Value>) -> Self {
        self.validated = Some(data);
        self
    }

    /// Builds the request.
    ///
    /// # Panics
    ///
    /// Panics if method or uri were not set.
    #[must_use]
    pub fn build(self) -> Request {
        Request {
            method: self.method.expect("method is required"),
            uri: self.uri.expect("uri is required"),
            headers: self.headers,
            body: self.body,
            path_params: self.path_params,
            validated: self.validated,
            response_status: Cell::new(None),
        }
    }
}
