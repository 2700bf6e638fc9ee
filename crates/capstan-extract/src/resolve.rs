//! Parameter resolution.
//!
//! [`ParameterContext`] binds a validated path template to an inspected
//! signature and, per request, merges raw values from three sources with
//! fixed precedence: path parameters first, then query-string pairs, then
//! JSON body members. Earlier sources win; later sources only fill keys not
//! yet seen. The merged raw map is then converted parameter by parameter,
//! in declaration order, into a [`ResolvedArgs`] set.

use capstan_schema::FunctionSignature;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

use crate::convert::convert_value;
use crate::error::{ConflictError, ResolveError};
use crate::request::Request;
use crate::template::PathTemplate;

/// Per-endpoint resolution context.
///
/// Built once at registration time, shared by every request to the
/// endpoint.
///
/// # Example
///
/// ```rust
/// use capstan_extract::{ParameterContext, PathTemplate, RequestBuilder};
/// use capstan_schema::{inspect, HandlerMetadata};
/// use http::Method;
/// use serde_json::json;
///
/// let template = PathTemplate::parse("/users/{user_id}").unwrap();
/// let context = ParameterContext::new(template);
///
/// let metadata = HandlerMetadata::new("get_user")
///     .request()
///     .param::<i64>("user_id")
///     .param::<Option<bool>>("verbose");
/// let signature = inspect(&metadata).unwrap();
/// context.validate_signature(&signature).unwrap();
///
/// let request = RequestBuilder::new()
///     .method(Method::GET)
///     .uri("/users/42?verbose=yes")
///     .path_param("user_id", "42")
///     .build();
///
/// let args = context.resolve(&request, &signature).unwrap();
/// assert_eq!(args.get_i64("user_id"), Some(42));
/// assert_eq!(args.get_bool("verbose"), Some(true));
/// ```
#[derive(Debug, Clone)]
pub struct ParameterContext {
    template: PathTemplate,
}

impl ParameterContext {
    /// Creates a context over a validated template.
    #[must_use]
    pub fn new(template: PathTemplate) -> Self {
        Self { template }
    }

    /// The template this context resolves against.
    #[must_use]
    pub fn template(&self) -> &PathTemplate {
        &self.template
    }

    /// Checks that every template placeholder has a matching parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ConflictError`] listing the orphaned placeholders when any
    /// placeholder is absent from the signature.
    pub fn validate_signature(&self, signature: &FunctionSignature) -> Result<(), ConflictError> {
        let orphaned: Vec<String> = self
            .template
            .param_names()
            .iter()
            .filter(|name| signature.parameter(name).is_none())
            .cloned()
            .collect();

        if orphaned.is_empty() {
            Ok(())
        } else {
            Err(ConflictError {
                function: signature.function().to_string(),
                orphaned,
                parameters: signature
                    .non_request_parameters()
                    .map(|(n, _)| n.to_string())
                    .collect(),
            })
        }
    }

    /// Merges raw values from all sources, earlier sources winning.
    ///
    /// Path captures are restricted to placeholders the template declares.
    /// Query pairs decode independently, so an undecodable pair is skipped
    /// without losing its neighbors; for repeated query keys the first
    /// occurrence wins. The body
    /// contributes only when it parses as a JSON object; anything else,
    /// including malformed JSON, is ignored.
    #[must_use]
    pub fn collect(&self, request: &Request) -> Map<String, Value> {
        let mut raw = Map::new();

        for (name, value) in request.path_params().iter() {
            if self.template.has_param(name) {
                raw.insert(name.to_string(), Value::String(value.to_string()));
            }
        }

        if let Some(query) = request.query_string() {
            // Each pair decodes independently so one undecodable token does
            // not drop the rest of the query string.
            for token in query.split('&').filter(|token| !token.is_empty()) {
                if let Ok(pairs) = serde_urlencoded::from_str::<Vec<(String, String)>>(token) {
                    for (name, value) in pairs {
                        raw.entry(name).or_insert_with(|| Value::String(value));
                    }
                }
            }
        }

        let has_json_body = !request.is_body_empty()
            || request
                .content_type()
                .is_some_and(|ct| ct.contains("application/json"));
        if has_json_body {
            // Anything that is not a JSON object, malformed JSON included,
            // contributes nothing; the request proceeds on path/query data.
            if let Ok(Value::Object(members)) = serde_json::from_slice::<Value>(request.body()) {
                for (name, value) in members {
                    raw.entry(name).or_insert(value);
                }
            }
        }

        raw
    }

    /// Resolves every declared parameter for one request.
    ///
    /// Parameters are processed in declaration order. A parameter found in
    /// the merged raw map is converted to its inner hint; an absent
    /// parameter falls back to its default, then to null when its hint is
    /// optional.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::MissingParameter`] when a required parameter is
    ///   supplied by no source.
    /// - Conversion errors when a raw value does not fit its declared type.
    pub fn resolve(
        &self,
        request: &Request,
        signature: &FunctionSignature,
    ) -> Result<ResolvedArgs, ResolveError> {
        let raw = self.collect(request);
        debug!(
            function = signature.function(),
            raw_keys = raw.len(),
            "resolving handler arguments"
        );

        let mut values = IndexMap::new();
        for (name, param) in signature.non_request_parameters() {
            let value = match raw.get(name) {
                Some(found) => convert_value(found, param.inner_hint(), name)?,
                None => {
                    if let Some(default) = param.default() {
                        default.clone()
                    } else if param.is_optional() {
                        Value::Null
                    } else {
                        return Err(ResolveError::MissingParameter {
                            name: name.to_string(),
                        });
                    }
                }
            };
            values.insert(name.to_string(), value);
        }

        Ok(ResolvedArgs { values })
    }
}

/// Fully resolved handler arguments, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedArgs {
    values: IndexMap<String, Value>,
}

impl ResolvedArgs {
    /// Builds an argument set from already-validated data, bypassing
    /// resolution.
    #[must_use]
    pub fn from_validated(data: &Map<String, Value>) -> Self {
        Self {
            values: data
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        }
    }

    /// The resolved value for a parameter, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// The resolved value as an integer.
    #[must_use]
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    /// The resolved value as a float.
    #[must_use]
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    /// The resolved value as a string slice.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// The resolved value as a boolean.
    #[must_use]
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// Number of resolved parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no parameters were resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates resolved name/value pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capstan_schema::{inspect, HandlerMetadata, TypeDescriptor};
    use http::Method;
    use serde_json::json;

    use crate::request::RequestBuilder;

    fn context(template: &str) -> ParameterContext {
        ParameterContext::new(PathTemplate::parse(template).unwrap())
    }

    #[test]
    fn path_beats_query_beats_body() {
        let metadata = HandlerMetadata::new("h")
            .request()
            .param::<i64>("user_id")
            .param::<String>("name")
            .param::<String>("note");
        let signature = inspect(&metadata).unwrap();

        let request = RequestBuilder::new()
            .method(Method::POST)
            .uri("/users/7?user_id=999&name=query-name")
            .header("content-type", "application/json")
            .body(r#"{"user_id": 111, "name": "body-name", "note": "from-body"}"#)
            .path_param("user_id", "7")
            .build();

        let args = context("/users/{user_id}").resolve(&request, &signature).unwrap();
        assert_eq!(args.get_i64("user_id"), Some(7));
        assert_eq!(args.get_str("name"), Some("query-name"));
        assert_eq!(args.get_str("note"), Some("from-body"));
    }

    #[test]
    fn path_captures_outside_template_are_ignored() {
        let metadata = HandlerMetadata::new("h").request().param::<Option<String>>("extra");
        let signature = inspect(&metadata).unwrap();

        let request = RequestBuilder::new()
            .method(Method::GET)
            .uri("/things/1")
            .path_param("extra", "smuggled")
            .build();

        let args = context("/things/{id}").resolve(&request, &signature).unwrap();
        assert_eq!(args.get("extra"), Some(&Value::Null));
    }

    #[test]
    fn first_query_occurrence_wins() {
        let metadata = HandlerMetadata::new("h").request().param::<i64>("limit");
        let signature = inspect(&metadata).unwrap();

        let request = RequestBuilder::new()
            .method(Method::GET)
            .uri("/posts?limit=5&limit=50")
            .build();

        let args = context("/posts").resolve(&request, &signature).unwrap();
        assert_eq!(args.get_i64("limit"), Some(5));
    }

    #[test]
    fn query_pairs_decode_independently() {
        let metadata = HandlerMetadata::new("h")
            .request()
            .param::<i64>("limit")
            .param::<String>("name");
        let signature = inspect(&metadata).unwrap();

        // The middle token carries a truncated percent escape; the healthy
        // pairs on either side still decode.
        let request = RequestBuilder::new()
            .method(Method::GET)
            .uri("/posts?limit=5&bad=%F%&name=ok")
            .build();

        let args = context("/posts").resolve(&request, &signature).unwrap();
        assert_eq!(args.get_i64("limit"), Some(5));
        assert_eq!(args.get_str("name"), Some("ok"));
    }

    #[test]
    fn malformed_body_is_ignored() {
        let metadata = HandlerMetadata::new("h")
            .request()
            .param_with_default::<String>("name", json!("fallback"));
        let signature = inspect(&metadata).unwrap();

        let request = RequestBuilder::new()
            .method(Method::POST)
            .uri("/things")
            .header("content-type", "application/json")
            .body("{not json at all")
            .build();

        let args = context("/things").resolve(&request, &signature).unwrap();
        assert_eq!(args.get_str("name"), Some("fallback"));
    }

    #[test]
    fn non_object_body_is_ignored() {
        let metadata = HandlerMetadata::new("h").request().param::<Option<i64>>("n");
        let signature = inspect(&metadata).unwrap();

        let request = RequestBuilder::new()
            .method(Method::POST)
            .uri("/things")
            .body("[1, 2, 3]")
            .build();

        let args = context("/things").resolve(&request, &signature).unwrap();
        assert_eq!(args.get("n"), Some(&Value::Null));
    }

    #[test]
    fn body_without_content_type_still_contributes() {
        let metadata = HandlerMetadata::new("h").request().param::<String>("name");
        let signature = inspect(&metadata).unwrap();

        let request = RequestBuilder::new()
            .method(Method::POST)
            .uri("/things")
            .body(r#"{"name": "alice"}"#)
            .build();

        let args = context("/things").resolve(&request, &signature).unwrap();
        assert_eq!(args.get_str("name"), Some("alice"));
    }

    #[test]
    fn default_then_null_fallback() {
        let metadata = HandlerMetadata::new("h")
            .request()
            .param_with_default::<i64>("limit", json!(10))
            .param::<Option<String>>("search");
        let signature = inspect(&metadata).unwrap();

        let request = RequestBuilder::new().method(Method::GET).uri("/posts").build();

        let args = context("/posts").resolve(&request, &signature).unwrap();
        assert_eq!(args.get_i64("limit"), Some(10));
        assert_eq!(args.get("search"), Some(&Value::Null));
    }

    #[test]
    fn missing_required_parameter_names_it() {
        let metadata = HandlerMetadata::new("h").request().param::<String>("name");
        let signature = inspect(&metadata).unwrap();

        let request = RequestBuilder::new().method(Method::GET).uri("/posts").build();

        let err = context("/posts").resolve(&request, &signature).unwrap_err();
        assert_eq!(
            err,
            ResolveError::MissingParameter {
                name: "name".to_string()
            }
        );
    }

    #[test]
    fn conversion_failure_surfaces() {
        let metadata = HandlerMetadata::new("h").request().param::<i64>("user_id");
        let signature = inspect(&metadata).unwrap();

        let request = RequestBuilder::new()
            .method(Method::GET)
            .uri("/users/abc")
            .path_param("user_id", "abc")
            .build();

        let err = context("/users/{user_id}")
            .resolve(&request, &signature)
            .unwrap_err();
        assert!(matches!(err, ResolveError::Conversion { ref name, .. } if name == "user_id"));
    }

    #[test]
    fn validate_signature_reports_orphans() {
        let metadata = HandlerMetadata::new("get_user").request().param::<String>("name");
        let signature = inspect(&metadata).unwrap();

        let err = context("/users/{user_id}")
            .validate_signature(&signature)
            .unwrap_err();
        assert_eq!(err.orphaned, vec!["user_id".to_string()]);
        assert_eq!(err.parameters, vec!["name".to_string()]);

        let metadata = HandlerMetadata::new("get_user").request().param::<i64>("user_id");
        let signature = inspect(&metadata).unwrap();
        assert!(context("/users/{user_id}").validate_signature(&signature).is_ok());
    }

    #[test]
    fn enum_parameter_resolves_from_query() {
        let metadata = HandlerMetadata::new("h").request().hinted_param(
            "status",
            TypeDescriptor::enumeration("Status", vec!["Draft", "Published"]),
        );
        let signature = inspect(&metadata).unwrap();

        let request = RequestBuilder::new()
            .method(Method::GET)
            .uri("/posts?status=Published")
            .build();

        let args = context("/posts").resolve(&request, &signature).unwrap();
        assert_eq!(args.get_str("status"), Some("Published"));
    }

    #[test]
    fn resolved_args_keep_declaration_order() {
        let metadata = HandlerMetadata::new("h")
            .request()
            .param::<i64>("b")
            .param::<i64>("a");
        let signature = inspect(&metadata).unwrap();

        let request = RequestBuilder::new()
            .method(Method::GET)
            .uri("/x?a=1&b=2")
            .build();

        let args = context("/x").resolve(&request, &signature).unwrap();
        let names: Vec<_> = args.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn from_validated_bypasses_resolution() {
        let mut data = Map::new();
        data.insert("user_id".to_string(), json!(9));

        let args = ResolvedArgs::from_validated(&data);
        assert_eq!(args.get_i64("user_id"), Some(9));
        assert_eq!(args.len(), 1);
    }
}
