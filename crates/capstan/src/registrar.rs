//! Two-phase endpoint registration.
//!
//! Views are queued with [`Registrar::register`] (or the per-method
//! conveniences) and nothing is validated until [`Registrar::finalize`],
//! which inspects every signature, generates schemas, and builds one
//! [`RoutedService`] per path template no matter how many methods were
//! registered against it. Deferring the work means registration order never
//! matters and every configuration error surfaces in one place.

use std::sync::Arc;

use capstan_extract::{ParameterContext, PathTemplate, Request, ResolvedArgs};
use capstan_router::{MethodMap, RouteTable};
use capstan_schema::{
    generate_input_schema, generate_output_schema, inspect, HandlerMetadata,
};
use http::Method;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::endpoint::{BoxError, Endpoint, Handler};
use crate::error::RegistrationError;
use crate::router::ApiRouter;
use crate::service::{RoutedService, ViewOptions};

struct PendingView {
    method: Method,
    metadata: HandlerMetadata,
    options: ViewOptions,
    handler: Handler,
}

/// Collects view registrations and finalizes them into an [`ApiRouter`].
///
/// # Example
///
/// ```rust
/// use capstan::{Registrar, ViewOptions};
/// use capstan_schema::HandlerMetadata;
/// use serde_json::json;
///
/// let mut registrar = Registrar::new();
/// registrar.get(
///     "/users/{user_id}",
///     HandlerMetadata::new("get_user").request().param::<i64>("user_id"),
///     ViewOptions::new(),
///     |_request, args| Ok(Some(json!({"id": args.get_i64("user_id")}))),
/// );
///
/// let router = registrar.finalize().unwrap();
/// assert_eq!(router.len(), 1);
/// ```
#[derive(Default)]
pub struct Registrar {
    pending: IndexMap<String, Vec<PendingView>>,
}

impl Registrar {
    /// Creates an empty registrar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a view for an arbitrary method and path.
    ///
    /// Nothing is validated here; all errors surface from
    /// [`finalize`](Self::finalize).
    pub fn register<F>(
        &mut self,
        method: Method,
        path: &str,
        metadata: HandlerMetadata,
        options: ViewOptions,
        handler: F,
    ) -> &mut Self
    where
        F: Fn(&Request, &ResolvedArgs) -> Result<Option<Value>, BoxError>
            + Send
            + Sync
            + 'static,
    {
        self.pending
            .entry(path.to_string())
            .or_default()
            .push(PendingView {
                method,
                metadata,
                options,
                handler: Arc::new(handler),
            });
        self
    }

    /// Number of paths with queued views.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True when nothing has been queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Builds every queued view into a routed service and returns the
    /// router.
    ///
    /// # Errors
    ///
    /// Returns the first [`RegistrationError`] encountered: an invalid
    /// template, a signature that fails inspection, a template placeholder
    /// with no matching parameter, an unsupported declared type, or two
    /// views on the same method and path.
    pub fn finalize(self) -> Result<ApiRouter, RegistrationError> {
        let mut table = RouteTable::new();

        for (path, views) in self.pending {
            let template =
                PathTemplate::parse(&path).map_err(|source| RegistrationError::Template {
                    path: path.clone(),
                    source,
                })?;
            let context = ParameterContext::new(template);

            let mut methods = MethodMap::new();
            let mut description = None;

            for view in views {
                let function = view.metadata.function().to_string();

                let signature =
                    inspect(&view.metadata).map_err(|source| RegistrationError::Signature {
                        function: function.clone(),
                        method: view.method.clone(),
                        path: path.clone(),
                        source,
                    })?;

                context
                    .validate_signature(&signature)
                    .map_err(|source| RegistrationError::Conflict {
                        function: function.clone(),
                        method: view.method.clone(),
                        path: path.clone(),
                        source,
                    })?;

                let schema_error = |source| RegistrationError::Schema {
                    function: function.clone(),
                    method: view.method.clone(),
                    path: path.clone(),
                    source,
                };
                let input_schema = generate_input_schema(&signature).map_err(schema_error)?;
                let output_schema =
                    generate_output_schema(signature.return_hint()).map_err(schema_error)?;

                if methods.entry(&view.method).is_some() {
                    return Err(RegistrationError::DuplicateRoute {
                        method: view.method,
                        path,
                    });
                }

                if description.is_none() {
                    description = view.options.description.clone();
                }

                debug!(
                    function = %function,
                    method = %view.method,
                    path = %path,
                    "registered view"
                );

                let stored = methods.insert(
                    &view.method,
                    Endpoint::new(
                        view.handler,
                        signature,
                        context.clone(),
                        input_schema,
                        output_schema,
                        view.options.permission,
                    ),
                );
                if !stored {
                    return Err(RegistrationError::UnsupportedMethod {
                        method: view.method,
                        path,
                    });
                }
            }

            let service = RoutedService::new(service_name(&path), path.clone(), description, methods);
            debug!(service = service.name(), path = %path, "created path service");
            table.insert(&path, Arc::new(service));
        }

        Ok(ApiRouter::new(table))
    }

    /// Queues a GET view.
    pub fn get<F>(
        &mut self,
        path: &str,
        metadata: HandlerMetadata,
        options: ViewOptions,
        handler: F,
    ) -> &mut Self
    where
        F: Fn(&Request, &ResolvedArgs) -> Result<Option<Value>, BoxError>
            + Send
            + Sync
            + 'static,
    {
        self.register(Method::GET, path, metadata, options, handler)
    }

    /// Queues a POST view.
    pub fn post<F>(
        &mut self,
        path: &str,
        metadata: HandlerMetadata,
        options: ViewOptions,
        handler: F,
    ) -> &mut Self
    where
        F: Fn(&Request, &ResolvedArgs) -> Result<Option<Value>, BoxError>
            + Send
            + Sync
            + 'static,
    {
        self.register(Method::POST, path, metadata, options, handler)
    }

    /// Queues a PUT view.
    pub fn put<F>(
        &mut self,
        path: &str,
        metadata: HandlerMetadata,
        options: ViewOptions,
        handler: F,
    ) -> &mut Self
    where
        F: Fn(&Request, &ResolvedArgs) -> Result<Option<Value>, BoxError>
            + Send
            + Sync
            + 'static,
    {
        self.register(Method::PUT, path, metadata, options, handler)
    }

    /// Queues a PATCH view.
    pub fn patch<F>(
        &mut self,
        path: &str,
        metadata: HandlerMetadata,
        options: ViewOptions,
        handler: F,
    ) -> &mut Self
    where
        F: Fn(&Request, &ResolvedArgs) -> Result<Option<Value>, BoxError>
            + Send
            + Sync
            + 'static,
    {
        self.register(Method::PATCH, path, metadata, options, handler)
    }

    /// Queues a DELETE view.
    pub fn delete<F>(
        &mut self,
        path: &str,
        metadata: HandlerMetadata,
        options: ViewOptions,
        handler: F,
    ) -> &mut Self
    where
        F: Fn(&Request, &ResolvedArgs) -> Result<Option<Value>, BoxError>
            + Send
            + Sync
            + 'static,
    {
        self.register(Method::DELETE, path, metadata, options, handler)
    }

    /// Queues a HEAD view.
    pub fn head<F>(
        &mut self,
        path: &str,
        metadata: HandlerMetadata,
        options: ViewOptions,
        handler: F,
    ) -> &mut Self
    where
        F: Fn(&Request, &ResolvedArgs) -> Result<Option<Value>, BoxError>
            + Send
            + Sync
            + 'static,
    {
        self.register(Method::HEAD, path, metadata, options, handler)
    }

    /// Queues an OPTIONS view.
    pub fn options<F>(
        &mut self,
        path: &str,
        metadata: HandlerMetadata,
        options: ViewOptions,
        handler: F,
    ) -> &mut Self
    where
        F: Fn(&Request, &ResolvedArgs) -> Result<Option<Value>, BoxError>
            + Send
            + Sync
            + 'static,
    {
        self.register(Method::OPTIONS, path, metadata, options, handler)
    }
}

impl std::fmt::Debug for Registrar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registrar")
            .field("paths", &self.pending.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Derives a stable service name from a path template.
fn service_name(path: &str) -> String {
    let folded: String = path
        .chars()
        .filter(|c| *c != '{' && *c != '}')
        .map(|c| if c == '/' { '_' } else { c })
        .collect();
    let trimmed = folded.trim_matches('_');
    if trimmed.is_empty() {
        "service_root".to_string()
    } else {
        format!("service_{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_names_fold_paths() {
        assert_eq!(service_name("/users/{user_id}"), "service_users_user_id");
        assert_eq!(service_name("/posts"), "service_posts");
        assert_eq!(service_name("/"), "service_root");
    }
}
