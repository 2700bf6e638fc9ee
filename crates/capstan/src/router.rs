//! Dispatch over finalized services.

use std::sync::Arc;

use bytes::Bytes;
use capstan_extract::RequestBuilder;
use capstan_router::RouteTable;
use http::{HeaderMap, Method, Uri};
use tracing::debug;

use crate::response::ApiResponse;
use crate::service::RoutedService;

/// The finalized routing table: one [`RoutedService`] per registered path.
///
/// Produced by [`Registrar::finalize`]; immutable and shareable afterwards.
///
/// [`Registrar::finalize`]: crate::Registrar::finalize
#[derive(Debug, Clone)]
pub struct ApiRouter {
    table: RouteTable<Arc<RoutedService>>,
}

impl ApiRouter {
    pub(crate) fn new(table: RouteTable<Arc<RoutedService>>) -> Self {
        Self { table }
    }

    /// Number of registered path services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// True when no path is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Looks up the service mounted at a concrete request path.
    #[must_use]
    pub fn service(&self, path: &str) -> Option<&RoutedService> {
        self.table.match_path(path).map(|m| m.entry.as_ref())
    }

    /// Dispatches one request end to end.
    ///
    /// An unmatched path yields 404; a matched path with no endpoint for
    /// the method yields 405 listing the allowed methods; everything else
    /// is handled by the matched endpoint.
    #[must_use]
    pub fn dispatch(
        &self,
        method: Method,
        uri: &str,
        headers: HeaderMap,
        body: impl Into<Bytes>,
    ) -> ApiResponse {
        let Ok(parsed) = uri.parse::<Uri>() else {
            return ApiResponse::bad_request(format!("invalid request uri '{uri}'"));
        };

        let Some(matched) = self.table.match_path(parsed.path()) else {
            debug!(%method, path = parsed.path(), "no service matches path");
            return ApiResponse::not_found(format!(
                "no endpoint matches path '{}'",
                parsed.path()
            ));
        };

        let service = matched.entry;
        let Some(endpoint) = service.methods().entry(&method) else {
            let allowed: Vec<String> = service
                .methods()
                .allowed_methods()
                .iter()
                .map(Method::to_string)
                .collect();
            debug!(%method, path = parsed.path(), ?allowed, "method not allowed");
            return ApiResponse::method_not_allowed(format!(
                "method {method} is not allowed for '{}'; allowed: {}",
                service.path(),
                allowed.join(", ")
            ));
        };

        let request = RequestBuilder::new()
            .method(method)
            .uri(uri)
            .headers(headers)
            .body(body)
            .path_params(matched.params)
            .build();

        endpoint.handle(&request)
    }
}
