//! Path services.
//!
//! All views registered for the same path template share a single
//! [`RoutedService`]: one routing entry with a per-method slot for each
//! registered view.

use capstan_router::MethodMap;

use crate::endpoint::Endpoint;

/// Per-view registration options.
#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    pub(crate) permission: Option<String>,
    pub(crate) description: Option<String>,
}

impl ViewOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a permission requirement for the host's authorization layer.
    #[must_use]
    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    /// Human-readable description of the view, kept on the service.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// All endpoints registered for one path template.
#[derive(Debug, Clone)]
pub struct RoutedService {
    name: String,
    path: String,
    description: String,
    methods: MethodMap<Endpoint>,
}

impl RoutedService {
    pub(crate) fn new(
        name: String,
        path: String,
        description: Option<String>,
        methods: MethodMap<Endpoint>,
    ) -> Self {
        let description = description.unwrap_or_else(|| format!("Service for {path}"));
        Self {
            name,
            path,
            description,
            methods,
        }
    }

    /// The derived service name, unique per path.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The path template this service is mounted at.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The first description any of the path's views supplied, or the
    /// generated "Service for {path}" fallback.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The per-method endpoints.
    #[must_use]
    pub fn methods(&self) -> &MethodMap<Endpoint> {
        &self.methods
    }
}
