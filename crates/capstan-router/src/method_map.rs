//! Per-method entry slots for a single path.

use http::Method;

/// Maps HTTP methods to entries for a single path template.
///
/// One routed path may serve several HTTP methods; each method gets its own
/// slot. The map is generic so callers can store anything from operation
/// names in tests to full endpoint objects in the registrar.
///
/// # Example
///
/// ```rust
/// use capstan_router::MethodMap;
/// use http::Method;
///
/// let map = MethodMap::new().get("listUsers").post("createUser");
///
/// assert_eq!(map.entry(&Method::GET), Some(&"listUsers"));
/// assert_eq!(map.entry(&Method::DELETE), None);
/// assert_eq!(map.allowed_methods(), vec![Method::GET, Method::POST]);
/// ```
#[derive(Debug, Clone)]
pub struct MethodMap<T> {
    get: Option<T>,
    post: Option<T>,
    put: Option<T>,
    patch: Option<T>,
    delete: Option<T>,
    head: Option<T>,
    options: Option<T>,
}

impl<T> Default for MethodMap<T> {
    fn default() -> Self {
        Self {
            get: None,
            post: None,
            put: None,
            patch: None,
            delete: None,
            head: None,
            options: None,
        }
    }
}

impl<T> MethodMap<T> {
    /// Creates an empty method map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the GET entry.
    #[must_use]
    pub fn get(mut self, entry: T) -> Self {
        self.get = Some(entry);
        self
    }

    /// Sets the POST entry.
    #[must_use]
    pub fn post(mut self, entry: T) -> Self {
        self.post = Some(entry);
        self
    }

    /// Sets the PUT entry.
    #[must_use]
    pub fn put(mut self, entry: T) -> Self {
        self.put = Some(entry);
        self
    }

    /// Sets the PATCH entry.
    #[must_use]
    pub fn patch(mut self, entry: T) -> Self {
        self.patch = Some(entry);
        self
    }

    /// Sets the DELETE entry.
    #[must_use]
    pub fn delete(mut self, entry: T) -> Self {
        self.delete = Some(entry);
        self
    }

    /// Inserts an entry for an arbitrary method.
    ///
    /// Returns `false`, leaving the map unchanged, when the method has no
    /// slot (anything outside the seven supported methods); callers decide
    /// whether that is an error.
    pub fn insert(&mut self, method: &Method, entry: T) -> bool {
        let slot = match *method {
            Method::GET => &mut self.get,
            Method::POST => &mut self.post,
            Method::PUT => &mut self.put,
            Method::PATCH => &mut self.patch,
            Method::DELETE => &mut self.delete,
            Method::HEAD => &mut self.head,
            Method::OPTIONS => &mut self.options,
            _ => return false,
        };
        *slot = Some(entry);
        true
    }

    /// Returns the entry registered for `method`, if any.
    #[must_use]
    pub fn entry(&self, method: &Method) -> Option<&T> {
        match *method {
            Method::GET => self.get.as_ref(),
            Method::POST => self.post.as_ref(),
            Method::PUT => self.put.as_ref(),
            Method::PATCH => self.patch.as_ref(),
            Method::DELETE => self.delete.as_ref(),
            Method::HEAD => self.head.as_ref(),
            Method::OPTIONS => self.options.as_ref(),
            _ => None,
        }
    }

    /// Lists the methods that have an entry, in a fixed canonical order.
    #[must_use]
    pub fn allowed_methods(&self) -> Vec<Method> {
        let slots = [
            (Method::GET, self.get.is_some()),
            (Method::POST, self.post.is_some()),
            (Method::PUT, self.put.is_some()),
            (Method::PATCH, self.patch.is_some()),
            (Method::DELETE, self.delete.is_some()),
            (Method::HEAD, self.head.is_some()),
            (Method::OPTIONS, self.options.is_some()),
        ];
        slots
            .into_iter()
            .filter_map(|(m, present)| present.then_some(m))
            .collect()
    }

    /// Returns the number of registered methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.allowed_methods().len()
    }

    /// Returns true when no method has an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
