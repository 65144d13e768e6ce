//! The route table: path -> verb map -> handler.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::handler::Handler;
use crate::path::PathPattern;
use crate::request::{Method, PathParams};

/// The handlers registered for one path, keyed by verb.
pub struct VerbMap {
    pattern: PathPattern,
    methods: HashMap<Method, Arc<dyn Handler>>,
}

impl VerbMap {
    fn new(pattern: PathPattern) -> Self {
        Self {
            pattern,
            methods: HashMap::new(),
        }
    }

    /// Returns the path pattern this verb map is registered under.
    pub fn path(&self) -> &str {
        self.pattern.pattern()
    }

    /// Returns the handler for `method`, if one is registered.
    pub fn handler(&self, method: Method) -> Option<&Arc<dyn Handler>> {
        self.methods.get(&method)
    }

    /// Returns the number of registered verbs.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Returns true if no verb is registered.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl fmt::Debug for VerbMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerbMap")
            .field("path", &self.path())
            .field("methods", &allowed_methods(self))
            .finish()
    }
}

/// Returns the verbs registered on a verb map, in lexical order.
pub fn allowed_methods(verbs: &VerbMap) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = verbs.methods.keys().map(Method::as_str).collect();
    names.sort_unstable();
    names
}

/// One static (path, verb, handler) wiring entry.
#[derive(Clone)]
pub struct RouteDescriptor {
    /// Path pattern, relative to the base path.
    pub path: String,
    /// HTTP verb.
    pub method: Method,
    /// Request handler.
    pub handler: Arc<dyn Handler>,
}

impl RouteDescriptor {
    /// Creates a descriptor.
    pub fn new(path: impl Into<String>, method: Method, handler: impl Handler + 'static) -> Self {
        Self {
            path: path.into(),
            method,
            handler: Arc::new(handler),
        }
    }
}

impl fmt::Debug for RouteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// The full path -> verb map registry.
///
/// Built once at startup; lookups take `&self`, so a table behind an `Arc`
/// is shared between request tasks without locking.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<VerbMap>,
}

impl RouteTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from static descriptors, prefixing each path with
    /// `base_path`.
    pub fn from_descriptors(base_path: &str, descriptors: &[RouteDescriptor]) -> Result<Self> {
        let mut table = Self::new();
        let base = base_path.trim_end_matches('/');
        for desc in descriptors {
            let path = format!("{base}{}", desc.path);
            table.register_arc(&path, desc.method, Arc::clone(&desc.handler))?;
        }
        Ok(table)
    }

    /// Wires `handler` to `(path, method)`.
    ///
    /// A later registration for the same pair replaces the earlier one.
    pub fn register(
        &mut self,
        path: &str,
        method: Method,
        handler: impl Handler + 'static,
    ) -> Result<&mut Self> {
        self.register_arc(path, method, Arc::new(handler))
    }

    /// Like [`RouteTable::register`] for an already shared handler.
    pub fn register_arc(
        &mut self,
        path: &str,
        method: Method,
        handler: Arc<dyn Handler>,
    ) -> Result<&mut Self> {
        let index = match self.routes.iter().position(|v| v.path() == path) {
            Some(index) => index,
            None => {
                self.routes.push(VerbMap::new(PathPattern::parse(path)?));
                self.routes.len() - 1
            }
        };
        self.routes[index].methods.insert(method, handler);
        Ok(self)
    }

    /// Returns the verb map registered under exactly this pattern.
    pub fn verb_map(&self, pattern: &str) -> Option<&VerbMap> {
        self.routes.iter().find(|v| v.path() == pattern)
    }

    /// Finds the verb map whose pattern matches a concrete request path.
    ///
    /// When several patterns match, the one with the fewest parameters wins,
    /// so literal segments take precedence over `{param}` segments.
    pub fn lookup(&self, path: &str) -> Option<(&VerbMap, PathParams)> {
        self.routes
            .iter()
            .filter_map(|verbs| verbs.pattern.match_path(path).map(|p| (verbs, p)))
            .min_by_key(|(verbs, _)| verbs.pattern.param_names().len())
    }

    /// Iterates over every registered verb map.
    pub fn iter(&self) -> impl Iterator<Item = &VerbMap> {
        self.routes.iter()
    }

    /// Returns the number of registered paths.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
