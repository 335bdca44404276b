use http::Method;
use regex::Regex;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::pipeline::MethodBinding;
use crate::precheck::Precheck;

/// Maximum capture groups stored inline before spilling to the heap.
/// REST paths rarely capture more than a couple of identifiers.
pub const MAX_INLINE_ARGS: usize = 4;

/// Ordered capture-group values of a matched pattern, left to right.
/// Index 0 is the first capture group.
pub type RouteArgs = SmallVec<[String; MAX_INLINE_ARGS]>;

/// A declared route: a path pattern with capture groups, per-verb method
/// bindings, and an optional precondition.
///
/// Routes are data, not logic: the only executable parts are the precheck
/// predicate and the middleware strategies referenced by each binding.
pub struct Route {
    pattern: String,
    regex: Regex,
    methods: HashMap<Method, MethodBinding>,
    precheck: Option<Arc<dyn Precheck>>,
}

impl Route {
    /// Declare a route for `pattern`. The pattern is anchored at both ends
    /// when matching, so `/items` never matches `/items/1`.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^{pattern}$"))?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            methods: HashMap::new(),
            precheck: None,
        })
    }

    /// Bind a verb to a method.
    #[must_use]
    pub fn method(mut self, verb: Method, binding: MethodBinding) -> Self {
        self.methods.insert(verb, binding);
        self
    }

    /// Attach a precondition evaluated before dispatch.
    #[must_use]
    pub fn with_precheck(mut self, check: impl Precheck + 'static) -> Self {
        self.precheck = Some(Arc::new(check));
        self
    }

    /// The declared pattern, without anchors.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The binding for `verb`, if the route covers it.
    #[must_use]
    pub fn binding(&self, verb: &Method) -> Option<&MethodBinding> {
        self.methods.get(verb)
    }

    /// The attached precheck, if any.
    #[must_use]
    pub fn precheck(&self) -> Option<&Arc<dyn Precheck>> {
        self.precheck.as_ref()
    }

    pub(crate) fn captures(&self, path: &str) -> Option<RouteArgs> {
        self.regex.captures(path).map(|caps| {
            caps.iter()
                .skip(1)
                .map(|group| group.map_or_else(String::new, |m| m.as_str().to_string()))
                .collect()
        })
    }
}

/// An ordered, read-only route table.
///
/// Declaration order is significant: resolution stops at the first pattern
/// that matches. The table is immutable after construction and safe to share
/// across concurrently handled requests.
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Build a router over an ordered route table.
    #[must_use]
    pub fn new(routes: Vec<Route>) -> Self {
        let patterns: Vec<&str> = routes.iter().take(10).map(Route::pattern).collect();
        info!(
            routes_count = routes.len(),
            routes_summary = ?patterns,
            "Routing table loaded"
        );
        Self { routes }
    }

    /// Match `path` against the table, first declared match wins.
    ///
    /// Returns the matched route and its captured arguments, one per capture
    /// group in left-to-right order. For a fixed table the result is stable
    /// across calls.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<(&Route, RouteArgs)> {
        for route in &self.routes {
            if let Some(args) = route.captures(path) {
                debug!(
                    path = %path,
                    pattern = %route.pattern(),
                    route_args = ?args,
                    "Route matched"
                );
                return Some((route, args));
            }
        }
        warn!(path = %path, "No route matched");
        None
    }

    /// Number of declared routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
