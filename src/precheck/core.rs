use tracing::debug;

use crate::response::Response;
use crate::router::{Route, RouteArgs};

/// A predicate evaluated over the captured route arguments before dispatch.
///
/// Returning `None` lets the request proceed; returning a [`Response`]
/// short-circuits the request with that response verbatim. A precheck that
/// consults a backing store (the typical exists-or-404 case) is an external
/// collaborator; this trait only fixes the contract.
pub trait Precheck: Send + Sync {
    fn check(&self, args: &RouteArgs) -> Option<Response>;
}

/// Adapter turning a closure into a [`Precheck`], keeping route tables terse.
pub struct FnPrecheck<F>(F);

impl<F> FnPrecheck<F>
where
    F: Fn(&RouteArgs) -> Option<Response> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Precheck for FnPrecheck<F>
where
    F: Fn(&RouteArgs) -> Option<Response> + Send + Sync,
{
    fn check(&self, args: &RouteArgs) -> Option<Response> {
        (self.0)(args)
    }
}

/// Run a route's precheck, if any. Absent prechecks always pass.
///
/// This runs exactly once per matched route, strictly before the dispatch
/// pipeline; a non-`None` result terminates the request.
#[must_use]
pub fn evaluate(route: &Route, args: &RouteArgs) -> Option<Response> {
    let response = route.precheck().and_then(|check| check.check(args));
    if let Some(resp) = &response {
        debug!(
            pattern = %route.pattern(),
            code = resp.code,
            "Precheck short-circuited the request"
        );
    }
    response
}
