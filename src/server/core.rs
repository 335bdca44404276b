use std::sync::Arc;
use tracing::{info, warn};

use crate::error::ProcedureError;
use crate::pipeline::{self, DispatchOptions};
use crate::precheck;
use crate::registry::ProcedureRegistry;
use crate::request::{self, TransportInputs};
use crate::response::{self, Response};
use crate::router::Router;

/// External credential verification.
///
/// The token, when present, comes from the `Authorization` header. A failure
/// whose code is `invalidtoken` is reported to the caller as 403; any other
/// failure is a 500. Actual credential storage and checking live outside the
/// core.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, token: Option<&str>) -> Result<(), ProcedureError>;
}

/// Authenticator that accepts every request. For hosts enforcing credentials
/// elsewhere, and for tests.
pub struct AllowAll;

impl Authenticator for AllowAll {
    fn authenticate(&self, _token: Option<&str>) -> Result<(), ProcedureError> {
        Ok(())
    }
}

/// The request orchestrator: sequences normalization, route resolution,
/// authentication, precondition checks, and pipeline dispatch into one
/// request lifecycle.
///
/// Every early exit is an ordinary `return` of a [`Response`]; exactly one
/// response is produced per request. The server holds only read-only state
/// and is safe to share across concurrently handled requests.
pub struct Server {
    router: Router,
    registry: Arc<dyn ProcedureRegistry>,
    authenticator: Arc<dyn Authenticator>,
    verbose: bool,
}

impl Server {
    /// Build a server over a route table and a procedure registry. The
    /// default authenticator accepts everything; verbose mode is off.
    #[must_use]
    pub fn new(router: Router, registry: Arc<dyn ProcedureRegistry>) -> Self {
        Self {
            router,
            registry,
            authenticator: Arc::new(AllowAll),
            verbose: false,
        }
    }

    /// Install a credential verifier consulted after route resolution.
    #[must_use]
    pub fn with_authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = authenticator;
        self
    }

    /// Enable development mode: serialized failures carry trace and debug
    /// detail. Never enable in production.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Handle one request to completion.
    ///
    /// Lifecycle: normalize → resolve (no route ⇒ 404) → verb gate (405) →
    /// authenticate → precheck → dispatch. A binding without a concrete
    /// procedure name is a route-declaration defect and yields an empty 500.
    #[must_use]
    pub fn handle(&self, inputs: TransportInputs) -> Response {
        let req = request::normalize(inputs);
        info!(verb = %req.verb, path = %req.path, "Request received");

        let Some((route, args)) = self.router.resolve(&req.path) else {
            return response::not_found();
        };

        let Some(binding) = route.binding(&req.verb) else {
            warn!(
                verb = %req.verb,
                pattern = %route.pattern(),
                "Route does not cover requested verb"
            );
            return response::method_not_allowed();
        };

        let token = request::extract_token(&req);
        if let Err(err) = self.authenticator.authenticate(token) {
            warn!(error = %err, "Authentication failed");
            return if err.has_code("invalidtoken") {
                response::forbidden_from_error(&err, self.verbose)
            } else {
                response::internal_server_error_from_error(&err, self.verbose)
            };
        }

        if let Some(resp) = precheck::evaluate(route, &args) {
            return resp;
        }

        // Only procedure-backed methods are supported; an unbound method is
        // a bug in the route declaration.
        if binding.procedure().is_empty() {
            warn!(pattern = %route.pattern(), "Method binding has no procedure");
            return response::internal_server_error_empty();
        }

        let options = DispatchOptions {
            verbose: self.verbose,
        };
        let resp = pipeline::dispatch(binding, self.registry.as_ref(), &args, &req, &options);
        info!(code = resp.code, verb = %req.verb, path = %req.path, "Response produced");
        resp
    }
}
