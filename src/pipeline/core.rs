use http::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{ErrorKind, ProcedureError};
use crate::registry::ProcedureRegistry;
use crate::request::Request;
use crate::response::{self, Response};
use crate::router::RouteArgs;

/// Per-dispatch options threaded through every stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchOptions {
    /// Development-mode flag: when set, serialized failures carry trace and
    /// debug detail. Production hosts leave this off.
    pub verbose: bool,
}

/// Stage 1: reshape the positional captured arguments (and optionally the
/// request body or query) into the argument structure the procedure expects.
pub trait ArgMapper: Send + Sync {
    fn map(&self, args: &RouteArgs, request: &Request, options: &DispatchOptions) -> Value;
}

/// Stage 5: reshape the procedure's native result into the REST surface's
/// shape, e.g. unwrapping a single-element collection.
pub trait ResultMapper: Send + Sync {
    fn map(&self, result: Value) -> Value;
}

/// Stage 6: turn the mapped result into a [`Response`].
pub trait Responder: Send + Sync {
    fn respond(
        &self,
        result: Value,
        args: &RouteArgs,
        request: &Request,
        options: &DispatchOptions,
    ) -> Response;
}

/// Failure branch of the invoke stage: classify an invocation error into a
/// [`Response`].
pub trait ErrorHandler: Send + Sync {
    fn handle(
        &self,
        error: &ProcedureError,
        args: &RouteArgs,
        request: &Request,
        options: &DispatchOptions,
    ) -> Response;
}

/// Default argument mapper: the positional captures, unchanged, as a JSON
/// array.
pub struct IdentityArgMapper;

impl ArgMapper for IdentityArgMapper {
    fn map(&self, args: &RouteArgs, _request: &Request, _options: &DispatchOptions) -> Value {
        Value::Array(args.iter().map(|a| Value::String(a.clone())).collect())
    }
}

/// Default result mapper: pass the result through unchanged.
pub struct IdentityResultMapper;

impl ResultMapper for IdentityResultMapper {
    fn map(&self, result: Value) -> Value {
        result
    }
}

/// The "traditional" response policy:
/// POST with a null result is `204 No Content`, POST with a value is
/// `201 Created`, GET with a null result is `404 Not Found`, anything else is
/// `200 OK` with the result as body.
pub struct TraditionalResponder;

impl Responder for TraditionalResponder {
    fn respond(
        &self,
        result: Value,
        _args: &RouteArgs,
        request: &Request,
        _options: &DispatchOptions,
    ) -> Response {
        if request.verb == Method::POST {
            if result.is_null() {
                response::no_content()
            } else {
                response::created(result)
            }
        } else if request.verb == Method::GET && result.is_null() {
            response::not_found()
        } else {
            response::ok(result)
        }
    }
}

/// Classify an invocation error the default way.
///
/// Custom error handlers that only special-case a few codes should delegate
/// here for everything else.
#[must_use]
pub fn traditional_error_response(error: &ProcedureError, options: &DispatchOptions) -> Response {
    let verbose = options.verbose;
    match error.kind {
        ErrorKind::MissingCapability => response::forbidden_from_error(error, verbose),
        // Not 404: the missing record is likely a different resource than the
        // one addressed by the path.
        ErrorKind::MissingRecord => response::bad_request_from_error(error, verbose),
        ErrorKind::Application | ErrorKind::Validation => {
            if error.code_contains("contextnotvalid") {
                response::forbidden_from_error(error, verbose)
            } else {
                response::internal_server_error_from_error(error, verbose)
            }
        }
        ErrorKind::Unknown => response::internal_server_error_from_error(error, verbose),
    }
}

/// Default error handler wrapping [`traditional_error_response`].
pub struct TraditionalErrorHandler;

impl ErrorHandler for TraditionalErrorHandler {
    fn handle(
        &self,
        error: &ProcedureError,
        _args: &RouteArgs,
        _request: &Request,
        options: &DispatchOptions,
    ) -> Response {
        traditional_error_response(error, options)
    }
}

/// Closure adapter for [`ArgMapper`].
pub struct FnArgMapper<F>(F);

impl<F> FnArgMapper<F>
where
    F: Fn(&RouteArgs, &Request, &DispatchOptions) -> Value + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> ArgMapper for FnArgMapper<F>
where
    F: Fn(&RouteArgs, &Request, &DispatchOptions) -> Value + Send + Sync,
{
    fn map(&self, args: &RouteArgs, request: &Request, options: &DispatchOptions) -> Value {
        (self.0)(args, request, options)
    }
}

/// Closure adapter for [`ResultMapper`].
pub struct FnResultMapper<F>(F);

impl<F> FnResultMapper<F>
where
    F: Fn(Value) -> Value + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> ResultMapper for FnResultMapper<F>
where
    F: Fn(Value) -> Value + Send + Sync,
{
    fn map(&self, result: Value) -> Value {
        (self.0)(result)
    }
}

/// Closure adapter for [`Responder`].
pub struct FnResponder<F>(F);

impl<F> FnResponder<F>
where
    F: Fn(Value, &RouteArgs, &Request, &DispatchOptions) -> Response + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Responder for FnResponder<F>
where
    F: Fn(Value, &RouteArgs, &Request, &DispatchOptions) -> Response + Send + Sync,
{
    fn respond(
        &self,
        result: Value,
        args: &RouteArgs,
        request: &Request,
        options: &DispatchOptions,
    ) -> Response {
        (self.0)(result, args, request, options)
    }
}

/// Closure adapter for [`ErrorHandler`].
pub struct FnErrorHandler<F>(F);

impl<F> FnErrorHandler<F>
where
    F: Fn(&ProcedureError, &RouteArgs, &Request, &DispatchOptions) -> Response + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> ErrorHandler for FnErrorHandler<F>
where
    F: Fn(&ProcedureError, &RouteArgs, &Request, &DispatchOptions) -> Response + Send + Sync,
{
    fn handle(
        &self,
        error: &ProcedureError,
        args: &RouteArgs,
        request: &Request,
        options: &DispatchOptions,
    ) -> Response {
        (self.0)(error, args, request, options)
    }
}

/// The four per-method overrides customizing a binding's pipeline. Each slot
/// defaults independently.
#[derive(Clone)]
pub struct MiddlewareBundle {
    pub arg_mapper: Arc<dyn ArgMapper>,
    pub result_mapper: Arc<dyn ResultMapper>,
    pub responder: Arc<dyn Responder>,
    pub error_handler: Arc<dyn ErrorHandler>,
}

impl Default for MiddlewareBundle {
    fn default() -> Self {
        Self {
            arg_mapper: Arc::new(IdentityArgMapper),
            result_mapper: Arc::new(IdentityResultMapper),
            responder: Arc::new(TraditionalResponder),
            error_handler: Arc::new(TraditionalErrorHandler),
        }
    }
}

impl MiddlewareBundle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_arg_mapper(mut self, mapper: impl ArgMapper + 'static) -> Self {
        self.arg_mapper = Arc::new(mapper);
        self
    }

    #[must_use]
    pub fn with_result_mapper(mut self, mapper: impl ResultMapper + 'static) -> Self {
        self.result_mapper = Arc::new(mapper);
        self
    }

    #[must_use]
    pub fn with_responder(mut self, responder: impl Responder + 'static) -> Self {
        self.responder = Arc::new(responder);
        self
    }

    #[must_use]
    pub fn with_error_handler(mut self, handler: impl ErrorHandler + 'static) -> Self {
        self.error_handler = Arc::new(handler);
        self
    }
}

/// The binding from a route+verb to a named procedure and its middleware
/// bundle. Built once at route-table construction.
#[derive(Clone)]
pub struct MethodBinding {
    procedure: String,
    bundle: MiddlewareBundle,
}

impl MethodBinding {
    /// Bind a procedure with the default bundle.
    #[must_use]
    pub fn new(procedure: &str) -> Self {
        Self {
            procedure: procedure.to_string(),
            bundle: MiddlewareBundle::default(),
        }
    }

    /// Replace the default bundle.
    #[must_use]
    pub fn with_bundle(mut self, bundle: MiddlewareBundle) -> Self {
        self.bundle = bundle;
        self
    }

    /// The bound procedure name.
    #[must_use]
    pub fn procedure(&self) -> &str {
        &self.procedure
    }

    /// The binding's middleware bundle.
    #[must_use]
    pub fn bundle(&self) -> &MiddlewareBundle {
        &self.bundle
    }
}

/// Run a binding's pipeline to completion, producing a response for both
/// success and failure paths.
///
/// Stage order: argument mapping, parameter validation, invocation, result
/// validation, result mapping, response construction. Failures are caught at
/// the stage boundary that owns their classification and converted to a
/// response immediately; nothing propagates past this function.
#[must_use]
pub fn dispatch(
    binding: &MethodBinding,
    registry: &dyn ProcedureRegistry,
    args: &RouteArgs,
    request: &Request,
    options: &DispatchOptions,
) -> Response {
    let bundle = binding.bundle();
    let procedure = binding.procedure();

    let mapped = bundle.arg_mapper.map(args, request, options);
    // Guard against a misconfigured mapper reaching invocation: arguments
    // must be a structured value.
    if !(mapped.is_object() || mapped.is_array()) {
        warn!(procedure = %procedure, "Argument mapper produced a non-structured value");
        return response::internal_server_error_empty();
    }

    let validated = match registry.validate_parameters(procedure, mapped) {
        Ok(v) => v,
        Err(err) => {
            debug!(procedure = %procedure, error = %err, "Parameter validation failed");
            return response::bad_request_from_error(&err, options.verbose);
        }
    };

    let raw = match registry.invoke(procedure, validated) {
        Ok(v) => v,
        Err(err) => {
            info!(procedure = %procedure, error = %err, "Procedure invocation failed");
            return bundle.error_handler.handle(&err, args, request, options);
        }
    };

    let clean = match registry.validate_result(procedure, raw) {
        Ok(v) => v,
        Err(err) => {
            // A result violating its own schema is a server-side defect, not
            // a caller error.
            warn!(procedure = %procedure, error = %err, "Result validation failed");
            return response::internal_server_error_from_error(&err, options.verbose);
        }
    };

    let mapped_result = bundle.result_mapper.map(clean);
    bundle.responder.respond(mapped_result, args, request, options)
}
