//! # Pipeline Module
//!
//! The dispatch core's centerpiece: a six-stage pipeline run per matched
//! method, assembled from a [`MethodBinding`] (procedure name plus
//! [`MiddlewareBundle`]).
//!
//! Stage order: argument mapping → parameter validation → invocation → result
//! validation → result mapping → response construction. Each validation or
//! invocation boundary intercepts its own failures:
//!
//! - parameter validation failures are client-attributable and become 400
//! - invocation failures go through the bundle's [`ErrorHandler`]
//! - result validation failures are server-attributable and become 500
//!
//! The four bundle slots are strategy traits rather than ad-hoc closures, so
//! each stage is inspectable and testable in isolation; `Fn*` adapters keep
//! declarative route tables terse.

mod core;

pub use core::{
    dispatch, traditional_error_response, ArgMapper, DispatchOptions, ErrorHandler, FnArgMapper,
    FnErrorHandler, FnResponder, FnResultMapper, IdentityArgMapper, IdentityResultMapper,
    MethodBinding, MiddlewareBundle, Responder, ResultMapper, TraditionalErrorHandler,
    TraditionalResponder,
};
