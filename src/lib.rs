//! # restgate
//!
//! **restgate** is a transport-agnostic REST dispatch core: it exposes
//! pre-existing remote procedures (business functions with declared parameter
//! and return schemas) through conventional HTTP semantics — path patterns,
//! verbs, status codes, and JSON bodies.
//!
//! ## Overview
//!
//! The crate orchestrates routing, preconditions, a composable dispatch
//! pipeline, and response shaping. It deliberately does **not** implement
//! authentication, persistence, business logic, or HTTP I/O: those are
//! external collaborators reached through narrow traits.
//!
//! ## Architecture
//!
//! - **[`request`]** - Normalizes transport inputs into an immutable request
//!   value and extracts the `Authorization` token
//! - **[`router`]** - Ordered, regex-based route resolution with capture
//!   groups; first full-path match wins
//! - **[`precheck`]** - Per-route preconditions that can short-circuit a
//!   request before dispatch
//! - **[`pipeline`]** - The six-stage dispatch pipeline (argument mapping,
//!   parameter validation, invocation, result validation, result mapping,
//!   response construction) with per-stage error interception
//! - **[`registry`]** - The procedure-registry seam plus an in-memory
//!   implementation with startup-compiled JSON Schemas
//! - **[`response`]** - Uniform response values and failure serialization
//! - **[`server`]** - The orchestrator sequencing it all into one request
//!   lifecycle
//! - **[`error`]** - The classified error currency of the pipeline
//!
//! ## Request Flow
//!
//! 1. Host hands over [`request::TransportInputs`]
//! 2. Normalizer builds the immutable [`request::Request`]
//! 3. Router resolves the path to a route and captured arguments
//! 4. Authentication and precheck may terminate early
//! 5. The matched method's pipeline runs against the procedure registry
//! 6. Exactly one [`response::Response`] comes back, success or failure
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use http::Method;
//! use restgate::pipeline::MethodBinding;
//! use restgate::registry::InMemoryRegistry;
//! use restgate::router::{Route, Router};
//! use restgate::server::Server;
//!
//! let mut registry = InMemoryRegistry::new();
//! registry.register("items_get", &params_schema, Some(&result_schema), get_item)?;
//!
//! let router = Router::new(vec![Route::new("/items/([0-9]+)")?
//!     .method(Method::GET, MethodBinding::new("items_get"))]);
//!
//! let server = Server::new(router, Arc::new(registry));
//! let response = server.handle(inputs);
//! ```

pub mod error;
pub mod pipeline;
pub mod precheck;
pub mod registry;
pub mod request;
pub mod response;
pub mod router;
pub mod server;

pub use error::{ErrorKind, ProcedureError};
pub use pipeline::{DispatchOptions, MethodBinding, MiddlewareBundle};
pub use request::{Request, TransportInputs};
pub use response::Response;
pub use router::{Route, RouteArgs, Router};
pub use server::Server;
