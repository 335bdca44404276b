//! # Response Module
//!
//! Pure constructors for the uniform [`Response`] value and the single
//! failure-serialization point. Every status code this core emits (200, 201,
//! 204, 400, 403, 404, 405, 500) has a named constructor here; code extending
//! the system must reuse them rather than inventing new statuses.

mod core;

pub use core::{
    bad_request, bad_request_from_error, created, forbidden, forbidden_from_error,
    internal_server_error, internal_server_error_empty, internal_server_error_from_error,
    method_not_allowed, no_content, not_found, ok, serialize_failure, Response,
};
