//! # Server Module
//!
//! The request orchestrator. Owns the linear request lifecycle and its early
//! termination points (no route, verb not covered, authentication failure,
//! precheck failure, unbound method), always ending in exactly one
//! [`crate::response::Response`].

mod core;

pub use core::{AllowAll, Authenticator, Server};
