//! # Request Module
//!
//! Normalizes transport-level inputs into the immutable [`Request`] value
//! consumed by the router and the dispatch pipeline. Also owns credential
//! token extraction from the `Authorization` header; verifying the token is
//! left to the [`crate::server::Authenticator`] collaborator.

mod core;

pub use core::{
    extract_token, normalize, parse_query, Request, TransportInputs, PATH_FALLBACK_PARAM,
};
