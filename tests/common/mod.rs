//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use http::Method;
use restgate::request::{Request, TransportInputs};
use restgate::router::RouteArgs;
use serde_json::Value;
use std::collections::HashMap;

/// Initialize test logging once; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Transport inputs for a path-info style call, e.g. `GET /index.php/items/7`.
pub fn inputs(method: &str, path: &str) -> TransportInputs {
    TransportInputs {
        method: method.to_string(),
        request_uri: Some(format!("/index.php{path}")),
        path_info: Some(path.to_string()),
        script_name: Some("/index.php".to_string()),
        ..Default::default()
    }
}

/// Same as [`inputs`] but carrying a JSON body.
pub fn json_inputs(method: &str, path: &str, body: &Value) -> TransportInputs {
    let mut t = inputs(method, path);
    t.headers
        .push(("Content-Type".to_string(), "application/json".to_string()));
    t.body = body.to_string();
    t
}

/// A bare normalized request for exercising pipeline stages directly.
pub fn request(verb: Method, path: &str) -> Request {
    Request {
        verb,
        path: path.to_string(),
        raw_body: String::new(),
        body: None,
        query: HashMap::new(),
        headers: Vec::new(),
    }
}

/// Captured route arguments from string literals.
pub fn route_args<const N: usize>(vals: [&str; N]) -> RouteArgs {
    vals.iter().map(|v| (*v).to_string()).collect()
}
