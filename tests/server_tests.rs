//! Orchestrator tests: the full request lifecycle and its early exits.

use http::Method;
use restgate::error::ProcedureError;
use restgate::pipeline::{FnArgMapper, MethodBinding, MiddlewareBundle};
use restgate::precheck::FnPrecheck;
use restgate::registry::InMemoryRegistry;
use restgate::response;
use restgate::router::{Route, Router};
use restgate::server::{Authenticator, Server};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

mod common;

/// The item store: only item 7 exists.
const EXISTING_ITEM: &str = "7";

fn items_registry(invocations: Arc<AtomicUsize>) -> InMemoryRegistry {
    let mut reg = InMemoryRegistry::new();

    let counter = invocations.clone();
    reg.register(
        "items_get",
        &json!({"type": "object", "required": ["id"]}),
        None,
        move |args| {
            counter.fetch_add(1, Ordering::SeqCst);
            if args["id"] == json!(EXISTING_ITEM) {
                Ok(json!({"id": 7, "name": "x"}))
            } else {
                Ok(Value::Null)
            }
        },
    )
    .unwrap();

    let counter = invocations;
    reg.register(
        "items_create",
        &json!({"type": "object", "required": ["name"]}),
        Some(&json!({"type": "object", "required": ["id", "name"]})),
        move |args| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(json!({"id": 7, "name": args["name"].clone()}))
        },
    )
    .unwrap();

    reg
}

fn items_router() -> Router {
    let body_mapper = FnArgMapper::new(|_args, req, _opts| {
        req.body.clone().unwrap_or_else(|| json!({}))
    });
    let id_mapper =
        FnArgMapper::new(|args, _req, _opts| json!({"id": args.first().cloned()}));

    Router::new(vec![
        Route::new("/items").unwrap().method(
            Method::POST,
            MethodBinding::new("items_create")
                .with_bundle(MiddlewareBundle::new().with_arg_mapper(body_mapper)),
        ),
        Route::new("/items/([0-9]+)")
            .unwrap()
            .with_precheck(FnPrecheck::new(|args| {
                if args.first().map(String::as_str) == Some(EXISTING_ITEM) {
                    None
                } else {
                    Some(response::not_found())
                }
            }))
            .method(
                Method::GET,
                MethodBinding::new("items_get")
                    .with_bundle(MiddlewareBundle::new().with_arg_mapper(id_mapper)),
            ),
        Route::new("/broken")
            .unwrap()
            .method(Method::GET, MethodBinding::new("")),
    ])
}

fn items_server() -> (Server, Arc<AtomicUsize>) {
    let invocations = Arc::new(AtomicUsize::new(0));
    let server = Server::new(
        items_router(),
        Arc::new(items_registry(invocations.clone())),
    );
    (server, invocations)
}

#[test]
fn test_no_route_is_not_found() {
    common::init_tracing();
    let (server, _) = items_server();
    let resp = server.handle(common::inputs("GET", "/nonexistent"));
    assert_eq!(resp.code, 404);
}

#[test]
fn test_uncovered_verb_is_method_not_allowed() {
    let (server, invocations) = items_server();
    let resp = server.handle(common::inputs("DELETE", "/items"));
    // 405, never 404 and never dispatch.
    assert_eq!(resp.code, 405);
    assert_eq!(invocations.load(Ordering::SeqCst), 0);
}

#[test]
fn test_precheck_failure_prevents_invocation() {
    let (server, invocations) = items_server();
    // Item 42 does not exist: the precheck answers before the procedure's
    // own null-handling ever gets a chance.
    let resp = server.handle(common::inputs("GET", "/items/42"));
    assert_eq!(resp.code, 404);
    assert_eq!(invocations.load(Ordering::SeqCst), 0);
}

#[test]
fn test_precheck_pass_dispatches() {
    let (server, invocations) = items_server();
    let resp = server.handle(common::inputs("GET", "/items/7"));
    assert_eq!(resp.code, 200);
    assert_eq!(resp.body, Some(json!({"id": 7, "name": "x"})));
    assert_eq!(invocations.load(Ordering::SeqCst), 1);
}

#[test]
fn test_create_item_end_to_end() {
    let (server, _) = items_server();
    let resp = server.handle(common::json_inputs("POST", "/items", &json!({"name": "x"})));
    assert_eq!(resp.code, 201);
    assert_eq!(resp.body, Some(json!({"id": 7, "name": "x"})));
}

#[test]
fn test_create_item_without_body_fails_validation() {
    let (server, invocations) = items_server();
    // No JSON body: the mapper yields an empty object, which violates the
    // parameter schema's "name" requirement.
    let resp = server.handle(common::inputs("POST", "/items"));
    assert_eq!(resp.code, 400);
    assert_eq!(invocations.load(Ordering::SeqCst), 0);
}

#[test]
fn test_unbound_method_is_empty_server_error() {
    let (server, _) = items_server();
    let resp = server.handle(common::inputs("GET", "/broken"));
    assert_eq!(resp.code, 500);
    assert!(resp.body.is_none());
}

/// Authenticator accepting a single token.
struct SingleToken(&'static str);

impl Authenticator for SingleToken {
    fn authenticate(&self, token: Option<&str>) -> Result<(), ProcedureError> {
        if token == Some(self.0) {
            Ok(())
        } else {
            Err(ProcedureError::application("invalid token").with_code("invalidtoken"))
        }
    }
}

#[test]
fn test_invalid_token_is_forbidden() {
    let (server, invocations) = items_server();
    let server = server.with_authenticator(Arc::new(SingleToken("s3cret")));

    let resp = server.handle(common::inputs("GET", "/items/7"));
    assert_eq!(resp.code, 403);
    assert_eq!(invocations.load(Ordering::SeqCst), 0);

    let mut t = common::inputs("GET", "/items/7");
    t.headers
        .push(("Authorization".to_string(), "Token s3cret".to_string()));
    let resp = server.handle(t);
    assert_eq!(resp.code, 200);
}

#[test]
fn test_routing_errors_win_over_authentication() {
    let (server, _) = items_server();
    let server = server.with_authenticator(Arc::new(SingleToken("s3cret")));
    // Routing is checked first: an unroutable path stays 404 even without
    // credentials.
    assert_eq!(server.handle(common::inputs("GET", "/nonexistent")).code, 404);
    assert_eq!(server.handle(common::inputs("DELETE", "/items")).code, 405);
}

/// Authenticator failing with an unclassified error.
struct Broken;

impl Authenticator for Broken {
    fn authenticate(&self, _token: Option<&str>) -> Result<(), ProcedureError> {
        Err(ProcedureError::unknown("auth backend down"))
    }
}

#[test]
fn test_other_auth_failures_are_server_errors() {
    let (server, _) = items_server();
    let server = server.with_authenticator(Arc::new(Broken));
    let resp = server.handle(common::inputs("GET", "/items/7"));
    assert_eq!(resp.code, 500);
    assert_eq!(
        resp.body.as_ref().unwrap()["message"],
        json!("auth backend down")
    );
}

#[test]
fn test_verbose_mode_serializes_detail() {
    let mut reg = InMemoryRegistry::new();
    reg.register("boom", &json!({}), None, |_| {
        Err(ProcedureError::unknown("kaput").with_trace("frame 0"))
    })
    .unwrap();
    let router = Router::new(vec![Route::new("/boom")
        .unwrap()
        .method(Method::GET, MethodBinding::new("boom"))]);

    let server = Server::new(router, Arc::new(reg)).with_verbose(true);
    let resp = server.handle(common::inputs("GET", "/boom"));
    assert_eq!(resp.code, 500);
    assert_eq!(resp.body.as_ref().unwrap()["trace"], json!("frame 0"));
}
