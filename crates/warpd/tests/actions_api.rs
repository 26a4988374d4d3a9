//! Action API regression tests.
//!
//! Drives the full router with `oneshot` requests: create, read, list,
//! delete, and invoke through a local action host standing in for the
//! gateway.

use std::sync::Arc;

use axum::body::{Body, Bytes, to_bytes};
use axum::http::{HeaderMap, Request, Response, StatusCode};
use axum::routing::post;
use serde_json::{Value, json};
use tower::ServiceExt;
use warpgrid_actions::Gateway;
use warpgrid_api::build_router;
use warpgrid_serving::{ServingPlatform, ServingStore};

fn test_store() -> Arc<ServingStore> {
    Arc::new(ServingStore::open_in_memory().unwrap())
}

fn unreachable_gateway() -> Gateway {
    Gateway::parse("127.0.0.1:1").unwrap()
}

async fn body_json(resp: Response<Body>) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn put_request(namespace: &str, action: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(format!("/api/v1/namespaces/{namespace}/actions/{action}"))
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn hello_action() -> Value {
    json!({
        "version": "0.0.1",
        "exec": {
            "kind": "nodejs:8",
            "code": "function main(params) { return {greeting: 'hello ' + params.name}; }"
        }
    })
}

#[tokio::test]
async fn api_list_actions_empty() {
    let router = build_router(test_store(), unreachable_gateway());

    let resp = router
        .oneshot(get_request("/api/v1/namespaces/_/actions"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!([]));
}

#[tokio::test]
async fn api_create_and_get_action() {
    let store = test_store();
    let router = build_router(store.clone(), unreachable_gateway());

    let resp = router
        .clone()
        .oneshot(put_request("_", "Hello%20World", hello_action()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let created = body_json(resp).await;
    assert_eq!(created["name"], "Hello World");
    assert_eq!(created["namespace"], "default");
    assert_eq!(created["exec"]["image"], "openwhisk/action-nodejs-v8");

    // Any spelling that normalizes to the same name finds it.
    let resp = router
        .clone()
        .oneshot(get_request("/api/v1/namespaces/default/actions/hello-world"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, created);

    // Both platform resources exist.
    assert!(store.get_configuration("default", "hello-world").is_ok());
    assert!(store.get_route("default", "hello-world").is_ok());

    let resp = router
        .oneshot(get_request("/api/v1/namespaces/_/actions"))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await, json!([created]));
}

#[tokio::test]
async fn api_create_twice_is_internal_error() {
    let router = build_router(test_store(), unreachable_gateway());

    let resp = router
        .clone()
        .oneshot(put_request("_", "hello", hello_action()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = router
        .oneshot(put_request("_", "hello", hello_action()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn api_put_malformed_body_is_internal_error() {
    let router = build_router(test_store(), unreachable_gateway());

    let malformed = Request::builder()
        .method("PUT")
        .uri("/api/v1/namespaces/_/actions/hello")
        .header("content-type", "application/json")
        .body(Body::from("{nope"))
        .unwrap();
    let empty = Request::builder()
        .method("PUT")
        .uri("/api/v1/namespaces/_/actions/hello")
        .header("content-type", "application/json")
        .body(Body::empty())
        .unwrap();
    let wrong_shape = put_request("_", "hello", json!({ "version": 1 }));

    for req in [malformed, empty, wrong_shape] {
        let resp = router.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert!(body["error"].as_str().unwrap().starts_with("invalid action body"));
    }

    let resp = router
        .oneshot(get_request("/api/v1/namespaces/_/actions/hello"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_put_without_content_type_is_accepted() {
    let router = build_router(test_store(), unreachable_gateway());

    let req = Request::builder()
        .method("PUT")
        .uri("/api/v1/namespaces/_/actions/hello")
        .body(Body::from(serde_json::to_vec(&hello_action()).unwrap()))
        .unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["name"], "hello");

    let req = Request::builder()
        .method("PUT")
        .uri("/api/v1/namespaces/_/actions/other")
        .body(Body::from("not json"))
        .unwrap();
    let resp = router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_json(resp).await["error"].is_string());
}

#[tokio::test]
async fn api_delete_then_get_is_not_found() {
    let router = build_router(test_store(), unreachable_gateway());

    router
        .clone()
        .oneshot(put_request("_", "hello", hello_action()))
        .await
        .unwrap();

    let req = Request::builder()
        .method("DELETE")
        .uri("/api/v1/namespaces/_/actions/hello")
        .body(Body::empty())
        .unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = router
        .oneshot(get_request("/api/v1/namespaces/_/actions/hello"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn api_invoke_missing_action_is_not_found() {
    let router = build_router(test_store(), unreachable_gateway());

    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/namespaces/_/actions/ghost")
        .body(Body::empty())
        .unwrap();
    let resp = router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ── Invocation through a local action host ─────────────────────

/// Answers 403 on init (already initialized) and echoes a greeting on run,
/// but only for the expected route domain.
async fn spawn_action_host() -> Gateway {
    async fn init() -> StatusCode {
        StatusCode::FORBIDDEN
    }

    async fn run(headers: HeaderMap, body: Bytes) -> (StatusCode, String) {
        let host = headers
            .get("host")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if host != "hello.default.example.com" {
            return (StatusCode::NOT_FOUND, format!("unknown host {host}"));
        }
        let message: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        let name = message["value"]["name"].as_str().unwrap_or("stranger");
        (StatusCode::OK, json!({ "greeting": format!("hello {name}") }).to_string())
    }

    let app = axum::Router::new()
        .route("/init", post(init))
        .route("/run", post(run));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Gateway::parse(&addr.to_string()).unwrap()
}

#[tokio::test]
async fn api_invoke_returns_activation() {
    let gateway = spawn_action_host().await;
    let router = build_router(test_store(), gateway);

    router
        .clone()
        .oneshot(put_request("_", "Hello", hello_action()))
        .await
        .unwrap();

    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/namespaces/_/actions/hello")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"name":"warpgrid"}"#))
        .unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let activation = body_json(resp).await;
    assert_eq!(activation["activationId"], "dummyactivationid");
    assert_eq!(activation["name"], "hello");
    assert_eq!(activation["namespace"], "default");
    assert_eq!(activation["response"]["success"], true);
    assert_eq!(activation["response"]["result"], json!({ "greeting": "hello warpgrid" }));
    assert_eq!(activation["logs"], json!([]));

    // No body means empty parameters.
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/namespaces/default/actions/HELLO")
        .body(Body::empty())
        .unwrap();
    let resp = router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let activation = body_json(resp).await;
    assert_eq!(activation["response"]["result"]["greeting"], "hello stranger");
}

#[tokio::test]
async fn api_invoke_run_failure_is_internal() {
    let gateway = spawn_action_host().await;
    // Registered under a different domain suffix, so the host rejects /run.
    let other = Arc::new(
        ServingStore::open_in_memory()
            .unwrap()
            .with_domain_suffix("elsewhere.test"),
    );
    let router = build_router(other, gateway);

    router
        .clone()
        .oneshot(put_request("_", "hello", hello_action()))
        .await
        .unwrap();

    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/namespaces/_/actions/hello")
        .body(Body::empty())
        .unwrap();
    let resp = router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(resp).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("Error invoking action. Status: 404"));
    assert!(message.contains("unknown host hello.default.elsewhere.test"));
}
