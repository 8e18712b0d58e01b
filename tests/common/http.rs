//! HTTP request helpers
//!
//! Drive the router in-process with `tower::ServiceExt::oneshot`.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use super::auth_helpers::bearer;

/// Send a request and decode the JSON body (`Null` when empty).
pub async fn call(
    router: Router,
    method: Method,
    uri: &str,
    user_id: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = user_id {
        builder = builder.header(header::AUTHORIZATION, bearer(user_id));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("valid request");

    let response = router.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, json)
}

pub async fn get(router: Router, uri: &str, user_id: &str) -> (StatusCode, serde_json::Value) {
    call(router, Method::GET, uri, Some(user_id), None).await
}

pub async fn post(
    router: Router,
    uri: &str,
    user_id: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    call(router, Method::POST, uri, Some(user_id), Some(body)).await
}
