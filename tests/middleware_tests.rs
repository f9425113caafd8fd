//! Middleware chain tests

use axum::{
    body::Body,
    http::{header, HeaderValue, Request, StatusCode},
    routing::get,
    Router,
};
use hellostack::config::{Middleware, Settings};
use hellostack::handlers::create_router_with_backends;
use hellostack::middleware::{apply_chain, logging::REQUEST_ID_HEADER, HostPolicy};
use tower::ServiceExt;

fn default_settings() -> Settings {
    Settings::from_lookup(|_| None).expect("Failed to create test settings")
}

fn app_with_chain(settings: &Settings) -> Router {
    let router = Router::new().route("/", get(|| async { "ok" }));
    apply_chain(router, settings)
}

fn get_request(host: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/");
    if let Some(host) = host {
        builder = builder.header(header::HOST, host);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_security_headers_present() {
    let response = app_with_chain(&default_settings())
        .oneshot(get_request(None))
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(headers[header::REFERRER_POLICY], "same-origin");
    assert_eq!(headers["cross-origin-opener-policy"], "same-origin");
    assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let request = Request::builder()
        .uri("/")
        .header(header::ORIGIN, "http://frontend.example")
        .body(Body::empty())
        .unwrap();

    let response = app_with_chain(&default_settings()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_cors_preflight() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/")
        .header(header::ORIGIN, "http://frontend.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap();

    let response = app_with_chain(&default_settings()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_allowed_host_accepted() {
    let response = app_with_chain(&default_settings())
        .oneshot(get_request(Some("localhost:8000")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_disallowed_host_rejected() {
    let response = app_with_chain(&default_settings())
        .oneshot(get_request(Some("evil.example")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"]["type"], "disallowed_host");
}

#[tokio::test]
async fn test_non_utf8_host_rejected() {
    let request = Request::builder()
        .uri("/")
        .header(header::HOST, HeaderValue::from_bytes(b"evil\xff.example").unwrap())
        .body(Body::empty())
        .unwrap();

    let response = app_with_chain(&default_settings()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"]["type"], "disallowed_host");
}

#[tokio::test]
async fn test_non_utf8_host_rejected_even_with_wildcard() {
    let mut settings = default_settings();
    settings.security.allowed_hosts = vec!["*".to_string()];

    let request = Request::builder()
        .uri("/")
        .header(header::HOST, HeaderValue::from_bytes(b"evil\xff.example").unwrap())
        .body(Body::empty())
        .unwrap();

    let response = app_with_chain(&settings).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chain_without_common_skips_host_check() {
    let mut settings = default_settings();
    settings.framework.middleware.retain(|m| *m != Middleware::Common);

    let response = app_with_chain(&settings)
        .oneshot(get_request(Some("evil.example")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_chain_without_clickjacking_omits_frame_header() {
    let mut settings = default_settings();
    settings.framework.middleware.retain(|m| *m != Middleware::Clickjacking);

    let response = app_with_chain(&settings).oneshot(get_request(None)).await.unwrap();

    assert!(response.headers().get(header::X_FRAME_OPTIONS).is_none());
    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
}

#[tokio::test]
async fn test_cors_disabled_sends_no_allow_origin() {
    let mut settings = default_settings();
    settings.security.cors_allow_all_origins = false;

    let request = Request::builder()
        .uri("/")
        .header(header::ORIGIN, "http://frontend.example")
        .body(Body::empty())
        .unwrap();
    let response = app_with_chain(&settings).oneshot(request).await.unwrap();

    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn test_request_id_header() {
    let app = create_router_with_backends(default_settings(), Vec::new());
    let response = app.oneshot(get_request(None)).await.unwrap();

    let request_id = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(request_id).is_ok());
}

#[test]
fn test_host_policy_from_settings() {
    let policy = HostPolicy::from_settings(&default_settings());
    assert_eq!(policy.patterns().to_vec(), vec!["localhost".to_string()]);
}
