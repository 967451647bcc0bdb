//! Authentication and role-based access control tests.
//!
//! All requests here are rejected by the extractors before any database
//! access, so no live Postgres is needed.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};

use common::{assert_status, build_test_app, send, test_token};
use cyclebook_core::roles::{ROLE_HOST, ROLE_USER};

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

// ---------------------------------------------------------------------------
// Missing / malformed credentials
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_token_returns_401() {
    let app = build_test_app();
    let response = send(app, get("/api/v1/bookings", None)).await;

    let json = assert_status(response, StatusCode::UNAUTHORIZED).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn malformed_authorization_header_returns_401() {
    let app = build_test_app();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1/bookings")
        .header(header::AUTHORIZATION, "Token abc123")
        .body(Body::empty())
        .unwrap();

    let response = send(app, request).await;
    let json = assert_status(response, StatusCode::UNAUTHORIZED).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn garbage_token_returns_401() {
    let app = build_test_app();
    let response = send(app, get("/api/v1/bookings", Some("not-a-jwt"))).await;

    let json = assert_status(response, StatusCode::UNAUTHORIZED).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

// ---------------------------------------------------------------------------
// Role mismatches: each endpoint rejects the opposite role with 403
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rider_cannot_list_bookings() {
    let app = build_test_app();
    let token = test_token(1, ROLE_USER);
    let response = send(app, get("/api/v1/bookings", Some(&token))).await;

    let json = assert_status(response, StatusCode::FORBIDDEN).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn rider_cannot_start_ride() {
    let app = build_test_app();
    let token = test_token(1, ROLE_USER);
    let body = serde_json::json!({"booking_id": 1, "unique_code": "ABC123"});
    let response = send(app, post_json("/api/v1/start-ride", Some(&token), body)).await;

    assert_status(response, StatusCode::FORBIDDEN).await;
}

#[tokio::test]
async fn rider_cannot_stop_ride() {
    let app = build_test_app();
    let token = test_token(1, ROLE_USER);
    let body = serde_json::json!({"booking_id": 1, "drop_location": "Central Station"});
    let response = send(app, post_json("/api/v1/stop-ride", Some(&token), body)).await;

    assert_status(response, StatusCode::FORBIDDEN).await;
}

#[tokio::test]
async fn host_cannot_book() {
    let app = build_test_app();
    let token = test_token(2, ROLE_HOST);
    let body = serde_json::json!({"place": "Central Station", "cycle": "CYC-7"});
    let response = send(app, post_json("/api/v1/book", Some(&token), body)).await;

    let json = assert_status(response, StatusCode::FORBIDDEN).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn host_cannot_view_ride_history() {
    let app = build_test_app();
    let token = test_token(2, ROLE_HOST);
    let response = send(app, get("/api/v1/ride-history", Some(&token))).await;

    assert_status(response, StatusCode::FORBIDDEN).await;
}

// ---------------------------------------------------------------------------
// Wire contract for /book
// ---------------------------------------------------------------------------

#[tokio::test]
async fn book_accepts_place_and_cycle_fields() {
    let app = build_test_app();
    let token = test_token(1, ROLE_USER);
    let body = serde_json::json!({"place": "Central Station", "cycle": "CYC-7"});
    let response = send(app, post_json("/api/v1/book", Some(&token), body)).await;

    // The body deserializes and the handler reaches storage, which is
    // unreachable in tests. A field-name mismatch would surface as 422
    // before any storage access.
    assert_ne!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = assert_status(response, StatusCode::INTERNAL_SERVER_ERROR).await;
    assert_eq!(json["code"], "INTERNAL_ERROR");
}

#[tokio::test]
async fn book_rejects_body_without_cycle_field() {
    let app = build_test_app();
    let token = test_token(1, ROLE_USER);
    let body = serde_json::json!({"place": "Central Station", "cycle_id": "CYC-7"});
    let response = send(app, post_json("/api/v1/book", Some(&token), body)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// ---------------------------------------------------------------------------
// Registration validation (rejected before the database)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_rejects_short_password() {
    let app = build_test_app();
    let body = serde_json::json!({
        "email": "rider@example.com",
        "password": "short",
        "role": "user",
    });
    let response = send(app, post_json("/api/v1/register", None, body)).await;

    let json = assert_status(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn register_rejects_unknown_role() {
    let app = build_test_app();
    let body = serde_json::json!({
        "email": "rider@example.com",
        "password": "long-enough-password",
        "role": "admin",
    });
    let response = send(app, post_json("/api/v1/register", None, body)).await;

    assert_status(response, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn register_rejects_invalid_email() {
    let app = build_test_app();
    let body = serde_json::json!({
        "email": "not-an-email",
        "password": "long-enough-password",
        "role": "user",
    });
    let response = send(app, post_json("/api/v1/register", None, body)).await;

    assert_status(response, StatusCode::BAD_REQUEST).await;
}
