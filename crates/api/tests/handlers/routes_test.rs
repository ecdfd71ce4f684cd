use axum::http::{header, HeaderValue, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::test_utils::test_server;

#[tokio::test]
async fn test_health_check() {
    let server = test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_version() {
    let server = test_server();

    let response = server.get("/version").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["name"], "parish-api");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_profile_requires_sign_in() {
    let server = test_server();

    let response = server.get("/api/me").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<Value>()["error"],
        "Authentication error: Please sign in to continue"
    );
}

#[tokio::test]
async fn test_malformed_authorization_header() {
    let server = test_server();

    let response = server
        .get("/api/dashboard")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_static("Token abc123"),
        )
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_booking_requires_sign_in() {
    let server = test_server();

    let response = server
        .post("/api/masses/5f0c6a8e-4b7e-4c5e-9d57-2a1f0f3b9c11/intentions")
        .json(&json!({ "name": "Juan dela Cruz", "intention": "Thanksgiving" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_routes_require_sign_in() {
    let server = test_server();

    for path in [
        "/api/admin/intentions",
        "/api/admin/thanksgivings",
        "/api/admin/appointments",
        "/api/admin/parishioners",
        "/api/admin/payments/summary",
        "/api/superadmin/admins",
    ] {
        let response = server.get(path).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_create_mass_requires_sign_in() {
    let server = test_server();

    let response = server
        .post("/api/masses")
        .json(&json!({
            "title": "Sunday Mass",
            "scheduled_at": "2030-01-06T09:00:00Z",
            "intention_slots": 10,
            "thanksgiving_slots": 5
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_validates_before_touching_the_database() {
    let server = test_server();

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "name": "Maria Santos",
            "email": "maria@example.com",
            "password": "short"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "Validation error: Password must be at least 8 characters"
    );
}

#[tokio::test]
async fn test_malformed_json_body_is_a_json_error() {
    let server = test_server();

    let response = server
        .post("/api/auth/login")
        .content_type("application/json")
        .bytes("{ not json".into())
        .await;

    assert!(response.status_code().is_client_error());
    assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn test_unknown_livestream_filter() {
    let server = test_server();

    let response = server.get("/api/livestream").add_query_param("filter", "sideways").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "Validation error: Unknown livestream filter: sideways"
    );
}

#[tokio::test]
async fn test_slots_query_needs_a_valid_date() {
    let server = test_server();

    let response = server
        .get("/api/appointments/slots")
        .add_query_param("date", "next tuesday")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route() {
    let server = test_server();

    let response = server.get("/api/sacraments").await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_profile_update_requires_sign_in() {
    let server = test_server();

    let response = server
        .put("/api/me")
        .json(&json!({ "name": "Maria Santos", "phone": "+63 912 345 6789" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_church_details_edit_requires_sign_in() {
    let server = test_server();

    let response = server
        .put("/api/admin/church")
        .json(&json!({ "name": "St. Joseph Parish", "address": "1 Church Road" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}
