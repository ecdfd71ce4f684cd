use axum::{
    body::to_bytes,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use parish_api::middleware::{
    auth::{self, bearer_token, ensure_active, SESSION_TOKEN_LENGTH},
    error_handling::AppError,
};
use parish_core::{errors::ParishError, models::user::Role};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::Value;

use crate::test_utils;

fn map_error(error: ParishError) -> Response {
    AppError(error).into_response()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[rstest]
#[case(ParishError::NotFound("Mass".into()), StatusCode::NOT_FOUND)]
#[case(ParishError::Validation("bad input".into()), StatusCode::BAD_REQUEST)]
#[case(ParishError::Authentication("sign in".into()), StatusCode::UNAUTHORIZED)]
#[case(ParishError::Authorization("admins only".into()), StatusCode::FORBIDDEN)]
#[case(ParishError::Conflict("Time slot already booked".into()), StatusCode::CONFLICT)]
#[case(ParishError::SlotUnavailable("no thanksgiving slots left".into()), StatusCode::CONFLICT)]
#[case(ParishError::Database(eyre::eyre!("connection reset")), StatusCode::INTERNAL_SERVER_ERROR)]
#[tokio::test]
async fn test_error_status_mapping(#[case] error: ParishError, #[case] expected: StatusCode) {
    let response = map_error(error);
    assert_eq!(response.status(), expected);
}

#[tokio::test]
async fn test_error_handling_internal() {
    let error = ParishError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "disk full",
    )));

    let response = map_error(error);
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_client_errors_carry_their_message() {
    let response = map_error(ParishError::SlotUnavailable(
        "no Mass intention slots left for this Mass".into(),
    ));

    let body = body_json(response).await;
    assert_eq!(
        body["error"],
        "No slots available: no Mass intention slots left for this Mass"
    );
}

#[tokio::test]
async fn test_server_errors_hide_details() {
    let response = map_error(ParishError::Database(eyre::eyre!(
        "password authentication failed for user postgres"
    )));

    let body = body_json(response).await;
    assert_eq!(body["error"], "Internal server error");
}

#[test]
fn test_hash_password() {
    let password = "correct horse battery";
    let hashed = auth::hash_password(password).unwrap();

    assert_ne!(hashed, password);
    assert!(hashed.starts_with("$argon2"));
}

#[test]
fn test_verify_password() {
    let hashed = auth::hash_password("correct horse battery").unwrap();

    assert!(auth::verify_password("correct horse battery", &hashed).unwrap());
    assert!(!auth::verify_password("wrong horse battery", &hashed).unwrap());
}

#[test]
fn test_hashes_are_salted() {
    let first = auth::hash_password("same password").unwrap();
    let second = auth::hash_password("same password").unwrap();
    assert_ne!(first, second);
}

#[test]
fn test_verify_rejects_garbage_hash() {
    assert!(auth::verify_password("anything", "not-a-phc-string").is_err());
}

#[test]
fn test_session_tokens_are_random() {
    let first = auth::generate_session_token();
    let second = auth::generate_session_token();

    assert_eq!(first.len(), SESSION_TOKEN_LENGTH);
    assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(first, second);
}

fn headers_with(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    headers
}

#[test]
fn test_bearer_token_is_extracted() {
    let headers = headers_with("Bearer abc123");
    assert_eq!(bearer_token(&headers).unwrap(), "abc123");

    let headers = headers_with("bearer   abc123  ");
    assert_eq!(bearer_token(&headers).unwrap(), "abc123");
}

#[rstest]
#[case("Basic dXNlcjpwYXNz")]
#[case("Bearer")]
#[case("Bearer    ")]
#[case("abc123")]
fn test_malformed_bearer_header(#[case] value: &str) {
    let headers = headers_with(value);
    assert!(matches!(
        bearer_token(&headers),
        Err(ParishError::Authentication(_))
    ));
}

#[test]
fn test_missing_bearer_header() {
    assert!(matches!(
        bearer_token(&HeaderMap::new()),
        Err(ParishError::Authentication(_))
    ));
}

#[test]
fn test_blocked_users_are_rejected() {
    let mut user = test_utils::user(Role::Parishioner);
    assert!(ensure_active(&user).is_ok());

    user.is_blocked = true;
    assert!(matches!(
        ensure_active(&user),
        Err(ParishError::Authorization(_))
    ));
}
