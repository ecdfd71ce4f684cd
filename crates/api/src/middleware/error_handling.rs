//! # Error Handling Middleware
//!
//! This module maps domain errors to HTTP status codes and JSON error
//! bodies of the form `{"error": "<message>"}`, so every handler reports
//! failures the same way.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use parish_core::errors::ParishError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps domain-specific `ParishError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
///
/// # Example
///
/// ```
/// use axum::Json;
/// use parish_api::middleware::error_handling::AppError;
/// use parish_core::errors::ParishError;
///
/// async fn handler(found: bool) -> Result<Json<&'static str>, AppError> {
///     if !found {
///         return Err(AppError(ParishError::NotFound("Mass".to_string())));
///     }
///     Ok(Json("ok"))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub ParishError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ParishError::NotFound(_) => StatusCode::NOT_FOUND,
            ParishError::Validation(_) => StatusCode::BAD_REQUEST,
            ParishError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ParishError::Authorization(_) => StatusCode::FORBIDDEN,
            ParishError::Conflict(_) => StatusCode::CONFLICT,
            ParishError::SlotUnavailable(_) => StatusCode::CONFLICT,
            ParishError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ParishError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Converts application errors to HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Server-side failures are logged in full but reported generically
        let message = if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self.0);
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Allows `?` on functions returning `Result<T, ParishError>`.
impl From<ParishError> for AppError {
    fn from(err: ParishError) -> Self {
        AppError(err)
    }
}

/// Allows `?` on repository functions returning `eyre::Result`. The report
/// is wrapped in `ParishError::Database`.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(ParishError::Database(err))
    }
}

/// Malformed JSON bodies are validation errors.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(ParishError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError(ParishError::Validation(rejection.body_text()))
    }
}

/// `Json` body extractor whose rejection is an [`AppError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `Query` extractor whose rejection is an [`AppError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
