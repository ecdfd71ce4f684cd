//! # Authentication Module
//!
//! Password hashing, session tokens and the extractors that gate routes by
//! role.
//!
//! Clients authenticate with `Authorization: Bearer <token>`, where the token
//! was issued by login or registration. Handlers declare the access they need
//! by taking one of [`CurrentUser`], [`AdminUser`] or [`SuperAdmin`] as an
//! argument.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use eyre::Result;
use parish_core::{
    errors::{ParishError, ParishResult},
    models::user::User,
};
use rand::{distributions::Alphanumeric, Rng};

use crate::{middleware::error_handling::AppError, ApiState};

pub const SESSION_TOKEN_LENGTH: usize = 48;

/// Hashes a password using the Argon2 algorithm
///
/// A fresh random salt is generated for every call and the result is
/// returned in PHC string format.
///
/// # Example
///
/// ```rust
/// let hashed = parish_api::middleware::auth::hash_password("correct horse").unwrap();
/// assert!(hashed.starts_with("$argon2"));
/// ```
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Checks a plain text password against a stored PHC hash.
///
/// A mismatch is `Ok(false)`; an unparseable hash is an error.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| eyre::eyre!("Stored password hash is invalid: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// A random alphanumeric session token.
pub fn generate_session_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> ParishResult<&str> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ParishError::Authentication("Please sign in to continue".to_string()))?
        .to_str()
        .map_err(|_| ParishError::Authentication("Malformed authorization header".to_string()))?;

    match value.split_once(' ') {
        Some((scheme, token))
            if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() =>
        {
            Ok(token.trim())
        }
        _ => Err(ParishError::Authentication(
            "Malformed authorization header".to_string(),
        )),
    }
}

/// Rejects blocked accounts.
pub fn ensure_active(user: &User) -> ParishResult<()> {
    if user.is_blocked {
        return Err(ParishError::Authorization(
            "Your account has been blocked".to_string(),
        ));
    }
    Ok(())
}

/// Any signed-in, non-blocked user.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

#[axum::async_trait]
impl FromRequestParts<Arc<ApiState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?.to_string();

        let row = parish_db::repositories::users::get_user_by_session(&state.db_pool, &token)
            .await
            .map_err(ParishError::Database)?
            .ok_or_else(|| {
                ParishError::Authentication("Your session has expired, please sign in".to_string())
            })?;
        let user = User::try_from(row).map_err(ParishError::Database)?;
        ensure_active(&user)?;

        Ok(CurrentUser { user, token })
    }
}

/// An admin or superadmin.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

#[axum::async_trait]
impl FromRequestParts<Arc<ApiState>> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser { user, .. } = CurrentUser::from_request_parts(parts, state).await?;
        if !user.role.is_admin() {
            return Err(AppError(ParishError::Authorization(
                "Admin access required".to_string(),
            )));
        }
        Ok(AdminUser(user))
    }
}

/// A superadmin.
#[derive(Debug, Clone)]
pub struct SuperAdmin(pub User);

#[axum::async_trait]
impl FromRequestParts<Arc<ApiState>> for SuperAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser { user, .. } = CurrentUser::from_request_parts(parts, state).await?;
        if !user.role.is_superadmin() {
            return Err(AppError(ParishError::Authorization(
                "Superadmin access required".to_string(),
            )));
        }
        Ok(SuperAdmin(user))
    }
}
