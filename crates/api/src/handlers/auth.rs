use axum::{extract::State, http::StatusCode, Json};
use parish_core::{
    errors::ParishError,
    models::user::{LoginRequest, LoginResponse, RegisterRequest, Role, UpdateProfileRequest, User},
};
use parish_db::repositories::users;
use std::sync::Arc;

use crate::{
    middleware::{
        auth::{self, ensure_active, CurrentUser},
        error_handling::{ApiJson, AppError},
    },
    ApiState,
};

/// The role a new registration receives. Only the configured superadmin
/// address is promoted.
pub fn registration_role(email: &str, superadmin_email: Option<&str>) -> Role {
    match superadmin_email {
        Some(configured) if configured.eq_ignore_ascii_case(email.trim()) => Role::Superadmin,
        _ => Role::Parishioner,
    }
}

async fn open_session(state: &ApiState, user: User) -> Result<LoginResponse, AppError> {
    let token = auth::generate_session_token();
    users::create_session(&state.db_pool, &token, user.id)
        .await
        .map_err(ParishError::Database)?;

    Ok(LoginResponse { token, user })
}

pub async fn register(
    State(state): State<Arc<ApiState>>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), AppError> {
    payload.validate()?;

    let existing = users::get_user_by_email(&state.db_pool, &payload.email)
        .await
        .map_err(ParishError::Database)?;
    if existing.is_some() {
        return Err(AppError(users::email_taken()));
    }

    let role = registration_role(&payload.email, state.superadmin_email.as_deref());
    let password_hash = auth::hash_password(&payload.password)?;

    let row = users::create_user(
        &state.db_pool,
        &payload.name,
        &payload.email,
        payload.phone.as_deref().map(str::trim).filter(|p| !p.is_empty()),
        &password_hash,
        role,
    )
    .await?;
    let user = User::try_from(row)?;

    tracing::info!("Registered user {} with role {}", user.id, user.role);

    let response = open_session(&state, user).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(state): State<Arc<ApiState>>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let invalid = || ParishError::Authentication("Invalid email or password".to_string());

    let row = users::get_user_by_email(&state.db_pool, &payload.email)
        .await
        .map_err(ParishError::Database)?
        .ok_or_else(invalid)?;

    if !auth::verify_password(&payload.password, &row.password_hash)? {
        return Err(AppError(invalid()));
    }

    let user = User::try_from(row)?;
    ensure_active(&user)?;

    Ok(Json(open_session(&state, user).await?))
}

pub async fn logout(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
) -> Result<StatusCode, AppError> {
    users::delete_session(&state.db_pool, &current.token)
        .await
        .map_err(ParishError::Database)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me(current: CurrentUser) -> Json<User> {
    Json(current.user)
}

pub async fn update_me(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    ApiJson(payload): ApiJson<UpdateProfileRequest>,
) -> Result<Json<User>, AppError> {
    payload.validate()?;
    let user_id = current.user.id;

    let row = users::update_user_profile(&state.db_pool, user_id, &payload)
        .await
        .map_err(ParishError::Database)?
        .ok_or_else(|| ParishError::NotFound(format!("User with ID {} not found", user_id)))?;

    Ok(Json(User::try_from(row)?))
}
