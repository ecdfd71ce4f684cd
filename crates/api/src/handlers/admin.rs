use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use parish_core::{
    errors::ParishError,
    models::user::{CreateAdminRequest, Role, UpdateAdminRequest, User},
    pagination::{Page, PageRequest, Paginated},
};
use parish_db::{models::convert_all, repositories::users};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    middleware::{
        auth::{self, AdminUser, SuperAdmin},
        error_handling::{ApiJson, ApiQuery, AppError},
    },
    ApiState,
};

/// Rows per page in the parishioner table.
pub const PARISHIONER_TABLE_LIMIT: u32 = 10;

const STAFF_ROLES: [Role; 2] = [Role::Admin, Role::Superadmin];

/// Admins may only block or unblock parishioners.
pub fn ensure_parishioner(user: &User) -> Result<(), ParishError> {
    if user.role != Role::Parishioner {
        return Err(ParishError::Authorization(
            "Only parishioner accounts can be blocked or unblocked".to_string(),
        ));
    }
    Ok(())
}

/// Superadmins manage admins, but not themselves or each other.
pub fn ensure_manageable_admin(user: &User) -> Result<(), ParishError> {
    match user.role {
        Role::Admin => Ok(()),
        Role::Superadmin => Err(ParishError::Authorization(
            "Superadmin accounts cannot be modified".to_string(),
        )),
        Role::Parishioner => Err(ParishError::NotFound(format!(
            "Admin with ID {} not found",
            user.id
        ))),
    }
}

async fn page_of_users(
    state: &ApiState,
    roles: &[Role],
    request: PageRequest,
) -> Result<Paginated<User>, AppError> {
    let page = Page::new(request, PARISHIONER_TABLE_LIMIT);

    let total = users::count_users_by_roles(&state.db_pool, roles)
        .await
        .map_err(ParishError::Database)?;
    let rows = users::list_users_by_roles(&state.db_pool, roles, page.offset(), page.limit())
        .await
        .map_err(ParishError::Database)?;

    Ok(Paginated::new(
        convert_all(rows)?,
        page,
        u64::try_from(total).unwrap_or(0),
    ))
}

async fn load_user(state: &ApiState, id: Uuid) -> Result<User, AppError> {
    let row = users::get_user_by_id(&state.db_pool, id)
        .await
        .map_err(ParishError::Database)?
        .ok_or_else(|| ParishError::NotFound(format!("User with ID {} not found", id)))?;

    Ok(User::try_from(row)?)
}

pub async fn list_parishioners(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    ApiQuery(query): ApiQuery<PageRequest>,
) -> Result<Json<Paginated<User>>, AppError> {
    Ok(Json(page_of_users(&state, &[Role::Parishioner], query).await?))
}

async fn set_blocked(
    state: &ApiState,
    admin: &User,
    id: Uuid,
    blocked: bool,
) -> Result<Json<User>, AppError> {
    let user = load_user(state, id).await?;
    ensure_parishioner(&user)?;

    let row = users::set_user_blocked(&state.db_pool, id, blocked)
        .await
        .map_err(ParishError::Database)?
        .ok_or_else(|| ParishError::NotFound(format!("User with ID {} not found", id)))?;

    // Blocked accounts lose every open session
    if blocked {
        users::delete_sessions_for_user(&state.db_pool, id)
            .await
            .map_err(ParishError::Database)?;
    }

    tracing::info!(
        "Parishioner {} {} by admin {}",
        id,
        if blocked { "blocked" } else { "unblocked" },
        admin.id
    );
    Ok(Json(User::try_from(row)?))
}

pub async fn block_parishioner(
    State(state): State<Arc<ApiState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    set_blocked(&state, &admin, id, true).await
}

pub async fn unblock_parishioner(
    State(state): State<Arc<ApiState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    set_blocked(&state, &admin, id, false).await
}

pub async fn list_admins(
    State(state): State<Arc<ApiState>>,
    _superadmin: SuperAdmin,
    ApiQuery(query): ApiQuery<PageRequest>,
) -> Result<Json<Paginated<User>>, AppError> {
    Ok(Json(page_of_users(&state, &STAFF_ROLES, query).await?))
}

pub async fn create_admin(
    State(state): State<Arc<ApiState>>,
    SuperAdmin(superadmin): SuperAdmin,
    ApiJson(payload): ApiJson<CreateAdminRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    payload.validate()?;

    let existing = users::get_user_by_email(&state.db_pool, &payload.email)
        .await
        .map_err(ParishError::Database)?;
    if existing.is_some() {
        return Err(AppError(users::email_taken()));
    }

    let password_hash = auth::hash_password(&payload.password)?;
    let row = users::create_user(
        &state.db_pool,
        &payload.name,
        &payload.email,
        payload.phone.as_deref().map(str::trim).filter(|p| !p.is_empty()),
        &password_hash,
        Role::Admin,
    )
    .await?;

    tracing::info!("Admin {} created by superadmin {}", row.id, superadmin.id);
    Ok((StatusCode::CREATED, Json(User::try_from(row)?)))
}

pub async fn update_admin(
    State(state): State<Arc<ApiState>>,
    _superadmin: SuperAdmin,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<UpdateAdminRequest>,
) -> Result<Json<User>, AppError> {
    payload.validate()?;

    let user = load_user(&state, id).await?;
    ensure_manageable_admin(&user)?;

    let row = users::update_user(
        &state.db_pool,
        id,
        payload.name.as_deref(),
        payload.phone.as_deref(),
        payload.role,
    )
    .await
    .map_err(ParishError::Database)?
    .ok_or_else(|| ParishError::NotFound(format!("User with ID {} not found", id)))?;

    if payload.role == Some(Role::Parishioner) {
        tracing::info!("Admin {} demoted to parishioner", id);
    }
    Ok(Json(User::try_from(row)?))
}
