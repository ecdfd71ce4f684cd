use crate::{db_error, is_unique_violation, models::DbUser};
use chrono::Utc;
use eyre::Result;
use parish_core::{
    errors::{ParishError, ParishResult},
    models::user::{Role, UpdateProfileRequest},
};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, name, email, phone, password_hash, role, is_blocked, created_at";

pub fn email_taken() -> ParishError {
    ParishError::Conflict("An account with this email already exists".to_string())
}

/// Maps a failed user insert. The unique index on `email` turns a
/// concurrent registration of the same address into a conflict.
pub fn user_insert_error(err: sqlx::Error) -> ParishError {
    if is_unique_violation(&err) {
        email_taken()
    } else {
        db_error(err)
    }
}

// User Repository

pub async fn create_user(
    pool: &Pool<Postgres>,
    name: &str,
    email: &str,
    phone: Option<&str>,
    password_hash: &str,
    role: Role,
) -> ParishResult<DbUser> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating user: id={}, role={}", id, role);

    let user = sqlx::query_as::<_, DbUser>(&format!(
        r#"
        INSERT INTO users (id, name, email, phone, password_hash, role, is_blocked, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(name.trim())
    .bind(email.trim().to_lowercase())
    .bind(phone)
    .bind(password_hash)
    .bind(role.as_str())
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(user_insert_error)?;

    Ok(user)
}

pub async fn get_user_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_email(pool: &Pool<Postgres>, email: &str) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(email.trim().to_lowercase())
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Users holding any of `roles`, oldest first.
pub async fn list_users_by_roles(
    pool: &Pool<Postgres>,
    roles: &[Role],
    offset: i64,
    limit: i64,
) -> Result<Vec<DbUser>> {
    let roles: Vec<&str> = roles.iter().map(Role::as_str).collect();

    let users = sqlx::query_as::<_, DbUser>(&format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users
        WHERE role = ANY($1)
        ORDER BY created_at ASC
        OFFSET $2
        LIMIT $3
        "#
    ))
    .bind(roles)
    .bind(offset)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(users)
}

pub async fn count_users_by_roles(pool: &Pool<Postgres>, roles: &[Role]) -> Result<i64> {
    let roles: Vec<&str> = roles.iter().map(Role::as_str).collect();

    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = ANY($1)")
        .bind(roles)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

pub async fn set_user_blocked(
    pool: &Pool<Postgres>,
    id: Uuid,
    blocked: bool,
) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(&format!(
        r#"
        UPDATE users
        SET is_blocked = $2
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(blocked)
    .fetch_optional(pool)
    .await?;

    if blocked {
        // A blocked user loses every open session immediately.
        delete_sessions_for_user(pool, id).await?;
    }

    Ok(user)
}

pub async fn update_user(
    pool: &Pool<Postgres>,
    id: Uuid,
    name: Option<&str>,
    phone: Option<&str>,
    role: Option<Role>,
) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(&format!(
        r#"
        UPDATE users
        SET name = COALESCE($2, name),
            phone = COALESCE($3, phone),
            role = COALESCE($4, role)
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(name.map(str::trim))
    .bind(phone)
    .bind(role.map(|r| r.as_str()))
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Updates the name and phone of a user's own profile. Missing fields keep
/// their stored value and a blank phone clears it.
pub async fn update_user_profile(
    pool: &Pool<Postgres>,
    id: Uuid,
    request: &UpdateProfileRequest,
) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(&format!(
        r#"
        UPDATE users
        SET name = COALESCE($2, name),
            phone = CASE WHEN $3::TEXT IS NULL THEN phone ELSE NULLIF($3, '') END
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(request.name.as_deref().map(str::trim))
    .bind(request.phone.as_deref().map(str::trim))
    .fetch_optional(pool)
    .await?;

    if let Some(user) = &user {
        tracing::info!("Profile of user {} updated", user.id);
    }
    Ok(user)
}

// Session Repository

pub async fn create_session(pool: &Pool<Postgres>, token: &str, user_id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO sessions (token, user_id, created_at)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(token)
    .bind(user_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_user_by_session(pool: &Pool<Postgres>, token: &str) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT u.id, u.name, u.email, u.phone, u.password_hash, u.role, u.is_blocked, u.created_at
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.token = $1
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn delete_session(pool: &Pool<Postgres>, token: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn delete_sessions_for_user(pool: &Pool<Postgres>, user_id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}
