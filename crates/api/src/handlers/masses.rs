use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Duration, Utc};
use parish_core::{
    errors::ParishError,
    live::LIVE_WINDOW_MINUTES,
    livestream::validate_youtube_url,
    models::mass::{CreateMassRequest, LivestreamRequest, Mass, MassResponse, UpdateMassRequest},
    slots::MassAvailability,
};
use parish_db::{models::DbMassWithCounts, repositories::masses};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    handlers::church::load_church_info,
    middleware::{
        auth::AdminUser,
        error_handling::{ApiJson, ApiQuery, AppError},
    },
    ApiState,
};

#[derive(Debug, Default, Deserialize)]
pub struct MassListQuery {
    /// Lower bound on the schedule; defaults to the start of the live window.
    pub from: Option<DateTime<Utc>>,
}

/// Turns joined rows into API responses, logging any pool whose active
/// bookings exceed its capacity.
pub fn mass_response(row: DbMassWithCounts, now: DateTime<Utc>) -> Result<MassResponse, AppError> {
    let (mass, availability) = row.into_domain()?;
    warn_if_over_booked(&mass, &availability);
    Ok(MassResponse::new(mass, availability, now))
}

pub fn mass_responses(
    rows: Vec<DbMassWithCounts>,
    now: DateTime<Utc>,
) -> Result<Vec<MassResponse>, AppError> {
    rows.into_iter().map(|row| mass_response(row, now)).collect()
}

fn warn_if_over_booked(mass: &Mass, availability: &MassAvailability) {
    for pool in availability.over_booked_pools() {
        tracing::warn!(
            "Mass {} ({}) is over-booked by {} in the {} pool",
            mass.id,
            mass.title,
            availability.pool(pool).over_booked_by,
            pool
        );
    }
}

async fn load_mass(state: &ApiState, id: Uuid) -> Result<MassResponse, AppError> {
    let row = masses::get_mass_with_counts(&state.db_pool, id)
        .await
        .map_err(ParishError::Database)?
        .ok_or_else(|| ParishError::NotFound(format!("Mass with ID {} not found", id)))?;

    mass_response(row, Utc::now())
}

pub async fn list_masses(
    State(state): State<Arc<ApiState>>,
    ApiQuery(query): ApiQuery<MassListQuery>,
) -> Result<Json<Vec<MassResponse>>, AppError> {
    let now = Utc::now();
    let from = query
        .from
        .unwrap_or_else(|| now - Duration::minutes(LIVE_WINDOW_MINUTES));

    let rows = masses::list_masses_from(&state.db_pool, from)
        .await
        .map_err(ParishError::Database)?;

    Ok(Json(mass_responses(rows, now)?))
}

pub async fn get_mass(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<MassResponse>, AppError> {
    Ok(Json(load_mass(&state, id).await?))
}

pub async fn create_mass(
    State(state): State<Arc<ApiState>>,
    AdminUser(admin): AdminUser,
    ApiJson(payload): ApiJson<CreateMassRequest>,
) -> Result<(StatusCode, Json<MassResponse>), AppError> {
    payload.validate()?;

    let location = match payload.location.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
        Some(location) => location.to_string(),
        None => load_church_info(&state).await?.address,
    };
    let capacity = |slots: i64| {
        u32::try_from(slots)
            .map_err(|_| ParishError::Validation(format!("Invalid slot count: {}", slots)))
    };

    let row = masses::create_mass(
        &state.db_pool,
        &payload.title,
        payload.scheduled_at,
        &location,
        capacity(payload.intention_slots)?,
        capacity(payload.thanksgiving_slots)?,
    )
    .await?;

    tracing::info!("Mass {} created by admin {}", row.id, admin.id);

    let response = load_mass(&state, row.id).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn update_mass(
    State(state): State<Arc<ApiState>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<UpdateMassRequest>,
) -> Result<Json<MassResponse>, AppError> {
    payload.validate()?;

    masses::update_mass(&state.db_pool, id, &payload).await?;

    Ok(Json(load_mass(&state, id).await?))
}

pub async fn delete_mass(
    State(state): State<Arc<ApiState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = masses::delete_mass(&state.db_pool, id)
        .await
        .map_err(ParishError::Database)?;

    if !deleted {
        return Err(AppError(ParishError::NotFound(format!(
            "Mass with ID {} not found",
            id
        ))));
    }

    tracing::info!("Mass {} deleted by admin {}", id, admin.id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_livestream(
    State(state): State<Arc<ApiState>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<LivestreamRequest>,
) -> Result<Json<MassResponse>, AppError> {
    let url = validate_youtube_url(&payload.url)?;

    masses::set_livestream_url(&state.db_pool, id, &url)
        .await
        .map_err(ParishError::Database)?
        .ok_or_else(|| ParishError::NotFound(format!("Mass with ID {} not found", id)))?;

    Ok(Json(load_mass(&state, id).await?))
}
