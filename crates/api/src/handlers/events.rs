use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use parish_core::{
    errors::ParishError,
    models::event::{CreateEventRequest, Event, UpdateEventRequest},
};
use parish_db::repositories::events;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    middleware::{
        auth::AdminUser,
        error_handling::{ApiJson, AppError},
    },
    ApiState,
};

fn not_found(id: Uuid) -> ParishError {
    ParishError::NotFound(format!("Event with ID {} not found", id))
}

pub async fn list_events(State(state): State<Arc<ApiState>>) -> Result<Json<Vec<Event>>, AppError> {
    let rows = events::list_upcoming_events(&state.db_pool, Utc::now(), None)
        .await
        .map_err(ParishError::Database)?;

    Ok(Json(rows.into_iter().map(Event::from).collect()))
}

pub async fn get_event(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Event>, AppError> {
    let row = events::get_event(&state.db_pool, id)
        .await
        .map_err(ParishError::Database)?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(row.into()))
}

pub async fn create_event(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    ApiJson(payload): ApiJson<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    payload.validate()?;

    let row = events::create_event(&state.db_pool, &payload)
        .await
        .map_err(ParishError::Database)?;

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn update_event(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<UpdateEventRequest>,
) -> Result<Json<Event>, AppError> {
    payload.validate()?;

    let row = events::update_event(&state.db_pool, id, &payload)
        .await
        .map_err(ParishError::Database)?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(row.into()))
}

pub async fn delete_event(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = events::delete_event(&state.db_pool, id)
        .await
        .map_err(ParishError::Database)?;

    if !deleted {
        return Err(AppError(not_found(id)));
    }
    Ok(StatusCode::NO_CONTENT)
}
