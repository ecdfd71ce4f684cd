use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use parish_core::{
    errors::ParishError,
    models::{
        appointment::{
            Appointment, AvailableSlotsResponse, CreateAppointmentRequest,
            UpdateAppointmentStatusRequest,
        },
        user::User,
    },
    office_hours::OfficeHours,
};
use parish_db::{models::convert_all, repositories::appointments};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    middleware::{
        auth::{AdminUser, CurrentUser},
        error_handling::{ApiJson, ApiQuery, AppError},
    },
    ApiState,
};

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: NaiveDate,
}

/// Free slots on `date`. Past dates have none.
pub fn free_slots(
    office_hours: &OfficeHours,
    date: NaiveDate,
    today: NaiveDate,
    taken: &[String],
) -> AvailableSlotsResponse {
    let slots = if date < today {
        Vec::new()
    } else {
        office_hours.free_slots(taken)
    };
    AvailableSlotsResponse { date, slots }
}

/// Only the requester or an admin may cancel an appointment.
pub fn ensure_can_cancel(user: &User, appointment: &Appointment) -> Result<(), ParishError> {
    if appointment.user_id == user.id || user.role.is_admin() {
        Ok(())
    } else {
        Err(ParishError::Authorization(
            "You can only cancel your own appointments".to_string(),
        ))
    }
}

pub async fn available_slots(
    State(state): State<Arc<ApiState>>,
    ApiQuery(query): ApiQuery<SlotsQuery>,
) -> Result<Json<AvailableSlotsResponse>, AppError> {
    let taken = appointments::taken_slots(&state.db_pool, query.date).await?;
    let today = Utc::now().date_naive();

    Ok(Json(free_slots(&state.office_hours, query.date, today, &taken)))
}

pub async fn book_appointment(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    ApiJson(payload): ApiJson<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    payload.validate(Utc::now().date_naive())?;
    let time_slot = state.office_hours.validate_slot(&payload.time_slot)?;

    let row =
        appointments::create_appointment(&state.db_pool, current.user.id, &payload, &time_slot)
            .await?;

    Ok((StatusCode::CREATED, Json(Appointment::try_from(row)?)))
}

pub async fn my_appointments(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let rows = appointments::list_user_appointments(&state.db_pool, current.user.id)
        .await
        .map_err(ParishError::Database)?;

    Ok(Json(convert_all(rows)?))
}

pub async fn cancel_appointment(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    let not_found = || ParishError::NotFound(format!("Appointment with ID {} not found", id));

    let row = appointments::get_appointment(&state.db_pool, id)
        .await
        .map_err(ParishError::Database)?
        .ok_or_else(not_found)?;
    ensure_can_cancel(&current.user, &Appointment::try_from(row)?)?;

    let row = appointments::cancel_appointment(&state.db_pool, id)
        .await
        .map_err(ParishError::Database)?
        .ok_or_else(not_found)?;

    Ok(Json(Appointment::try_from(row)?))
}

pub async fn all_appointments(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let rows = appointments::list_all_appointments(&state.db_pool)
        .await
        .map_err(ParishError::Database)?;

    Ok(Json(convert_all(rows)?))
}

pub async fn update_appointment_status(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<UpdateAppointmentStatusRequest>,
) -> Result<Json<Appointment>, AppError> {
    let row = appointments::update_appointment_status(
        &state.db_pool,
        id,
        payload.status,
        payload.reason.as_deref(),
    )
    .await?
    .ok_or_else(|| ParishError::NotFound(format!("Appointment with ID {} not found", id)))?;

    tracing::info!("Appointment {} marked {}", id, payload.status);
    Ok(Json(Appointment::try_from(row)?))
}
