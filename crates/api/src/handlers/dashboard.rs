use axum::{extract::State, Json};
use chrono::Utc;
use parish_core::{
    errors::ParishError,
    models::{
        dashboard::{DashboardResponse, DASHBOARD_ITEMS},
        event::Event,
        user::User,
    },
    slots::SlotPool,
};
use parish_db::{
    models::{convert_all, DbBookingWithMass, DbEvent, DbPayment},
    repositories::{bookings, events, payments},
};
use std::sync::Arc;

use crate::{
    middleware::{auth::CurrentUser, error_handling::AppError},
    ApiState,
};

pub fn dashboard_response(
    user: User,
    intentions: Vec<DbBookingWithMass>,
    thanksgivings: Vec<DbBookingWithMass>,
    payments: Vec<DbPayment>,
    events: Vec<DbEvent>,
) -> Result<DashboardResponse, AppError> {
    Ok(DashboardResponse {
        user,
        intentions: convert_all(intentions)?,
        thanksgivings: convert_all(thanksgivings)?,
        payments: convert_all(payments)?,
        events: events.into_iter().map(Event::from).collect(),
    })
}

/// Latest bookings and payments of the signed-in user plus the next events.
pub async fn dashboard(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
) -> Result<Json<DashboardResponse>, AppError> {
    let user_id = current.user.id;
    let limit = Some(DASHBOARD_ITEMS);

    let intentions =
        bookings::list_user_bookings(&state.db_pool, user_id, SlotPool::Intention, limit)
            .await
            .map_err(ParishError::Database)?;
    let thanksgivings =
        bookings::list_user_bookings(&state.db_pool, user_id, SlotPool::Thanksgiving, limit)
            .await
            .map_err(ParishError::Database)?;
    let recent_payments = payments::list_user_payments(&state.db_pool, user_id, limit)
        .await
        .map_err(ParishError::Database)?;
    let upcoming = events::list_upcoming_events(&state.db_pool, Utc::now(), limit)
        .await
        .map_err(ParishError::Database)?;

    Ok(Json(dashboard_response(
        current.user,
        intentions,
        thanksgivings,
        recent_payments,
        upcoming,
    )?))
}
