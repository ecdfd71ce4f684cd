use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use parish_core::{
    errors::ParishError,
    models::booking::{
        Booking, BookingCounts, BookingStatus, BookingTable, BookingWithMass,
        CreateIntentionRequest, CreateThanksgivingRequest, UpdateBookingStatusRequest,
    },
    pagination::{Page, PageRequest, Paginated},
    slots::SlotPool,
};
use parish_db::{models::convert_all, repositories::bookings};
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

/// Rows per page in the admin booking tables.
pub const BOOKING_TABLE_LIMIT: u32 = 5;

#[derive(Debug, Default, Deserialize)]
pub struct BookingTableQuery {
    pub status: Option<BookingStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Assembles one status tab of an admin booking table.
pub fn booking_table(
    status: BookingStatus,
    counts: BookingCounts,
    page: Page,
    rows: Vec<BookingWithMass>,
) -> BookingTable {
    BookingTable {
        status,
        counts,
        page: Paginated::new(rows, page, counts.get(status)),
    }
}

async fn book(
    state: &ApiState,
    mass_id: Uuid,
    user_id: Uuid,
    pool: SlotPool,
    name: Option<&str>,
    details: &str,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let row =
        bookings::create_booking(&state.db_pool, mass_id, user_id, pool, name, details, Utc::now())
            .await?;

    Ok((StatusCode::CREATED, Json(Booking::try_from(row)?)))
}

pub async fn book_intention(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    Path(mass_id): Path<Uuid>,
    ApiJson(payload): ApiJson<CreateIntentionRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    payload.validate()?;
    book(
        &state,
        mass_id,
        current.user.id,
        SlotPool::Intention,
        Some(&payload.name),
        &payload.intention,
    )
    .await
}

pub async fn book_thanksgiving(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    Path(mass_id): Path<Uuid>,
    ApiJson(payload): ApiJson<CreateThanksgivingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    payload.validate()?;
    book(
        &state,
        mass_id,
        current.user.id,
        SlotPool::Thanksgiving,
        None,
        &payload.description,
    )
    .await
}

async fn own_bookings(
    state: &ApiState,
    user_id: Uuid,
    pool: SlotPool,
) -> Result<Json<Vec<BookingWithMass>>, AppError> {
    let rows = bookings::list_user_bookings(&state.db_pool, user_id, pool, None)
        .await
        .map_err(ParishError::Database)?;

    Ok(Json(convert_all(rows)?))
}

pub async fn my_intentions(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
) -> Result<Json<Vec<BookingWithMass>>, AppError> {
    own_bookings(&state, current.user.id, SlotPool::Intention).await
}

pub async fn my_thanksgivings(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
) -> Result<Json<Vec<BookingWithMass>>, AppError> {
    own_bookings(&state, current.user.id, SlotPool::Thanksgiving).await
}

async fn admin_table(
    state: &ApiState,
    pool: SlotPool,
    query: BookingTableQuery,
) -> Result<Json<BookingTable>, AppError> {
    let status = query.status.unwrap_or(BookingStatus::Pending);
    let page = Page::new(
        PageRequest {
            page: query.page,
            limit: query.limit,
        },
        BOOKING_TABLE_LIMIT,
    );

    let counts = bookings::count_bookings_by_status(&state.db_pool, pool)
        .await
        .map_err(ParishError::Database)?;
    let rows = bookings::list_bookings_by_status(
        &state.db_pool,
        pool,
        status,
        page.offset(),
        page.limit(),
    )
    .await
    .map_err(ParishError::Database)?;

    Ok(Json(booking_table(status, counts, page, convert_all(rows)?)))
}

pub async fn admin_intentions(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    ApiQuery(query): ApiQuery<BookingTableQuery>,
) -> Result<Json<BookingTable>, AppError> {
    admin_table(&state, SlotPool::Intention, query).await
}

pub async fn admin_thanksgivings(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    ApiQuery(query): ApiQuery<BookingTableQuery>,
) -> Result<Json<BookingTable>, AppError> {
    admin_table(&state, SlotPool::Thanksgiving, query).await
}

async fn set_status(
    state: &ApiState,
    id: Uuid,
    pool: SlotPool,
    status: BookingStatus,
) -> Result<Json<Booking>, AppError> {
    let row = bookings::update_booking_status(&state.db_pool, id, pool, status).await?;
    Ok(Json(Booking::try_from(row)?))
}

pub async fn update_intention_status(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<UpdateBookingStatusRequest>,
) -> Result<Json<Booking>, AppError> {
    set_status(&state, id, SlotPool::Intention, payload.status).await
}

pub async fn update_thanksgiving_status(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<UpdateBookingStatusRequest>,
) -> Result<Json<Booking>, AppError> {
    set_status(&state, id, SlotPool::Thanksgiving, payload.status).await
}

async fn remove(state: &ApiState, id: Uuid, pool: SlotPool) -> Result<StatusCode, AppError> {
    let deleted = bookings::delete_booking(&state.db_pool, id, pool)
        .await
        .map_err(ParishError::Database)?;

    if !deleted {
        return Err(AppError(ParishError::NotFound(format!(
            "Booking with ID {} not found",
            id
        ))));
    }

    tracing::info!("Deleted {} {}", pool, id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_intention(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    remove(&state, id, SlotPool::Intention).await
}

pub async fn delete_thanksgiving(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    remove(&state, id, SlotPool::Thanksgiving).await
}
