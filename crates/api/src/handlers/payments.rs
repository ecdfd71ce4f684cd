use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use parish_core::{
    errors::ParishError,
    models::payment::{
        CreateGoalRequest, CreatePaymentRequest, GoalResponse, Payment, PaymentOverview,
        UpdateGoalRequest, UpdatePaymentStatusRequest,
    },
    pagination::{Page, PageRequest, Paginated},
    payments::summarize,
};
use parish_db::{
    models::{convert_all, DbGoalWithRaised},
    repositories::payments,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    middleware::{
        auth::{AdminUser, CurrentUser},
        error_handling::{ApiJson, ApiQuery, AppError},
    },
    ApiState,
};

pub const PAYMENT_TABLE_LIMIT: u32 = 10;

fn goal_not_found(id: Uuid) -> ParishError {
    ParishError::NotFound(format!("Fundraising goal with ID {} not found", id))
}

/// Builds the admin donations overview from every payment and goal.
pub fn payment_overview(payments: &[Payment], goals: Vec<DbGoalWithRaised>) -> PaymentOverview {
    PaymentOverview {
        summary: summarize(payments),
        goals: goals.into_iter().map(GoalResponse::from).collect(),
    }
}

async fn load_goal(state: &ApiState, id: Uuid) -> Result<GoalResponse, AppError> {
    let row = payments::get_goal_with_raised(&state.db_pool, id)
        .await
        .map_err(ParishError::Database)?
        .ok_or_else(|| goal_not_found(id))?;

    Ok(row.into())
}

pub async fn list_goals(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<GoalResponse>>, AppError> {
    let rows = payments::list_goals_with_raised(&state.db_pool)
        .await
        .map_err(ParishError::Database)?;

    Ok(Json(rows.into_iter().map(GoalResponse::from).collect()))
}

pub async fn get_goal(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<GoalResponse>, AppError> {
    Ok(Json(load_goal(&state, id).await?))
}

pub async fn create_goal(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    ApiJson(payload): ApiJson<CreateGoalRequest>,
) -> Result<(StatusCode, Json<GoalResponse>), AppError> {
    payload.validate()?;

    let row = payments::create_goal(&state.db_pool, &payload)
        .await
        .map_err(ParishError::Database)?;

    let response = load_goal(&state, row.id).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn update_goal(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<UpdateGoalRequest>,
) -> Result<Json<GoalResponse>, AppError> {
    payload.validate()?;

    payments::update_goal(&state.db_pool, id, &payload)
        .await
        .map_err(ParishError::Database)?
        .ok_or_else(|| goal_not_found(id))?;

    Ok(Json(load_goal(&state, id).await?))
}

pub async fn create_payment(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    ApiJson(payload): ApiJson<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), AppError> {
    payload.validate()?;

    if let Some(goal_id) = payload.goal_id {
        payments::get_goal_with_raised(&state.db_pool, goal_id)
            .await
            .map_err(ParishError::Database)?
            .ok_or_else(|| goal_not_found(goal_id))?;
    }

    let row = payments::create_payment(&state.db_pool, current.user.id, &payload)
        .await
        .map_err(ParishError::Database)?;

    Ok((StatusCode::CREATED, Json(Payment::try_from(row)?)))
}

pub async fn my_payments(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
) -> Result<Json<Vec<Payment>>, AppError> {
    let rows = payments::list_user_payments(&state.db_pool, current.user.id, None)
        .await
        .map_err(ParishError::Database)?;

    Ok(Json(convert_all(rows)?))
}

pub async fn list_payments(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    ApiQuery(query): ApiQuery<PageRequest>,
) -> Result<Json<Paginated<Payment>>, AppError> {
    let page = Page::new(query, PAYMENT_TABLE_LIMIT);

    let total = payments::count_payments(&state.db_pool)
        .await
        .map_err(ParishError::Database)?;
    let rows = payments::list_payments_page(&state.db_pool, page.offset(), page.limit())
        .await
        .map_err(ParishError::Database)?;

    Ok(Json(Paginated::new(
        convert_all(rows)?,
        page,
        u64::try_from(total).unwrap_or(0),
    )))
}

pub async fn payment_summary(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
) -> Result<Json<PaymentOverview>, AppError> {
    let rows = payments::list_all_payments(&state.db_pool)
        .await
        .map_err(ParishError::Database)?;
    let goals = payments::list_goals_with_raised(&state.db_pool)
        .await
        .map_err(ParishError::Database)?;

    let all: Vec<Payment> = convert_all(rows)?;
    Ok(Json(payment_overview(&all, goals)))
}

pub async fn update_payment_status(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<UpdatePaymentStatusRequest>,
) -> Result<Json<Payment>, AppError> {
    let row = payments::update_payment_status(&state.db_pool, id, payload.status)
        .await
        .map_err(ParishError::Database)?
        .ok_or_else(|| ParishError::NotFound(format!("Payment with ID {} not found", id)))?;

    Ok(Json(Payment::try_from(row)?))
}
