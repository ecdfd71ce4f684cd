use axum::{extract::State, Json};
use parish_core::{
    errors::ParishError,
    models::church::{ChurchInfo, UpdateChurchInfoRequest},
};
use parish_db::{models::DbChurchInfo, repositories::church};
use std::sync::Arc;

use crate::{
    middleware::{
        auth::AdminUser,
        error_handling::{ApiJson, AppError},
    },
    ApiState,
};

/// Saved parish details, or the configured address when nothing was saved.
pub fn church_info_or_default(row: Option<DbChurchInfo>, configured_address: &str) -> ChurchInfo {
    row.map(ChurchInfo::from)
        .unwrap_or_else(|| ChurchInfo::unsaved(configured_address))
}

pub(crate) async fn load_church_info(state: &ApiState) -> Result<ChurchInfo, AppError> {
    let row = church::get_church_info(&state.db_pool)
        .await
        .map_err(ParishError::Database)?;

    Ok(church_info_or_default(row, &state.parish_address))
}

pub async fn get_church_info(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<ChurchInfo>, AppError> {
    Ok(Json(load_church_info(&state).await?))
}

pub async fn update_church_info(
    State(state): State<Arc<ApiState>>,
    AdminUser(admin): AdminUser,
    ApiJson(payload): ApiJson<UpdateChurchInfoRequest>,
) -> Result<Json<ChurchInfo>, AppError> {
    payload.validate()?;

    let row = church::save_church_info(&state.db_pool, &payload)
        .await
        .map_err(ParishError::Database)?;

    tracing::info!("Church information saved by admin {}", admin.id);
    Ok(Json(row.into()))
}
