use axum::{extract::State, Json};
use chrono::{DateTime, Duration, Utc};
use parish_core::{
    errors::ParishError,
    live::{LiveFilter, LiveStatus},
    models::mass::{LivestreamEntry, LivestreamResponse, Mass},
};
use parish_db::{models::DbMass, repositories::masses};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    middleware::error_handling::{ApiQuery, AppError},
    ApiState,
};

/// How far back the livestream page looks.
pub const LIVESTREAM_HISTORY_DAYS: i64 = 30;

#[derive(Debug, Default, Deserialize)]
pub struct LivestreamQuery {
    pub filter: Option<String>,
}

/// Labels every Mass, keeps those matching `filter` and picks the featured
/// stream: the first Mass that is live and has a stream attached.
pub fn build_livestream(
    rows: Vec<DbMass>,
    filter: LiveFilter,
    now: DateTime<Utc>,
) -> Result<LivestreamResponse, AppError> {
    let entries = rows
        .into_iter()
        .map(|row| Mass::try_from(row).map(|mass| LivestreamEntry::new(mass, now)))
        .collect::<eyre::Result<Vec<_>>>()?;

    let featured = entries
        .iter()
        .find(|entry| entry.live_status == LiveStatus::Live && entry.embed_url.is_some())
        .cloned();
    let masses = entries
        .into_iter()
        .filter(|entry| filter.matches(entry.live_status))
        .collect();

    Ok(LivestreamResponse { featured, masses })
}

pub async fn list_livestreams(
    State(state): State<Arc<ApiState>>,
    ApiQuery(query): ApiQuery<LivestreamQuery>,
) -> Result<Json<LivestreamResponse>, AppError> {
    let filter: LiveFilter = query.filter.as_deref().unwrap_or_default().parse()?;
    let now = Utc::now();

    let rows = masses::list_masses_since_desc(
        &state.db_pool,
        now - Duration::days(LIVESTREAM_HISTORY_DAYS),
    )
    .await
    .map_err(ParishError::Database)?;

    Ok(Json(build_livestream(rows, filter, now)?))
}
