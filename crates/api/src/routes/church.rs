use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/church", get(handlers::church::get_church_info))
        .route(
            "/api/admin/church",
            put(handlers::church::update_church_info),
        )
}
