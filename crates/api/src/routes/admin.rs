use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/admin/parishioners",
            get(handlers::admin::list_parishioners),
        )
        .route(
            "/api/admin/parishioners/:id/block",
            put(handlers::admin::block_parishioner),
        )
        .route(
            "/api/admin/parishioners/:id/unblock",
            put(handlers::admin::unblock_parishioner),
        )
        .route(
            "/api/superadmin/admins",
            get(handlers::admin::list_admins).post(handlers::admin::create_admin),
        )
        .route(
            "/api/superadmin/admins/:id",
            put(handlers::admin::update_admin),
        )
}
