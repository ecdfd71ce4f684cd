use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        // Parishioner bookings
        .route(
            "/api/masses/:id/intentions",
            post(handlers::bookings::book_intention),
        )
        .route(
            "/api/masses/:id/thanksgivings",
            post(handlers::bookings::book_thanksgiving),
        )
        .route("/api/intentions/mine", get(handlers::bookings::my_intentions))
        .route(
            "/api/thanksgivings/mine",
            get(handlers::bookings::my_thanksgivings),
        )
        // Admin tables
        .route(
            "/api/admin/intentions",
            get(handlers::bookings::admin_intentions),
        )
        .route(
            "/api/admin/thanksgivings",
            get(handlers::bookings::admin_thanksgivings),
        )
        .route(
            "/api/admin/intentions/:id/status",
            put(handlers::bookings::update_intention_status),
        )
        .route(
            "/api/admin/thanksgivings/:id/status",
            put(handlers::bookings::update_thanksgiving_status),
        )
        .route(
            "/api/admin/intentions/:id",
            delete(handlers::bookings::delete_intention),
        )
        .route(
            "/api/admin/thanksgivings/:id",
            delete(handlers::bookings::delete_thanksgiving),
        )
}
