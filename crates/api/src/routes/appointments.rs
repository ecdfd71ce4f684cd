use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/appointments/slots",
            get(handlers::appointments::available_slots),
        )
        .route(
            "/api/appointments",
            post(handlers::appointments::book_appointment),
        )
        .route(
            "/api/appointments/mine",
            get(handlers::appointments::my_appointments),
        )
        .route(
            "/api/appointments/:id",
            delete(handlers::appointments::cancel_appointment),
        )
        .route(
            "/api/admin/appointments",
            get(handlers::appointments::all_appointments),
        )
        .route(
            "/api/admin/appointments/:id/status",
            put(handlers::appointments::update_appointment_status),
        )
}
