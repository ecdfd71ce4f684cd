use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/masses",
            get(handlers::masses::list_masses).post(handlers::masses::create_mass),
        )
        .route(
            "/api/masses/:id",
            get(handlers::masses::get_mass)
                .put(handlers::masses::update_mass)
                .delete(handlers::masses::delete_mass),
        )
        .route(
            "/api/masses/:id/livestream",
            put(handlers::masses::set_livestream),
        )
}
