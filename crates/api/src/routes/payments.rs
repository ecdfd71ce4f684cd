use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        // Fundraising goals
        .route(
            "/api/goals",
            get(handlers::payments::list_goals).post(handlers::payments::create_goal),
        )
        .route(
            "/api/goals/:id",
            get(handlers::payments::get_goal).put(handlers::payments::update_goal),
        )
        // Donations and offerings
        .route("/api/payments", post(handlers::payments::create_payment))
        .route("/api/payments/mine", get(handlers::payments::my_payments))
        .route("/api/admin/payments", get(handlers::payments::list_payments))
        .route(
            "/api/admin/payments/summary",
            get(handlers::payments::payment_summary),
        )
        .route(
            "/api/admin/payments/:id/status",
            put(handlers::payments::update_payment_status),
        )
}
