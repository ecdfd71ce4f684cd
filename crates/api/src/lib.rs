//! # Parish API
//!
//! The API crate provides the web server for the parish management service.
//! It exposes JSON endpoints for Mass bookings, appointments, events,
//! donations, livestreams and parish administration.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Implement request processing logic
//! - **Middleware**: Provide cross-cutting concerns like authentication and error handling
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework and SQLx for database interactions.

/// Configuration module for API settings
pub mod config;
/// Request handlers that implement business logic
pub mod handlers;
/// Middleware for authentication and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use eyre::Result;
use parish_core::office_hours::OfficeHours;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// PostgreSQL connection pool for database operations
    pub db_pool: PgPool,
    /// Hours in which appointment slots are offered
    pub office_hours: OfficeHours,
    /// Registering with this address grants the superadmin role
    pub superadmin_email: Option<String>,
    /// Parish address used until an admin saves the church details
    pub parish_address: String,
}

impl ApiState {
    pub fn new(config: &config::ApiConfig, db_pool: PgPool) -> Self {
        Self {
            db_pool,
            office_hours: config.office_hours,
            superadmin_email: config.superadmin_email.clone(),
            parish_address: config.parish_address.clone(),
        }
    }
}

/// Builds the application router with every route group attached.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Registration, login and the current profile
        .merge(routes::auth::routes())
        // Masses, bookings and livestreams
        .merge(routes::masses::routes())
        .merge(routes::bookings::routes())
        .merge(routes::livestream::routes())
        // Appointments with the parish office
        .merge(routes::appointments::routes())
        // Events, goals and payments
        .merge(routes::events::routes())
        .merge(routes::payments::routes())
        // Parishioner and admin management
        .merge(routes::admin::routes())
        .merge(routes::dashboard::routes())
        // Parish details shown on the site
        .merge(routes::church::routes())
        // Attach shared state to all routes
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(origins)
        .allow_credentials(true)
}

/// Starts the API server with the provided configuration and database connection
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// let config = parish_api::config::ApiConfig::from_env()?;
/// let db_pool = parish_db::create_pool(&config.database_url, config.max_connections).await?;
/// parish_api::start_server(config, db_pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState::new(&config, db_pool));
    let app = build_router(state).layer(TraceLayer::new_for_http());

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    // Add request timeout middleware
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(axum::error_handling::HandleErrorLayer::new(
                |_: tower::BoxError| async { axum::http::StatusCode::REQUEST_TIMEOUT },
            ))
            .timeout(Duration::from_secs(config.request_timeout))
            .into_inner(),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
