//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the parish API server.
//! It retrieves configuration values from environment variables and provides defaults
//! where appropriate.
//!
//! ## Environment Variables
//!
//! The following environment variables are used:
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: Size of the connection pool (default: 5)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `OFFICE_HOURS_START` / `OFFICE_HOURS_END`: Appointment hours (default: 9 to 17)
//! - `SUPERADMIN_EMAIL`: Account promoted to superadmin when it registers
//! - `PARISH_ADDRESS`: Default location for new Masses

use eyre::{Result, WrapErr};
use parish_core::office_hours::OfficeHours;
use std::env;
use tracing::Level;

pub const DEFAULT_PARISH_ADDRESS: &str = "Parish Church";

/// Configuration for the parish API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use parish_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}:{}", config.host, config.port);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Maximum number of pooled database connections
    pub max_connections: u32,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Hours during which appointments can be booked
    pub office_hours: OfficeHours,

    /// Email address that becomes superadmin on registration
    pub superadmin_email: Option<String>,

    /// Location used for Masses created without one
    pub parish_address: String,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - The API_PORT value cannot be parsed as a u16
    /// - The office hours are not numbers or do not form a valid range
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Network settings
        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("API_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| eyre::eyre!("DATABASE_URL environment variable must be set"))?;
        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .and_then(|value| value.parse().ok())
            .unwrap_or(parish_db::DEFAULT_MAX_CONNECTIONS);

        // Logging settings
        let log_level = parse_log_level(lookup("LOG_LEVEL").as_deref().unwrap_or("info"));

        // CORS settings
        let cors_origins = lookup("API_CORS_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        // Performance settings
        let request_timeout = lookup("API_REQUEST_TIMEOUT_SECONDS")
            .and_then(|value| value.parse().ok())
            .unwrap_or(30);

        // Parish settings
        let start_hour = lookup("OFFICE_HOURS_START")
            .unwrap_or_else(|| "9".to_string())
            .parse()
            .wrap_err("Invalid OFFICE_HOURS_START value")?;
        let end_hour = lookup("OFFICE_HOURS_END")
            .unwrap_or_else(|| "17".to_string())
            .parse()
            .wrap_err("Invalid OFFICE_HOURS_END value")?;
        let office_hours = OfficeHours::new(start_hour, end_hour)
            .map_err(|e| eyre::eyre!("Invalid office hours: {}", e))?;

        let superadmin_email = lookup("SUPERADMIN_EMAIL")
            .map(|email| email.trim().to_lowercase())
            .filter(|email| !email.is_empty());
        let parish_address = lookup("PARISH_ADDRESS")
            .map(|address| address.trim().to_string())
            .filter(|address| !address.is_empty())
            .unwrap_or_else(|| DEFAULT_PARISH_ADDRESS.to_string());

        Ok(Self {
            host,
            port,
            database_url,
            max_connections,
            log_level,
            cors_origins,
            request_timeout,
            office_hours,
            superadmin_email,
            parish_address,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_log_level(value: &str) -> Level {
    match value.to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
