use std::collections::HashMap;

use parish_api::config::{ApiConfig, DEFAULT_PARISH_ADDRESS};
use pretty_assertions::assert_eq;
use tracing::Level;

fn config_from(pairs: &[(&str, &str)]) -> eyre::Result<ApiConfig> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ApiConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn test_defaults() {
    let config = config_from(&[("DATABASE_URL", "postgres://localhost/parish")]).unwrap();

    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 3000);
    assert_eq!(config.server_addr(), "0.0.0.0:3000");
    assert_eq!(config.max_connections, 5);
    assert_eq!(config.log_level, Level::INFO);
    assert_eq!(config.cors_origins, None);
    assert_eq!(config.request_timeout, 30);
    assert_eq!(config.office_hours.start_hour(), 9);
    assert_eq!(config.office_hours.end_hour(), 17);
    assert_eq!(config.superadmin_email, None);
    assert_eq!(config.parish_address, DEFAULT_PARISH_ADDRESS);
}

#[test]
fn test_database_url_is_required() {
    assert!(config_from(&[]).is_err());
}

#[test]
fn test_overrides() {
    let config = config_from(&[
        ("DATABASE_URL", "postgres://localhost/parish"),
        ("API_HOST", "127.0.0.1"),
        ("API_PORT", "8080"),
        ("LOG_LEVEL", "DEBUG"),
        ("API_CORS_ORIGINS", "http://localhost:5173, https://parish.example,"),
        ("API_REQUEST_TIMEOUT_SECONDS", "5"),
        ("OFFICE_HOURS_START", "8"),
        ("OFFICE_HOURS_END", "12"),
        ("SUPERADMIN_EMAIL", " Priest@Parish.Example "),
        ("PARISH_ADDRESS", "St. Joseph Parish, Main Street"),
        ("DATABASE_MAX_CONNECTIONS", "20"),
    ])
    .unwrap();

    assert_eq!(config.server_addr(), "127.0.0.1:8080");
    assert_eq!(config.log_level, Level::DEBUG);
    assert_eq!(
        config.cors_origins,
        Some(vec![
            "http://localhost:5173".to_string(),
            "https://parish.example".to_string()
        ])
    );
    assert_eq!(config.request_timeout, 5);
    assert_eq!(
        config.office_hours.slots(),
        vec!["08:00", "09:00", "10:00", "11:00"]
    );
    assert_eq!(
        config.superadmin_email.as_deref(),
        Some("priest@parish.example")
    );
    assert_eq!(config.parish_address, "St. Joseph Parish, Main Street");
    assert_eq!(config.max_connections, 20);
}

#[test]
fn test_invalid_port() {
    let result = config_from(&[
        ("DATABASE_URL", "postgres://localhost/parish"),
        ("API_PORT", "eighty"),
    ]);
    assert!(result.is_err());
}

#[test]
fn test_inverted_office_hours() {
    let result = config_from(&[
        ("DATABASE_URL", "postgres://localhost/parish"),
        ("OFFICE_HOURS_START", "17"),
        ("OFFICE_HOURS_END", "9"),
    ]);
    assert!(result.is_err());
}

#[test]
fn test_unknown_log_level_falls_back_to_info() {
    let config = config_from(&[
        ("DATABASE_URL", "postgres://localhost/parish"),
        ("LOG_LEVEL", "chatty"),
    ])
    .unwrap();
    assert_eq!(config.log_level, Level::INFO);
}
