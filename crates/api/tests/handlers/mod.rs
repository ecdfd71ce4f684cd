mod admin_test;
mod appointments_test;
mod auth_test;
mod config_test;
mod dashboard_test;
mod livestream_test;
mod masses_test;
mod middleware_test;
mod payments_test;
mod routes_test;
