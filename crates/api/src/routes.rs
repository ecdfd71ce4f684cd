pub mod admin;
pub mod appointments;
pub mod auth;
pub mod bookings;
pub mod church;
pub mod dashboard;
pub mod events;
pub mod health;
pub mod livestream;
pub mod masses;
pub mod payments;
