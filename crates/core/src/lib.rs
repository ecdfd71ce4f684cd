//! # Parish Core
//!
//! Domain types and the pure computations shared by the database and API
//! crates: slot accounting for Mass bookings, the livestream live window,
//! pagination, office-hour appointment slots and payment summaries.
//!
//! Nothing in this crate performs I/O. Every function takes already-loaded
//! records (and, where time matters, an explicit `now`) so the same rules can
//! be applied inside a database transaction or in a request handler.

pub mod errors;
pub mod live;
pub mod livestream;
pub mod models;
pub mod office_hours;
pub mod pagination;
pub mod payments;
pub mod slots;
