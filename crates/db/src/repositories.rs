pub mod appointments;
pub mod bookings;
pub mod church;
pub mod events;
pub mod masses;
pub mod payments;
pub mod users;
