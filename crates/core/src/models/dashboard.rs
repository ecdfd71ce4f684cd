use serde::{Deserialize, Serialize};

use super::{booking::BookingWithMass, event::Event, payment::Payment, user::User};

/// Number of recent items of each kind on a parishioner's dashboard.
pub const DASHBOARD_ITEMS: i64 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub user: User,
    pub intentions: Vec<BookingWithMass>,
    pub thanksgivings: Vec<BookingWithMass>,
    pub payments: Vec<Payment>,
    pub events: Vec<Event>,
}
