use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::text_enum;
use crate::{
    errors::{ParishError, ParishResult},
    pagination::Paginated,
    slots::SlotPool,
};

text_enum! {
    pub enum BookingStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

impl BookingStatus {
    /// Active bookings hold a slot in their pool. Rejected ones release it.
    pub fn is_active(&self) -> bool {
        !matches!(self, BookingStatus::Rejected)
    }

    /// True when moving from `self` to `next` consumes a slot again.
    pub fn reactivates(&self, next: BookingStatus) -> bool {
        !self.is_active() && next.is_active()
    }
}

/// A Mass intention or thanksgiving request against one Mass's pool.
///
/// For intentions `name` is the person the Mass is offered for and `details`
/// the intention itself. Thanksgivings carry only a description in `details`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub mass_id: Uuid,
    pub user_id: Uuid,
    pub pool: SlotPool,
    pub name: Option<String>,
    pub details: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingWithMass {
    #[serde(flatten)]
    pub booking: Booking,
    pub mass_title: String,
    pub mass_scheduled_at: DateTime<Utc>,
    pub requester_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIntentionRequest {
    pub name: String,
    pub intention: String,
}

impl CreateIntentionRequest {
    pub fn validate(&self) -> ParishResult<()> {
        if self.name.trim().is_empty() {
            return Err(ParishError::Validation("Name is required".to_string()));
        }
        if self.intention.trim().is_empty() {
            return Err(ParishError::Validation("Intention is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateThanksgivingRequest {
    pub description: String,
}

impl CreateThanksgivingRequest {
    pub fn validate(&self) -> ParishResult<()> {
        if self.description.trim().is_empty() {
            return Err(ParishError::Validation("Description is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

/// Per-status counts shown above the admin booking tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingCounts {
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
}

impl BookingCounts {
    pub fn get(&self, status: BookingStatus) -> u64 {
        match status {
            BookingStatus::Pending => self.pending,
            BookingStatus::Approved => self.approved,
            BookingStatus::Rejected => self.rejected,
        }
    }
}

/// One page of an admin booking table for a single status tab.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingTable {
    pub status: BookingStatus,
    pub counts: BookingCounts,
    #[serde(flatten)]
    pub page: Paginated<BookingWithMass>,
}
