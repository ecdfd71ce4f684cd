use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{text_enum, user::validate_email};
use crate::errors::{ParishError, ParishResult};

text_enum! {
    pub enum AppointmentStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Cancelled => "cancelled",
    }
}

impl AppointmentStatus {
    /// Every status except `cancelled` keeps its (date, time slot) taken.
    pub fn holds_slot(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date: NaiveDate,
    pub time_slot: String,
    pub notes: Option<String>,
    pub status: AppointmentStatus,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date: NaiveDate,
    pub time_slot: String,
    pub notes: Option<String>,
}

impl CreateAppointmentRequest {
    pub fn validate(&self, today: NaiveDate) -> ParishResult<()> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(ParishError::Validation("First and last name are required".to_string()));
        }
        validate_email(&self.email)?;
        if self.phone.trim().is_empty() {
            return Err(ParishError::Validation("Phone number is required".to_string()));
        }
        if self.date < today {
            return Err(ParishError::Validation(
                "Appointments cannot be booked in the past".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAppointmentStatusRequest {
    pub status: AppointmentStatus,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableSlotsResponse {
    pub date: NaiveDate,
    pub slots: Vec<String>,
}
