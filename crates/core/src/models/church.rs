use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::validate_email;
use crate::errors::{ParishError, ParishResult};

pub const DEFAULT_CHURCH_NAME: &str = "Parish Church";

/// Public information about the parish, edited by admins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChurchInfo {
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub mission: Option<String>,
    pub vision: Option<String>,
    pub history: Option<String>,
    /// `None` until an admin saves the details for the first time.
    pub updated_at: Option<DateTime<Utc>>,
}

impl ChurchInfo {
    /// Details shown before anything was saved.
    pub fn unsaved(address: &str) -> Self {
        Self {
            name: DEFAULT_CHURCH_NAME.to_string(),
            address: address.to_string(),
            phone: None,
            email: None,
            mission: None,
            vision: None,
            history: None,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateChurchInfoRequest {
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub mission: Option<String>,
    pub vision: Option<String>,
    pub history: Option<String>,
}

impl UpdateChurchInfoRequest {
    pub fn validate(&self) -> ParishResult<()> {
        if self.name.trim().is_empty() {
            return Err(ParishError::Validation("Church name is required".to_string()));
        }
        if self.address.trim().is_empty() {
            return Err(ParishError::Validation("Church address is required".to_string()));
        }
        match self.email.as_deref().map(str::trim) {
            Some(email) if !email.is_empty() => validate_email(email),
            _ => Ok(()),
        }
    }
}
