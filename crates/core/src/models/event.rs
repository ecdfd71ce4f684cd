use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ParishError, ParishResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
}

impl CreateEventRequest {
    pub fn validate(&self) -> ParishResult<()> {
        if self.title.trim().is_empty() {
            return Err(ParishError::Validation("Event title is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
}

impl UpdateEventRequest {
    pub fn validate(&self) -> ParishResult<()> {
        match &self.title {
            Some(title) if title.trim().is_empty() => {
                Err(ParishError::Validation("Event title is required".to_string()))
            }
            _ => Ok(()),
        }
    }
}
