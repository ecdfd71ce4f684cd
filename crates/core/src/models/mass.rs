use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::text_enum;
use crate::{
    errors::{ParishError, ParishResult},
    live::{classify, LiveStatus},
    livestream::embed_url,
    slots::MassAvailability,
};

text_enum! {
    pub enum MassStatus {
        Available => "available",
        Closed => "closed",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mass {
    pub id: Uuid,
    pub title: String,
    pub scheduled_at: DateTime<Utc>,
    pub location: String,
    pub intention_capacity: u32,
    pub thanksgiving_capacity: u32,
    pub livestream_url: Option<String>,
    pub status: MassStatus,
    pub created_at: DateTime<Utc>,
}

/// A Mass together with its derived availability and live label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MassResponse {
    #[serde(flatten)]
    pub mass: Mass,
    pub availability: MassAvailability,
    pub live_status: LiveStatus,
}

impl MassResponse {
    pub fn new(mass: Mass, availability: MassAvailability, now: DateTime<Utc>) -> Self {
        let live_status = classify(mass.scheduled_at, now);
        Self {
            mass,
            availability,
            live_status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMassRequest {
    pub title: String,
    pub scheduled_at: DateTime<Utc>,
    /// Falls back to the parish address when absent or blank.
    pub location: Option<String>,
    pub intention_slots: i64,
    pub thanksgiving_slots: i64,
}

impl CreateMassRequest {
    pub fn validate(&self) -> ParishResult<()> {
        if self.title.trim().is_empty() {
            return Err(ParishError::Validation("Mass title is required".to_string()));
        }
        if self.intention_slots < 0 {
            return Err(ParishError::Validation(
                "Intention slots must be at least 0".to_string(),
            ));
        }
        if self.thanksgiving_slots < 0 {
            return Err(ParishError::Validation(
                "Thanksgiving slots must be at least 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Partial update of a Mass. Slot counts are total capacities, not
/// remaining slots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMassRequest {
    pub title: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub intention_slots: Option<i64>,
    pub thanksgiving_slots: Option<i64>,
    pub status: Option<MassStatus>,
}

impl UpdateMassRequest {
    pub fn validate(&self) -> ParishResult<()> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(ParishError::Validation("Mass title is required".to_string()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivestreamRequest {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivestreamEntry {
    pub id: Uuid,
    pub title: String,
    pub scheduled_at: DateTime<Utc>,
    pub location: String,
    pub livestream_url: Option<String>,
    pub embed_url: Option<String>,
    pub status: MassStatus,
    pub live_status: LiveStatus,
}

impl LivestreamEntry {
    pub fn new(mass: Mass, now: DateTime<Utc>) -> Self {
        let live_status = classify(mass.scheduled_at, now);
        let embed = mass.livestream_url.as_deref().and_then(embed_url);
        Self {
            id: mass.id,
            title: mass.title,
            scheduled_at: mass.scheduled_at,
            location: mass.location,
            livestream_url: mass.livestream_url,
            embed_url: embed,
            status: mass.status,
            live_status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivestreamResponse {
    /// The Mass currently live with a stream attached, if any.
    pub featured: Option<LivestreamEntry>,
    pub masses: Vec<LivestreamEntry>,
}
