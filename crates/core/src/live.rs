//! Livestream window classification.
//!
//! A Mass counts as live from sixty minutes before its scheduled start until
//! sixty minutes after it. Both edges are inclusive. The label is always
//! recomputed from the supplied clock and never stored.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::ParishError;

pub const LIVE_WINDOW_MINUTES: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiveStatus {
    Live,
    Upcoming,
    Past,
}

pub fn classify(scheduled_at: DateTime<Utc>, now: DateTime<Utc>) -> LiveStatus {
    let window = Duration::minutes(LIVE_WINDOW_MINUTES);

    if now < scheduled_at - window {
        LiveStatus::Upcoming
    } else if now > scheduled_at + window {
        LiveStatus::Past
    } else {
        LiveStatus::Live
    }
}

pub fn is_live(scheduled_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    classify(scheduled_at, now) == LiveStatus::Live
}

/// Listing filter offered by the livestream page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiveFilter {
    #[default]
    All,
    Live,
    Upcoming,
    Past,
}

impl LiveFilter {
    pub fn matches(&self, status: LiveStatus) -> bool {
        match self {
            LiveFilter::All => true,
            LiveFilter::Live => status == LiveStatus::Live,
            LiveFilter::Upcoming => status == LiveStatus::Upcoming,
            LiveFilter::Past => status == LiveStatus::Past,
        }
    }
}

impl FromStr for LiveFilter {
    type Err = ParishError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "all" => Ok(LiveFilter::All),
            "live" => Ok(LiveFilter::Live),
            "upcoming" => Ok(LiveFilter::Upcoming),
            "past" => Ok(LiveFilter::Past),
            other => Err(ParishError::Validation(format!("Unknown livestream filter: {other}"))),
        }
    }
}
