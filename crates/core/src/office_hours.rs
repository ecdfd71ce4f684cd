use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::errors::{ParishError, ParishResult};

/// Parish office hours used to generate hourly appointment slots.
///
/// Slots run from `start_hour` up to, but not including, `end_hour`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficeHours {
    start_hour: u32,
    end_hour: u32,
}

impl OfficeHours {
    pub fn new(start_hour: u32, end_hour: u32) -> ParishResult<Self> {
        if end_hour > 24 || start_hour >= end_hour {
            return Err(ParishError::Validation(format!(
                "Invalid office hours {start_hour:02}:00-{end_hour:02}:00"
            )));
        }
        Ok(Self { start_hour, end_hour })
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    pub fn slots(&self) -> Vec<String> {
        (self.start_hour..self.end_hour)
            .map(|hour| format!("{hour:02}:00"))
            .collect()
    }

    /// Generated slots that are not already taken.
    pub fn free_slots<S: AsRef<str>>(&self, taken: &[S]) -> Vec<String> {
        self.slots()
            .into_iter()
            .filter(|slot| !taken.iter().any(|t| t.as_ref() == slot))
            .collect()
    }

    /// Normalises a requested slot to `HH:MM` and checks it is one we offer.
    pub fn validate_slot(&self, slot: &str) -> ParishResult<String> {
        let time = NaiveTime::parse_from_str(slot.trim(), "%H:%M")
            .map_err(|_| ParishError::Validation(format!("Invalid time slot: {slot}")))?;
        let normalised = time.format("%H:%M").to_string();

        if self.slots().contains(&normalised) {
            Ok(normalised)
        } else {
            Err(ParishError::Validation(format!(
                "Time slot {normalised} is outside office hours"
            )))
        }
    }
}

impl Default for OfficeHours {
    fn default() -> Self {
        Self {
            start_hour: 9,
            end_hour: 17,
        }
    }
}
