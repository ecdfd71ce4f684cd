//! # Slot Accounting
//!
//! Every Mass carries two independent slot pools: Mass intentions and
//! thanksgivings. The number of open slots in a pool is never stored; it is
//! derived from the configured capacity and the count of *active* bookings
//! (pending or approved) against that pool. Rejected bookings do not hold a
//! slot.
//!
//! The functions here are the only place that arithmetic happens. The
//! database layer calls them while holding a row lock on the Mass, so the
//! check and the insert it guards are observed atomically.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::{
    errors::{ParishError, ParishResult},
    live::{classify, LiveStatus},
    models::mass::MassStatus,
};

/// The two bookable pools of a Mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotPool {
    Intention,
    Thanksgiving,
}

impl SlotPool {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotPool::Intention => "intention",
            SlotPool::Thanksgiving => "thanksgiving",
        }
    }

    /// Human readable name used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            SlotPool::Intention => "Mass intention",
            SlotPool::Thanksgiving => "thanksgiving",
        }
    }
}

impl fmt::Display for SlotPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlotPool {
    type Err = ParishError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intention" => Ok(SlotPool::Intention),
            "thanksgiving" => Ok(SlotPool::Thanksgiving),
            other => Err(ParishError::Validation(format!("Unknown slot pool: {other}"))),
        }
    }
}

/// Remaining slots in a pool, clamped at zero.
pub fn available_slots(capacity: u32, booked: u32) -> u32 {
    capacity.saturating_sub(booked)
}

/// Availability of one pool as shown to callers.
///
/// `over_booked_by` is non-zero only when the stored bookings exceed the
/// capacity, which indicates a data-integrity problem. `available` is clamped
/// to zero in that case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAvailability {
    pub capacity: u32,
    pub booked: u32,
    pub available: u32,
    pub over_booked_by: u32,
}

impl SlotAvailability {
    pub fn compute(capacity: u32, booked: u32) -> Self {
        Self {
            capacity,
            booked,
            available: available_slots(capacity, booked),
            over_booked_by: booked.saturating_sub(capacity),
        }
    }

    pub fn is_over_booked(&self) -> bool {
        self.over_booked_by > 0
    }

    /// A booking is admitted iff at least one slot remains.
    pub fn admits(&self) -> bool {
        self.available > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MassAvailability {
    pub intentions: SlotAvailability,
    pub thanksgivings: SlotAvailability,
}

impl MassAvailability {
    pub fn compute(
        intention_capacity: u32,
        booked_intentions: u32,
        thanksgiving_capacity: u32,
        booked_thanksgivings: u32,
    ) -> Self {
        Self {
            intentions: SlotAvailability::compute(intention_capacity, booked_intentions),
            thanksgivings: SlotAvailability::compute(thanksgiving_capacity, booked_thanksgivings),
        }
    }

    pub fn pool(&self, pool: SlotPool) -> &SlotAvailability {
        match pool {
            SlotPool::Intention => &self.intentions,
            SlotPool::Thanksgiving => &self.thanksgivings,
        }
    }

    /// Pools whose bookings exceed capacity.
    pub fn over_booked_pools(&self) -> Vec<SlotPool> {
        [SlotPool::Intention, SlotPool::Thanksgiving]
            .into_iter()
            .filter(|pool| self.pool(*pool).is_over_booked())
            .collect()
    }
}

/// Eligibility check for a single pool.
pub fn check_eligibility(pool: SlotPool, availability: &SlotAvailability) -> ParishResult<()> {
    if availability.admits() {
        Ok(())
    } else {
        Err(ParishError::SlotUnavailable(format!(
            "no {} slots left for this Mass",
            pool.label()
        )))
    }
}

/// Full admission decision for a new booking against a Mass.
///
/// A Mass that is closed or already past never accepts bookings, regardless
/// of remaining capacity.
pub fn check_booking(
    status: MassStatus,
    scheduled_at: DateTime<Utc>,
    now: DateTime<Utc>,
    pool: SlotPool,
    availability: &SlotAvailability,
) -> ParishResult<()> {
    if status == MassStatus::Closed {
        return Err(ParishError::Conflict("This Mass is closed for bookings".to_string()));
    }
    if classify(scheduled_at, now) == LiveStatus::Past {
        return Err(ParishError::Conflict("This Mass has already taken place".to_string()));
    }
    check_eligibility(pool, availability)
}

/// Validates a new capacity for a pool against its active bookings.
///
/// Capacities below the number of slots already held are rejected so that
/// availability can never become negative through an edit.
pub fn validate_capacity_edit(pool: SlotPool, new_capacity: i64, booked: u32) -> ParishResult<u32> {
    let capacity = u32::try_from(new_capacity).map_err(|_| {
        ParishError::Validation(format!("{} slots must be at least 0", pool.label()))
    })?;

    if capacity < booked {
        return Err(ParishError::Validation(format!(
            "{} slots must be at least {} (currently booked)",
            pool.label(),
            booked
        )));
    }

    Ok(capacity)
}
