use chrono::{DateTime, NaiveDate, Utc};
use eyre::Result;
use parish_core::{
    models::{
        appointment::Appointment,
        booking::{Booking, BookingWithMass},
        church::ChurchInfo,
        event::Event,
        mass::Mass,
        payment::{FundraisingGoal, GoalResponse, Payment},
        user::User,
    },
    payments::GoalProgress,
    slots::MassAvailability,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Converts a stored count or capacity to the unsigned domain type.
pub fn non_negative(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: String,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbUser> for User {
    type Error = eyre::Report;

    fn try_from(row: DbUser) -> Result<Self> {
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            role: row.role.parse()?,
            is_blocked: row.is_blocked,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbMass {
    pub id: Uuid,
    pub title: String,
    pub scheduled_at: DateTime<Utc>,
    pub location: String,
    pub intention_capacity: i32,
    pub thanksgiving_capacity: i32,
    pub livestream_url: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbMass> for Mass {
    type Error = eyre::Report;

    fn try_from(row: DbMass) -> Result<Self> {
        Ok(Mass {
            id: row.id,
            title: row.title,
            scheduled_at: row.scheduled_at,
            location: row.location,
            intention_capacity: non_negative(row.intention_capacity.into()),
            thanksgiving_capacity: non_negative(row.thanksgiving_capacity.into()),
            livestream_url: row.livestream_url,
            status: row.status.parse()?,
            created_at: row.created_at,
        })
    }
}

/// A Mass row joined with the number of active bookings in each pool.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbMassWithCounts {
    #[sqlx(flatten)]
    pub mass: DbMass,
    pub booked_intentions: i64,
    pub booked_thanksgivings: i64,
}

impl DbMassWithCounts {
    pub fn into_domain(self) -> Result<(Mass, MassAvailability)> {
        let mass = Mass::try_from(self.mass)?;
        let availability = MassAvailability::compute(
            mass.intention_capacity,
            non_negative(self.booked_intentions),
            mass.thanksgiving_capacity,
            non_negative(self.booked_thanksgivings),
        );
        Ok((mass, availability))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub mass_id: Uuid,
    pub user_id: Uuid,
    pub pool: String,
    pub name: Option<String>,
    pub details: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbBooking> for Booking {
    type Error = eyre::Report;

    fn try_from(row: DbBooking) -> Result<Self> {
        Ok(Booking {
            id: row.id,
            mass_id: row.mass_id,
            user_id: row.user_id,
            pool: row.pool.parse()?,
            name: row.name,
            details: row.details,
            status: row.status.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBookingWithMass {
    #[sqlx(flatten)]
    pub booking: DbBooking,
    pub mass_title: String,
    pub mass_scheduled_at: DateTime<Utc>,
    pub requester_name: String,
}

impl TryFrom<DbBookingWithMass> for BookingWithMass {
    type Error = eyre::Report;

    fn try_from(row: DbBookingWithMass) -> Result<Self> {
        Ok(BookingWithMass {
            booking: row.booking.try_into()?,
            mass_title: row.mass_title,
            mass_scheduled_at: row.mass_scheduled_at,
            requester_name: row.requester_name,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date: NaiveDate,
    pub time_slot: String,
    pub notes: Option<String>,
    pub status: String,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbAppointment> for Appointment {
    type Error = eyre::Report;

    fn try_from(row: DbAppointment) -> Result<Self> {
        Ok(Appointment {
            id: row.id,
            user_id: row.user_id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            date: row.date,
            time_slot: row.time_slot,
            notes: row.notes,
            status: row.status.parse()?,
            reason: row.reason,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbEvent {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DbEvent> for Event {
    fn from(row: DbEvent) -> Self {
        Event {
            id: row.id,
            title: row.title,
            description: row.description,
            date: row.date,
            location: row.location,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbChurchInfo {
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub mission: Option<String>,
    pub vision: Option<String>,
    pub history: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbChurchInfo> for ChurchInfo {
    fn from(row: DbChurchInfo) -> Self {
        ChurchInfo {
            name: row.name,
            address: row.address,
            phone: row.phone,
            email: row.email,
            mission: row.mission,
            vision: row.vision,
            history: row.history,
            updated_at: Some(row.updated_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbGoal {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub target_amount: i64,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl From<DbGoal> for FundraisingGoal {
    fn from(row: DbGoal) -> Self {
        FundraisingGoal {
            id: row.id,
            title: row.title,
            description: row.description,
            target_amount: row.target_amount,
            end_date: row.end_date,
            created_at: row.created_at,
        }
    }
}

/// A goal joined with the sum of its paid donations.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbGoalWithRaised {
    #[sqlx(flatten)]
    pub goal: DbGoal,
    pub raised: i64,
}

impl From<DbGoalWithRaised> for GoalResponse {
    fn from(row: DbGoalWithRaised) -> Self {
        let progress = GoalProgress::compute(row.goal.target_amount, row.raised);
        GoalResponse {
            goal: row.goal.into(),
            progress,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbPayment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub goal_id: Option<Uuid>,
    pub amount: i64,
    pub payment_type: String,
    pub category: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbPayment> for Payment {
    type Error = eyre::Report;

    fn try_from(row: DbPayment) -> Result<Self> {
        Ok(Payment {
            id: row.id,
            user_id: row.user_id,
            goal_id: row.goal_id,
            amount: row.amount,
            payment_type: row.payment_type.parse()?,
            category: row.category,
            status: row.status.parse()?,
            created_at: row.created_at,
        })
    }
}

/// Converts a batch of rows, failing on the first malformed one.
pub fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>>
where
    T: TryFrom<R, Error = eyre::Report>,
{
    rows.into_iter().map(T::try_from).collect()
}
