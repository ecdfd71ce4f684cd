use chrono::{DateTime, NaiveDate, Utc};
use mockall::mock;
use parish_core::{
    errors::ParishResult,
    models::{
        booking::BookingCounts,
        user::{Role, UpdateProfileRequest},
    },
    slots::SlotPool,
};
use uuid::Uuid;

use crate::models::{
    DbAppointment, DbBooking, DbBookingWithMass, DbChurchInfo, DbEvent, DbGoalWithRaised, DbMass,
    DbMassWithCounts, DbPayment, DbUser,
};

// Mock repositories for handler-level tests
mock! {
    pub MassRepo {
        pub async fn get_mass_with_counts(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbMassWithCounts>>;

        pub async fn list_masses_from(
            &self,
            from: DateTime<Utc>,
        ) -> eyre::Result<Vec<DbMassWithCounts>>;

        pub async fn list_masses_since_desc(
            &self,
            since: DateTime<Utc>,
        ) -> eyre::Result<Vec<DbMass>>;
    }
}

mock! {
    pub BookingRepo {
        pub async fn create_booking(
            &self,
            mass_id: Uuid,
            user_id: Uuid,
            pool: SlotPool,
            name: Option<String>,
            details: String,
        ) -> ParishResult<DbBooking>;

        pub async fn list_user_bookings(
            &self,
            user_id: Uuid,
            pool: SlotPool,
            limit: Option<i64>,
        ) -> eyre::Result<Vec<DbBookingWithMass>>;

        pub async fn count_bookings_by_status(
            &self,
            pool: SlotPool,
        ) -> eyre::Result<BookingCounts>;
    }
}

mock! {
    pub UserRepo {
        pub async fn get_user_by_session(
            &self,
            token: String,
        ) -> eyre::Result<Option<DbUser>>;

        pub async fn get_user_by_email(
            &self,
            email: String,
        ) -> eyre::Result<Option<DbUser>>;

        pub async fn list_users_by_roles(
            &self,
            roles: Vec<Role>,
            offset: i64,
            limit: i64,
        ) -> eyre::Result<Vec<DbUser>>;

        pub async fn count_users_by_roles(
            &self,
            roles: Vec<Role>,
        ) -> eyre::Result<i64>;

        pub async fn create_user(
            &self,
            name: String,
            email: String,
            phone: Option<String>,
            password_hash: String,
            role: Role,
        ) -> ParishResult<DbUser>;

        pub async fn update_user_profile(
            &self,
            id: Uuid,
            request: UpdateProfileRequest,
        ) -> eyre::Result<Option<DbUser>>;
    }
}

mock! {
    pub ChurchRepo {
        pub async fn get_church_info(&self) -> eyre::Result<Option<DbChurchInfo>>;
    }
}

mock! {
    pub AppointmentRepo {
        pub async fn taken_slots(
            &self,
            date: NaiveDate,
        ) -> ParishResult<Vec<String>>;

        pub async fn list_user_appointments(
            &self,
            user_id: Uuid,
        ) -> eyre::Result<Vec<DbAppointment>>;
    }
}

mock! {
    pub EventRepo {
        pub async fn list_upcoming_events(
            &self,
            from: DateTime<Utc>,
            limit: Option<i64>,
        ) -> eyre::Result<Vec<DbEvent>>;
    }
}

mock! {
    pub PaymentRepo {
        pub async fn list_user_payments(
            &self,
            user_id: Uuid,
            limit: Option<i64>,
        ) -> eyre::Result<Vec<DbPayment>>;

        pub async fn list_all_payments(&self) -> eyre::Result<Vec<DbPayment>>;

        pub async fn list_goals_with_raised(&self) -> eyre::Result<Vec<DbGoalWithRaised>>;
    }
}
