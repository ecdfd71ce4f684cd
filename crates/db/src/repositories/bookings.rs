use crate::{
    db_error,
    models::{DbBooking, DbBookingWithMass, DbStatusCount},
    repositories::masses::{count_active_bookings, lock_mass},
};
use chrono::{DateTime, Utc};
use eyre::Result;
use parish_core::{
    errors::{ParishError, ParishResult},
    models::{
        booking::{BookingCounts, BookingStatus},
        mass::Mass,
    },
    slots::{check_booking, check_eligibility, SlotAvailability, SlotPool},
};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const BOOKING_COLUMNS: &str =
    "id, mass_id, user_id, pool, name, details, status, created_at, updated_at";

const BOOKING_WITH_MASS: &str = r#"
    SELECT b.id, b.mass_id, b.user_id, b.pool, b.name, b.details, b.status,
           b.created_at, b.updated_at,
           m.title AS mass_title, m.scheduled_at AS mass_scheduled_at,
           u.name AS requester_name
    FROM bookings b
    JOIN masses m ON m.id = b.mass_id
    JOIN users u ON u.id = b.user_id
"#;

/// Books one slot of `slot_pool` on a Mass.
///
/// The Mass row is locked before the active bookings are counted, so two
/// requests racing for the last slot are serialised and only the first one
/// is admitted.
pub async fn create_booking(
    pool: &Pool<Postgres>,
    mass_id: Uuid,
    user_id: Uuid,
    slot_pool: SlotPool,
    name: Option<&str>,
    details: &str,
    now: DateTime<Utc>,
) -> ParishResult<DbBooking> {
    let mut tx = pool.begin().await.map_err(db_error)?;

    let mass_row = lock_mass(&mut *tx, mass_id)
        .await?
        .ok_or_else(|| ParishError::NotFound(format!("Mass with ID {} not found", mass_id)))?;
    let mass = Mass::try_from(mass_row)?;

    let (booked_intentions, booked_thanksgivings) = count_active_bookings(&mut *tx, mass_id).await?;
    let availability = match slot_pool {
        SlotPool::Intention => {
            SlotAvailability::compute(mass.intention_capacity, booked_intentions)
        }
        SlotPool::Thanksgiving => {
            SlotAvailability::compute(mass.thanksgiving_capacity, booked_thanksgivings)
        }
    };
    if availability.is_over_booked() {
        tracing::warn!(
            "Mass {} has {} more active {} bookings than capacity",
            mass_id,
            availability.over_booked_by,
            slot_pool
        );
    }

    check_booking(mass.status, mass.scheduled_at, now, slot_pool, &availability)?;

    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        INSERT INTO bookings (id, mass_id, user_id, pool, name, details, status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7, $7)
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(mass_id)
    .bind(user_id)
    .bind(slot_pool.as_str())
    .bind(name.map(str::trim))
    .bind(details.trim())
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .map_err(db_error)?;

    tx.commit().await.map_err(db_error)?;

    tracing::info!(
        "Booked {} {} on mass {} ({} slots left)",
        slot_pool,
        booking.id,
        mass_id,
        availability.available - 1
    );
    Ok(booking)
}

/// Admin status transition.
///
/// Moving a rejected booking back to pending or approved consumes a slot
/// again and is subject to the same eligibility check as a new booking.
///
/// Locks are taken Mass first, then booking, the same order a Mass delete
/// cascades in.
pub async fn update_booking_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    slot_pool: SlotPool,
    status: BookingStatus,
) -> ParishResult<DbBooking> {
    let not_found = || ParishError::NotFound(format!("Booking with ID {} not found", id));
    let mut tx = pool.begin().await.map_err(db_error)?;

    let mass_id: Uuid =
        sqlx::query_scalar("SELECT mass_id FROM bookings WHERE id = $1 AND pool = $2")
            .bind(id)
            .bind(slot_pool.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error)?
            .ok_or_else(not_found)?;

    // A Mass deleted in between takes the booking with it
    let mass_row = lock_mass(&mut *tx, mass_id).await?.ok_or_else(not_found)?;

    let current = sqlx::query_as::<_, DbBooking>(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1 AND pool = $2 FOR UPDATE"
    ))
    .bind(id)
    .bind(slot_pool.as_str())
    .fetch_optional(&mut *tx)
    .await
    .map_err(db_error)?
    .ok_or_else(not_found)?;

    let current_status: BookingStatus = current.status.parse()?;

    if current_status.reactivates(status) {
        let mass = Mass::try_from(mass_row)?;
        let (booked_intentions, booked_thanksgivings) =
            count_active_bookings(&mut *tx, mass_id).await?;
        let availability = match slot_pool {
            SlotPool::Intention => {
                SlotAvailability::compute(mass.intention_capacity, booked_intentions)
            }
            SlotPool::Thanksgiving => {
                SlotAvailability::compute(mass.thanksgiving_capacity, booked_thanksgivings)
            }
        };
        check_eligibility(slot_pool, &availability)?;
    }

    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        UPDATE bookings
        SET status = $2, updated_at = $3
        WHERE id = $1
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(status.as_str())
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await
    .map_err(db_error)?;

    tx.commit().await.map_err(db_error)?;

    tracing::info!("{} {} moved from {} to {}", slot_pool, id, current_status, status);
    Ok(booking)
}

pub async fn delete_booking(pool: &Pool<Postgres>, id: Uuid, slot_pool: SlotPool) -> Result<bool> {
    let result = sqlx::query("DELETE FROM bookings WHERE id = $1 AND pool = $2")
        .bind(id)
        .bind(slot_pool.as_str())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// A user's bookings in one pool, newest first.
pub async fn list_user_bookings(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    slot_pool: SlotPool,
    limit: Option<i64>,
) -> Result<Vec<DbBookingWithMass>> {
    let bookings = sqlx::query_as::<_, DbBookingWithMass>(&format!(
        r#"
        {BOOKING_WITH_MASS}
        WHERE b.user_id = $1 AND b.pool = $2
        ORDER BY b.created_at DESC
        LIMIT $3
        "#
    ))
    .bind(user_id)
    .bind(slot_pool.as_str())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

/// One page of an admin booking table, ordered by Mass date.
pub async fn list_bookings_by_status(
    pool: &Pool<Postgres>,
    slot_pool: SlotPool,
    status: BookingStatus,
    offset: i64,
    limit: i64,
) -> Result<Vec<DbBookingWithMass>> {
    let bookings = sqlx::query_as::<_, DbBookingWithMass>(&format!(
        r#"
        {BOOKING_WITH_MASS}
        WHERE b.pool = $1 AND b.status = $2
        ORDER BY m.scheduled_at ASC, b.created_at ASC
        OFFSET $3
        LIMIT $4
        "#
    ))
    .bind(slot_pool.as_str())
    .bind(status.as_str())
    .bind(offset)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

pub async fn count_bookings_by_status(
    pool: &Pool<Postgres>,
    slot_pool: SlotPool,
) -> Result<BookingCounts> {
    let rows = sqlx::query_as::<_, DbStatusCount>(
        r#"
        SELECT status, COUNT(*) AS count
        FROM bookings
        WHERE pool = $1
        GROUP BY status
        "#,
    )
    .bind(slot_pool.as_str())
    .fetch_all(pool)
    .await?;

    let mut counts = BookingCounts::default();
    for row in rows {
        let count = u64::try_from(row.count).unwrap_or(0);
        match row.status.parse::<BookingStatus>()? {
            BookingStatus::Pending => counts.pending = count,
            BookingStatus::Approved => counts.approved = count,
            BookingStatus::Rejected => counts.rejected = count,
        }
    }

    Ok(counts)
}
