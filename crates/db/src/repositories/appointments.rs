use crate::{db_error, is_unique_violation, models::DbAppointment};
use chrono::{NaiveDate, Utc};
use eyre::Result;
use parish_core::{
    errors::{ParishError, ParishResult},
    models::appointment::{AppointmentStatus, CreateAppointmentRequest},
};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const APPOINTMENT_COLUMNS: &str = "id, user_id, first_name, last_name, email, phone, date, \
     time_slot, notes, status, reason, created_at";

fn slot_taken() -> ParishError {
    ParishError::Conflict("Time slot already booked".to_string())
}

/// Books `time_slot` on `date`. The slot must already be normalised to `HH:00`.
///
/// The partial unique index on (date, time_slot) is the final arbiter, so a
/// concurrent booking of the same slot surfaces as a conflict.
pub async fn create_appointment(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    request: &CreateAppointmentRequest,
    time_slot: &str,
) -> ParishResult<DbAppointment> {
    let taken = taken_slots(pool, request.date).await?;
    if taken.iter().any(|slot| slot == time_slot) {
        return Err(slot_taken());
    }

    let notes = request
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        INSERT INTO appointments (id, user_id, first_name, last_name, email, phone, date,
                                  time_slot, notes, status, reason, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending', NULL, $10)
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(request.first_name.trim())
    .bind(request.last_name.trim())
    .bind(request.email.trim().to_lowercase())
    .bind(request.phone.trim())
    .bind(request.date)
    .bind(time_slot)
    .bind(notes)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            slot_taken()
        } else {
            db_error(e)
        }
    })?;

    tracing::info!(
        "Appointment {} booked for {} at {}",
        appointment.id,
        appointment.date,
        appointment.time_slot
    );
    Ok(appointment)
}

/// Time slots on `date` held by a non-cancelled appointment.
pub async fn taken_slots(pool: &Pool<Postgres>, date: NaiveDate) -> ParishResult<Vec<String>> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT time_slot
        FROM appointments
        WHERE date = $1 AND status <> 'cancelled'
        ORDER BY time_slot
        "#,
    )
    .bind(date)
    .fetch_all(pool)
    .await
    .map_err(db_error)
}

pub async fn get_appointment(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

pub async fn list_user_appointments(
    pool: &Pool<Postgres>,
    user_id: Uuid,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {APPOINTMENT_COLUMNS}
        FROM appointments
        WHERE user_id = $1
        ORDER BY date DESC, time_slot DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

pub async fn list_all_appointments(pool: &Pool<Postgres>) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {APPOINTMENT_COLUMNS}
        FROM appointments
        ORDER BY date ASC, time_slot ASC
        "#
    ))
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

/// Sets status and admin reason. Un-cancelling an appointment whose slot has
/// since been taken is a conflict.
pub async fn update_appointment_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    status: AppointmentStatus,
    reason: Option<&str>,
) -> ParishResult<Option<DbAppointment>> {
    sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        UPDATE appointments
        SET status = $2, reason = $3
        WHERE id = $1
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(status.as_str())
    .bind(reason.map(str::trim).filter(|r| !r.is_empty()))
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            slot_taken()
        } else {
            db_error(e)
        }
    })
}

/// Marks an appointment cancelled, which frees its slot.
pub async fn cancel_appointment(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        UPDATE appointments
        SET status = 'cancelled'
        WHERE id = $1
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    if let Some(appointment) = &appointment {
        tracing::info!(
            "Appointment {} cancelled, {} {} is free again",
            appointment.id,
            appointment.date,
            appointment.time_slot
        );
    }

    Ok(appointment)
}
