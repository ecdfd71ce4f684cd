use crate::{
    db_error,
    models::{non_negative, DbMass, DbMassWithCounts},
};
use chrono::{DateTime, Utc};
use eyre::Result;
use parish_core::{
    errors::{ParishError, ParishResult},
    models::mass::UpdateMassRequest,
    slots::{validate_capacity_edit, SlotPool},
};
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

const MASS_COLUMNS: &str = "id, title, scheduled_at, location, intention_capacity, \
     thanksgiving_capacity, livestream_url, status, created_at";

/// Mass columns plus active booking counts per pool. Rejected bookings do not
/// hold a slot and are excluded.
const MASS_WITH_COUNTS: &str = r#"
    SELECT m.id, m.title, m.scheduled_at, m.location, m.intention_capacity,
           m.thanksgiving_capacity, m.livestream_url, m.status, m.created_at,
           COUNT(b.id) FILTER (WHERE b.pool = 'intention' AND b.status <> 'rejected') AS booked_intentions,
           COUNT(b.id) FILTER (WHERE b.pool = 'thanksgiving' AND b.status <> 'rejected') AS booked_thanksgivings
    FROM masses m
    LEFT JOIN bookings b ON b.mass_id = m.id
"#;

fn to_column(pool: SlotPool, capacity: u32) -> ParishResult<i32> {
    i32::try_from(capacity).map_err(|_| {
        ParishError::Validation(format!("{} slots value is too large", pool.label()))
    })
}

pub async fn create_mass(
    pool: &Pool<Postgres>,
    title: &str,
    scheduled_at: DateTime<Utc>,
    location: &str,
    intention_capacity: u32,
    thanksgiving_capacity: u32,
) -> ParishResult<DbMass> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let mass = sqlx::query_as::<_, DbMass>(&format!(
        r#"
        INSERT INTO masses (id, title, scheduled_at, location, intention_capacity,
                            thanksgiving_capacity, livestream_url, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, NULL, 'available', $7)
        RETURNING {MASS_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(title.trim())
    .bind(scheduled_at)
    .bind(location)
    .bind(to_column(SlotPool::Intention, intention_capacity)?)
    .bind(to_column(SlotPool::Thanksgiving, thanksgiving_capacity)?)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(db_error)?;

    tracing::info!("Created mass {} scheduled at {}", mass.id, mass.scheduled_at);
    Ok(mass)
}

pub async fn get_mass_with_counts(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbMassWithCounts>> {
    let mass = sqlx::query_as::<_, DbMassWithCounts>(&format!(
        "{MASS_WITH_COUNTS} WHERE m.id = $1 GROUP BY m.id"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(mass)
}

/// Masses scheduled at or after `from`, soonest first.
pub async fn list_masses_from(
    pool: &Pool<Postgres>,
    from: DateTime<Utc>,
) -> Result<Vec<DbMassWithCounts>> {
    let masses = sqlx::query_as::<_, DbMassWithCounts>(&format!(
        "{MASS_WITH_COUNTS} WHERE m.scheduled_at >= $1 GROUP BY m.id ORDER BY m.scheduled_at ASC"
    ))
    .bind(from)
    .fetch_all(pool)
    .await?;

    Ok(masses)
}

/// Masses scheduled at or after `since`, newest first. Used by the
/// livestream page.
pub async fn list_masses_since_desc(
    pool: &Pool<Postgres>,
    since: DateTime<Utc>,
) -> Result<Vec<DbMass>> {
    let masses = sqlx::query_as::<_, DbMass>(&format!(
        r#"
        SELECT {MASS_COLUMNS}
        FROM masses
        WHERE scheduled_at >= $1
        ORDER BY scheduled_at DESC
        "#
    ))
    .bind(since)
    .fetch_all(pool)
    .await?;

    Ok(masses)
}

/// Locks the Mass row for the rest of the transaction.
///
/// Every operation that consumes slots or changes capacity takes this lock
/// first, which serialises them per Mass.
pub(crate) async fn lock_mass(conn: &mut PgConnection, id: Uuid) -> ParishResult<Option<DbMass>> {
    sqlx::query_as::<_, DbMass>(&format!(
        "SELECT {MASS_COLUMNS} FROM masses WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(db_error)
}

/// Active (non-rejected) bookings per pool as `(intentions, thanksgivings)`.
pub(crate) async fn count_active_bookings(
    conn: &mut PgConnection,
    mass_id: Uuid,
) -> ParishResult<(u32, u32)> {
    let (intentions, thanksgivings) = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT COUNT(*) FILTER (WHERE pool = 'intention'),
               COUNT(*) FILTER (WHERE pool = 'thanksgiving')
        FROM bookings
        WHERE mass_id = $1 AND status <> 'rejected'
        "#,
    )
    .bind(mass_id)
    .fetch_one(conn)
    .await
    .map_err(db_error)?;

    Ok((non_negative(intentions), non_negative(thanksgivings)))
}

/// Applies a partial update. New capacities are checked against the active
/// bookings while the Mass row is locked.
pub async fn update_mass(
    pool: &Pool<Postgres>,
    id: Uuid,
    request: &UpdateMassRequest,
) -> ParishResult<DbMass> {
    let mut tx = pool.begin().await.map_err(db_error)?;

    let current = lock_mass(&mut *tx, id)
        .await?
        .ok_or_else(|| ParishError::NotFound(format!("Mass with ID {} not found", id)))?;
    let (booked_intentions, booked_thanksgivings) = count_active_bookings(&mut *tx, id).await?;

    let intention_capacity = match request.intention_slots {
        Some(slots) => to_column(
            SlotPool::Intention,
            validate_capacity_edit(SlotPool::Intention, slots, booked_intentions)?,
        )?,
        None => current.intention_capacity,
    };
    let thanksgiving_capacity = match request.thanksgiving_slots {
        Some(slots) => to_column(
            SlotPool::Thanksgiving,
            validate_capacity_edit(SlotPool::Thanksgiving, slots, booked_thanksgivings)?,
        )?,
        None => current.thanksgiving_capacity,
    };

    let location = request
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty());

    let mass = sqlx::query_as::<_, DbMass>(&format!(
        r#"
        UPDATE masses
        SET title = COALESCE($2, title),
            scheduled_at = COALESCE($3, scheduled_at),
            location = COALESCE($4, location),
            intention_capacity = $5,
            thanksgiving_capacity = $6,
            status = COALESCE($7, status)
        WHERE id = $1
        RETURNING {MASS_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(request.title.as_deref().map(str::trim))
    .bind(request.scheduled_at)
    .bind(location)
    .bind(intention_capacity)
    .bind(thanksgiving_capacity)
    .bind(request.status.map(|s| s.as_str()))
    .fetch_one(&mut *tx)
    .await
    .map_err(db_error)?;

    tx.commit().await.map_err(db_error)?;

    tracing::info!(
        "Updated mass {}: intention capacity {}, thanksgiving capacity {}",
        id,
        intention_capacity,
        thanksgiving_capacity
    );
    Ok(mass)
}

pub async fn set_livestream_url(
    pool: &Pool<Postgres>,
    id: Uuid,
    url: &str,
) -> Result<Option<DbMass>> {
    let mass = sqlx::query_as::<_, DbMass>(&format!(
        r#"
        UPDATE masses
        SET livestream_url = $2
        WHERE id = $1
        RETURNING {MASS_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(url)
    .fetch_optional(pool)
    .await?;

    Ok(mass)
}

/// Deletes a Mass and, through the foreign key, its bookings.
pub async fn delete_mass(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM masses WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
