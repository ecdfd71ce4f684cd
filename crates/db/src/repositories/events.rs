use crate::models::DbEvent;
use chrono::{DateTime, Utc};
use eyre::Result;
use parish_core::models::event::{CreateEventRequest, UpdateEventRequest};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const EVENT_COLUMNS: &str = "id, title, description, date, location, created_at";

pub async fn create_event(pool: &Pool<Postgres>, request: &CreateEventRequest) -> Result<DbEvent> {
    let event = sqlx::query_as::<_, DbEvent>(&format!(
        r#"
        INSERT INTO events (id, title, description, date, location, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {EVENT_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(request.title.trim())
    .bind(request.description.as_deref())
    .bind(request.date)
    .bind(request.location.as_deref())
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    tracing::info!("Created event {} on {}", event.id, event.date);
    Ok(event)
}

pub async fn get_event(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbEvent>> {
    let event = sqlx::query_as::<_, DbEvent>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(event)
}

/// Events on or after `from`, soonest first. `None` means no limit.
pub async fn list_upcoming_events(
    pool: &Pool<Postgres>,
    from: DateTime<Utc>,
    limit: Option<i64>,
) -> Result<Vec<DbEvent>> {
    let events = sqlx::query_as::<_, DbEvent>(&format!(
        r#"
        SELECT {EVENT_COLUMNS}
        FROM events
        WHERE date >= $1
        ORDER BY date ASC
        LIMIT $2
        "#
    ))
    .bind(from)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(events)
}

pub async fn update_event(
    pool: &Pool<Postgres>,
    id: Uuid,
    request: &UpdateEventRequest,
) -> Result<Option<DbEvent>> {
    let event = sqlx::query_as::<_, DbEvent>(&format!(
        r#"
        UPDATE events
        SET title = COALESCE($2, title),
            description = COALESCE($3, description),
            date = COALESCE($4, date),
            location = COALESCE($5, location)
        WHERE id = $1
        RETURNING {EVENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(request.title.as_deref().map(str::trim))
    .bind(request.description.as_deref())
    .bind(request.date)
    .bind(request.location.as_deref())
    .fetch_optional(pool)
    .await?;

    Ok(event)
}

pub async fn delete_event(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
