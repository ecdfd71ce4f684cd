use crate::models::DbChurchInfo;
use chrono::Utc;
use eyre::Result;
use parish_core::models::church::UpdateChurchInfoRequest;
use sqlx::{Pool, Postgres};

const CHURCH_COLUMNS: &str = "name, address, phone, email, mission, vision, history, updated_at";

fn blank_to_none(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub async fn get_church_info(pool: &Pool<Postgres>) -> Result<Option<DbChurchInfo>> {
    let info = sqlx::query_as::<_, DbChurchInfo>(&format!(
        "SELECT {CHURCH_COLUMNS} FROM church_info WHERE id = 1"
    ))
    .fetch_optional(pool)
    .await?;

    Ok(info)
}

/// Saves the parish details, creating the row on first save.
pub async fn save_church_info(
    pool: &Pool<Postgres>,
    request: &UpdateChurchInfoRequest,
) -> Result<DbChurchInfo> {
    let info = sqlx::query_as::<_, DbChurchInfo>(&format!(
        r#"
        INSERT INTO church_info (id, name, address, phone, email, mission, vision, history, updated_at)
        VALUES (1, $1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (id) DO UPDATE
        SET name = EXCLUDED.name,
            address = EXCLUDED.address,
            phone = EXCLUDED.phone,
            email = EXCLUDED.email,
            mission = EXCLUDED.mission,
            vision = EXCLUDED.vision,
            history = EXCLUDED.history,
            updated_at = EXCLUDED.updated_at
        RETURNING {CHURCH_COLUMNS}
        "#
    ))
    .bind(request.name.trim())
    .bind(request.address.trim())
    .bind(blank_to_none(request.phone.as_deref()))
    .bind(blank_to_none(request.email.as_deref()).map(str::to_lowercase))
    .bind(blank_to_none(request.mission.as_deref()))
    .bind(blank_to_none(request.vision.as_deref()))
    .bind(blank_to_none(request.history.as_deref()))
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    tracing::info!("Church information updated");
    Ok(info)
}
