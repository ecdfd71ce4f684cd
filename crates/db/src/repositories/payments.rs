use crate::models::{DbGoal, DbGoalWithRaised, DbPayment};
use chrono::Utc;
use eyre::Result;
use parish_core::models::payment::{
    CreateGoalRequest, CreatePaymentRequest, PaymentStatus, UpdateGoalRequest,
};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const GOAL_COLUMNS: &str = "id, title, description, target_amount, end_date, created_at";

const PAYMENT_COLUMNS: &str =
    "id, user_id, goal_id, amount, payment_type, category, status, created_at";

/// Goals with the sum of their paid donations.
const GOAL_WITH_RAISED: &str = r#"
    SELECT g.id, g.title, g.description, g.target_amount, g.end_date, g.created_at,
           LEAST(COALESCE(SUM(p.amount) FILTER (WHERE p.status = 'paid' AND p.payment_type = 'donation'), 0), 9223372036854775807)::BIGINT AS raised
    FROM fundraising_goals g
    LEFT JOIN payments p ON p.goal_id = g.id
"#;

// Fundraising Goal Repository

pub async fn create_goal(pool: &Pool<Postgres>, request: &CreateGoalRequest) -> Result<DbGoal> {
    let goal = sqlx::query_as::<_, DbGoal>(&format!(
        r#"
        INSERT INTO fundraising_goals (id, title, description, target_amount, end_date, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {GOAL_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(request.title.trim())
    .bind(request.description.as_deref())
    .bind(request.target_amount)
    .bind(request.end_date)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    tracing::info!("Created fundraising goal {} ({})", goal.id, goal.title);
    Ok(goal)
}

pub async fn get_goal_with_raised(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbGoalWithRaised>> {
    let goal = sqlx::query_as::<_, DbGoalWithRaised>(&format!(
        "{GOAL_WITH_RAISED} WHERE g.id = $1 GROUP BY g.id"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(goal)
}

pub async fn list_goals_with_raised(pool: &Pool<Postgres>) -> Result<Vec<DbGoalWithRaised>> {
    let goals = sqlx::query_as::<_, DbGoalWithRaised>(&format!(
        "{GOAL_WITH_RAISED} GROUP BY g.id ORDER BY g.created_at DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(goals)
}

pub async fn update_goal(
    pool: &Pool<Postgres>,
    id: Uuid,
    request: &UpdateGoalRequest,
) -> Result<Option<DbGoal>> {
    let goal = sqlx::query_as::<_, DbGoal>(&format!(
        r#"
        UPDATE fundraising_goals
        SET title = COALESCE($2, title),
            description = COALESCE($3, description),
            target_amount = COALESCE($4, target_amount),
            end_date = COALESCE($5, end_date)
        WHERE id = $1
        RETURNING {GOAL_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(request.title.as_deref().map(str::trim))
    .bind(request.description.as_deref())
    .bind(request.target_amount)
    .bind(request.end_date)
    .fetch_optional(pool)
    .await?;

    Ok(goal)
}

// Payment Repository

/// Records a payment as `unpaid`; settlement happens out of band.
pub async fn create_payment(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    request: &CreatePaymentRequest,
) -> Result<DbPayment> {
    let category = request
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let payment = sqlx::query_as::<_, DbPayment>(&format!(
        r#"
        INSERT INTO payments (id, user_id, goal_id, amount, payment_type, category, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, 'unpaid', $7)
        RETURNING {PAYMENT_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(request.goal_id)
    .bind(request.amount)
    .bind(request.payment_type.as_str())
    .bind(category)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    tracing::info!(
        "Recorded {} {} of {} for user {}",
        request.payment_type,
        payment.id,
        payment.amount,
        user_id
    );
    Ok(payment)
}

/// A user's payments, newest first. `None` means no limit.
pub async fn list_user_payments(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    limit: Option<i64>,
) -> Result<Vec<DbPayment>> {
    let payments = sqlx::query_as::<_, DbPayment>(&format!(
        r#"
        SELECT {PAYMENT_COLUMNS}
        FROM payments
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2
        "#
    ))
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(payments)
}

/// Every payment, for the admin summary.
pub async fn list_all_payments(pool: &Pool<Postgres>) -> Result<Vec<DbPayment>> {
    let payments = sqlx::query_as::<_, DbPayment>(&format!(
        "SELECT {PAYMENT_COLUMNS} FROM payments ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(payments)
}

pub async fn list_payments_page(
    pool: &Pool<Postgres>,
    offset: i64,
    limit: i64,
) -> Result<Vec<DbPayment>> {
    let payments = sqlx::query_as::<_, DbPayment>(&format!(
        r#"
        SELECT {PAYMENT_COLUMNS}
        FROM payments
        ORDER BY created_at DESC
        OFFSET $1
        LIMIT $2
        "#
    ))
    .bind(offset)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(payments)
}

pub async fn count_payments(pool: &Pool<Postgres>) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM payments")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

pub async fn update_payment_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    status: PaymentStatus,
) -> Result<Option<DbPayment>> {
    let payment = sqlx::query_as::<_, DbPayment>(&format!(
        r#"
        UPDATE payments
        SET status = $2
        WHERE id = $1
        RETURNING {PAYMENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(status.as_str())
    .fetch_optional(pool)
    .await?;

    if let Some(payment) = &payment {
        tracing::info!("Payment {} marked {}", payment.id, status);
    }

    Ok(payment)
}
