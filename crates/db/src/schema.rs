use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL UNIQUE,
            phone VARCHAR(64) NULL,
            password_hash VARCHAR(255) NOT NULL,
            role VARCHAR(32) NOT NULL DEFAULT 'parishioner'
                CHECK (role IN ('parishioner', 'admin', 'superadmin')),
            is_blocked BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create sessions table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token VARCHAR(128) PRIMARY KEY,
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create masses table. Availability is derived from bookings, never stored.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS masses (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            title VARCHAR(255) NOT NULL,
            scheduled_at TIMESTAMP WITH TIME ZONE NOT NULL,
            location VARCHAR(255) NOT NULL,
            intention_capacity INTEGER NOT NULL CHECK (intention_capacity >= 0),
            thanksgiving_capacity INTEGER NOT NULL CHECK (thanksgiving_capacity >= 0),
            livestream_url TEXT NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'available'
                CHECK (status IN ('available', 'closed')),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create bookings table (Mass intentions and thanksgivings)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            mass_id UUID NOT NULL REFERENCES masses(id) ON DELETE CASCADE,
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            pool VARCHAR(32) NOT NULL CHECK (pool IN ('intention', 'thanksgiving')),
            name VARCHAR(255) NULL,
            details TEXT NOT NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'pending'
                CHECK (status IN ('pending', 'approved', 'rejected')),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create appointments table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            first_name VARCHAR(255) NOT NULL,
            last_name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            phone VARCHAR(64) NOT NULL,
            date DATE NOT NULL,
            time_slot VARCHAR(5) NOT NULL,
            notes TEXT NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'pending'
                CHECK (status IN ('pending', 'approved', 'rejected', 'cancelled')),
            reason TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create events table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            title VARCHAR(255) NOT NULL,
            description TEXT NULL,
            date TIMESTAMP WITH TIME ZONE NOT NULL,
            location VARCHAR(255) NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create fundraising_goals table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS fundraising_goals (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            title VARCHAR(255) NOT NULL,
            description TEXT NULL,
            target_amount BIGINT NOT NULL CHECK (target_amount > 0),
            end_date DATE NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create payments table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS payments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            goal_id UUID NULL REFERENCES fundraising_goals(id) ON DELETE SET NULL,
            amount BIGINT NOT NULL CHECK (amount > 0),
            payment_type VARCHAR(32) NOT NULL CHECK (payment_type IN ('donation', 'offering')),
            category VARCHAR(255) NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'unpaid'
                CHECK (status IN ('paid', 'unpaid', 'failed')),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create church_info table, a single row keyed by id = 1
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS church_info (
            id SMALLINT PRIMARY KEY DEFAULT 1 CHECK (id = 1),
            name VARCHAR(255) NOT NULL,
            address TEXT NOT NULL,
            phone VARCHAR(64) NULL,
            email VARCHAR(255) NULL,
            mission TEXT NULL,
            vision TEXT NULL,
            history TEXT NULL,
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    let indexes = [
        // At most one live appointment per (date, time slot)
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_appointments_active_slot ON appointments(date, time_slot) WHERE status <> 'cancelled'",
        "CREATE INDEX IF NOT EXISTS idx_appointments_user_id ON appointments(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_masses_scheduled_at ON masses(scheduled_at)",
        "CREATE INDEX IF NOT EXISTS idx_bookings_mass_pool ON bookings(mass_id, pool)",
        "CREATE INDEX IF NOT EXISTS idx_bookings_user_id ON bookings(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_bookings_pool_status ON bookings(pool, status)",
        "CREATE INDEX IF NOT EXISTS idx_events_date ON events(date)",
        "CREATE INDEX IF NOT EXISTS idx_payments_user_id ON payments(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_payments_goal_id ON payments(goal_id)",
    ];
    for statement in indexes {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
