use eyre::{Result, WrapErr};
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create event table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS event (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            timezone TEXT NOT NULL,
            created_by TEXT NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NULL
        );
        "#,
    )
    .execute(pool)
    .await
    .wrap_err("failed to create event table")?;

    // Start times are UTC epoch seconds; the zone lives on the event
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schedule (
            id TEXT PRIMARY KEY,
            event_id TEXT NOT NULL REFERENCES event(id) ON DELETE CASCADE,
            start_time BIGINT NOT NULL,
            duration BIGINT NOT NULL,
            is_full_day BOOLEAN NOT NULL DEFAULT FALSE,
            recurring_type TEXT NOT NULL DEFAULT 'NONE',
            recurring_interval BIGINT NOT NULL DEFAULT 0,
            CONSTRAINT positive_duration CHECK (duration > 0)
        );
        "#,
    )
    .execute(pool)
    .await
    .wrap_err("failed to create schedule table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS invitation (
            id TEXT PRIMARY KEY,
            event_id TEXT NOT NULL REFERENCES event(id) ON DELETE CASCADE,
            user_id TEXT NOT NULL,
            token TEXT NOT NULL,
            status SMALLINT NOT NULL DEFAULT 0
        );
        "#,
    )
    .execute(pool)
    .await
    .wrap_err("failed to create invitation table")?;

    // Create indexes
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_schedule_event_id ON schedule(event_id)",
        "CREATE INDEX IF NOT EXISTS idx_invitation_event_id ON invitation(event_id)",
        "CREATE INDEX IF NOT EXISTS idx_invitation_token ON invitation(token)",
    ] {
        sqlx::query(statement)
            .execute(pool)
            .await
            .wrap_err_with(|| format!("failed to run {statement:?}"))?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
