use async_trait::async_trait;
use eventsched_core::{
    errors::{SchedulingError, SchedulingResult},
    models::{event::Event, invitation::Invitation, schedule::Schedule},
    repository::EventRepository,
};
use eyre::{WrapErr, eyre};
use sqlx::PgConnection;
use tracing::{debug, error};

use crate::DbPool;
use crate::models::{DbEvent, DbInvitation, DbSchedule};

/// PostgreSQL storage of event aggregates.
///
/// Every write runs in a single `sqlx::Transaction`. The transaction is
/// only committed on the success path; on any early return the value is
/// dropped and the driver rolls it back. The same holds when the calling
/// future is cancelled mid-flight.
#[derive(Clone)]
pub struct PgEventRepository {
    pool: DbPool,
}

impl PgEventRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn store_aggregate(&self, event: &Event) -> SchedulingResult<()> {
        let mut tx = self.pool.begin().await.wrap_err("failed to begin transaction")?;

        insert_event(&mut tx, &DbEvent::from_event(event)).await?;

        for schedule in &event.schedules {
            insert_schedule(&mut tx, &DbSchedule::from_schedule(&event.id, schedule)).await?;
        }

        for invitation in &event.invitations {
            insert_invitation(&mut tx, &DbInvitation::from_invitation(&event.id, invitation))
                .await?;
        }

        tx.commit().await.wrap_err("failed to commit event")?;
        Ok(())
    }

    async fn update_aggregate(&self, event: &Event) -> SchedulingResult<()> {
        let mut tx = self.pool.begin().await.wrap_err("failed to begin transaction")?;

        let updated = sqlx::query(
            r#"
            UPDATE event
            SET title = $2, description = $3, timezone = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(&event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.timezone)
        .bind(event.updated_at)
        .execute(&mut *tx)
        .await
        .wrap_err("failed to update event")?;

        if updated.rows_affected() == 0 {
            return Err(SchedulingError::NotFound(format!("event {}", event.id)));
        }

        remove_stale_schedules(&mut tx, &event.id, &event.schedules).await?;
        remove_stale_invitations(&mut tx, &event.id, &event.invitations).await?;

        for schedule in &event.schedules {
            upsert_schedule(&mut tx, &DbSchedule::from_schedule(&event.id, schedule)).await?;
        }

        for invitation in &event.invitations {
            upsert_invitation(&mut tx, &DbInvitation::from_invitation(&event.id, invitation))
                .await?;
        }

        tx.commit().await.wrap_err("failed to commit event update")?;
        Ok(())
    }

    async fn delete_aggregate(&self, id: &str) -> SchedulingResult<()> {
        let mut tx = self.pool.begin().await.wrap_err("failed to begin transaction")?;

        sqlx::query("DELETE FROM invitation WHERE event_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .wrap_err("failed to delete invitations")?;

        sqlx::query("DELETE FROM schedule WHERE event_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .wrap_err("failed to delete schedules")?;

        let deleted = sqlx::query("DELETE FROM event WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .wrap_err("failed to delete event")?;

        if deleted.rows_affected() == 0 {
            return Err(SchedulingError::NotFound(format!("event {id}")));
        }

        tx.commit().await.wrap_err("failed to commit event deletion")?;
        Ok(())
    }

    async fn load_aggregate(&self, id: &str) -> SchedulingResult<Event> {
        let mut tx = self.pool.begin().await.wrap_err("failed to begin transaction")?;

        let event = sqlx::query_as::<_, DbEvent>(
            r#"
            SELECT id, title, description, timezone, created_by, created_at, updated_at
            FROM event
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .wrap_err("failed to load event")?
        .ok_or_else(|| SchedulingError::NotFound(format!("event {id}")))?;

        let schedules = sqlx::query_as::<_, DbSchedule>(
            r#"
            SELECT id, event_id, start_time, duration, is_full_day, recurring_type, recurring_interval
            FROM schedule
            WHERE event_id = $1
            ORDER BY start_time ASC, id ASC
            "#,
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await
        .wrap_err("failed to load schedules")?;

        let invitations = sqlx::query_as::<_, DbInvitation>(
            r#"
            SELECT id, event_id, user_id, token, status
            FROM invitation
            WHERE event_id = $1
            ORDER BY user_id ASC, id ASC
            "#,
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await
        .wrap_err("failed to load invitations")?;

        tx.commit().await.wrap_err("failed to finish read transaction")?;

        debug!(
            event_id = %id,
            schedules = schedules.len(),
            invitations = invitations.len(),
            "event loaded"
        );
        Ok(event.into_event(schedules, invitations)?)
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn store(&self, event: &Event) -> SchedulingResult<()> {
        debug!(event_id = %event.id, "storing event");
        self.store_aggregate(event)
            .await
            .inspect_err(|e| error!(event_id = %event.id, error = %e, "failed to store event"))
    }

    async fn update(&self, event: &Event) -> SchedulingResult<()> {
        debug!(event_id = %event.id, "updating event");
        self.update_aggregate(event)
            .await
            .inspect_err(|e| error!(event_id = %event.id, error = %e, "failed to update event"))
    }

    async fn delete_by_id(&self, id: &str) -> SchedulingResult<()> {
        debug!(event_id = %id, "deleting event");
        self.delete_aggregate(id)
            .await
            .inspect_err(|e| error!(event_id = %id, error = %e, "failed to delete event"))
    }

    async fn find_by_id(&self, id: &str) -> SchedulingResult<Event> {
        self.load_aggregate(id)
            .await
            .inspect_err(|e| error!(event_id = %id, error = %e, "failed to find event"))
    }
}

async fn insert_event(conn: &mut PgConnection, row: &DbEvent) -> SchedulingResult<()> {
    sqlx::query(
        r#"
        INSERT INTO event (id, title, description, timezone, created_by, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(&row.id)
    .bind(&row.title)
    .bind(&row.description)
    .bind(&row.timezone)
    .bind(&row.created_by)
    .bind(row.created_at)
    .bind(row.updated_at)
    .execute(conn)
    .await
    .wrap_err("failed to insert event")?;

    Ok(())
}

async fn insert_schedule(conn: &mut PgConnection, row: &DbSchedule) -> SchedulingResult<()> {
    sqlx::query(
        r#"
        INSERT INTO schedule (id, event_id, start_time, duration, is_full_day, recurring_type, recurring_interval)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(&row.id)
    .bind(&row.event_id)
    .bind(row.start_time)
    .bind(row.duration)
    .bind(row.is_full_day)
    .bind(&row.recurring_type)
    .bind(row.recurring_interval)
    .execute(conn)
    .await
    .wrap_err_with(|| format!("failed to insert schedule {}", row.id))?;

    Ok(())
}

async fn insert_invitation(conn: &mut PgConnection, row: &DbInvitation) -> SchedulingResult<()> {
    sqlx::query(
        r#"
        INSERT INTO invitation (id, event_id, user_id, token, status)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(&row.id)
    .bind(&row.event_id)
    .bind(&row.user_id)
    .bind(&row.token)
    .bind(row.status)
    .execute(conn)
    .await
    .wrap_err_with(|| format!("failed to insert invitation {}", row.id))?;

    Ok(())
}

// A row owned by another event fails the WHERE clause and is reported as an
// error so the whole write rolls back.
async fn upsert_schedule(conn: &mut PgConnection, row: &DbSchedule) -> SchedulingResult<()> {
    let result = sqlx::query(
        r#"
        INSERT INTO schedule (id, event_id, start_time, duration, is_full_day, recurring_type, recurring_interval)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (id) DO UPDATE
        SET start_time = EXCLUDED.start_time,
            duration = EXCLUDED.duration,
            is_full_day = EXCLUDED.is_full_day,
            recurring_type = EXCLUDED.recurring_type,
            recurring_interval = EXCLUDED.recurring_interval
        WHERE schedule.event_id = EXCLUDED.event_id
        "#,
    )
    .bind(&row.id)
    .bind(&row.event_id)
    .bind(row.start_time)
    .bind(row.duration)
    .bind(row.is_full_day)
    .bind(&row.recurring_type)
    .bind(row.recurring_interval)
    .execute(conn)
    .await
    .wrap_err_with(|| format!("failed to upsert schedule {}", row.id))?;

    if result.rows_affected() == 0 {
        return Err(SchedulingError::Storage(eyre!(
            "schedule {} is not owned by event {}",
            row.id,
            row.event_id
        )));
    }

    Ok(())
}

async fn upsert_invitation(conn: &mut PgConnection, row: &DbInvitation) -> SchedulingResult<()> {
    let result = sqlx::query(
        r#"
        INSERT INTO invitation (id, event_id, user_id, token, status)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (id) DO UPDATE
        SET user_id = EXCLUDED.user_id,
            token = EXCLUDED.token,
            status = EXCLUDED.status
        WHERE invitation.event_id = EXCLUDED.event_id
        "#,
    )
    .bind(&row.id)
    .bind(&row.event_id)
    .bind(&row.user_id)
    .bind(&row.token)
    .bind(row.status)
    .execute(conn)
    .await
    .wrap_err_with(|| format!("failed to upsert invitation {}", row.id))?;

    if result.rows_affected() == 0 {
        return Err(SchedulingError::Storage(eyre!(
            "invitation {} is not owned by event {}",
            row.id,
            row.event_id
        )));
    }

    Ok(())
}

async fn remove_stale_schedules(
    conn: &mut PgConnection,
    event_id: &str,
    keep: &[Schedule],
) -> SchedulingResult<()> {
    let keep_ids: Vec<String> = keep.iter().map(|s| s.id.clone()).collect();

    let removed = sqlx::query("DELETE FROM schedule WHERE event_id = $1 AND NOT (id = ANY($2))")
        .bind(event_id)
        .bind(&keep_ids)
        .execute(conn)
        .await
        .wrap_err("failed to remove stale schedules")?;

    debug!(event_id, removed = removed.rows_affected(), "stale schedules removed");
    Ok(())
}

async fn remove_stale_invitations(
    conn: &mut PgConnection,
    event_id: &str,
    keep: &[Invitation],
) -> SchedulingResult<()> {
    let keep_ids: Vec<String> = keep.iter().map(|i| i.id.clone()).collect();

    let removed =
        sqlx::query("DELETE FROM invitation WHERE event_id = $1 AND NOT (id = ANY($2))")
            .bind(event_id)
            .bind(&keep_ids)
            .execute(conn)
            .await
            .wrap_err("failed to remove stale invitations")?;

    debug!(event_id, removed = removed.rows_affected(), "stale invitations removed");
    Ok(())
}
