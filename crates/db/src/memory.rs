//! In-memory event storage for development and testing.
//!
//! Mirrors the relational layout (one map per table, primary keys unique,
//! children referencing an existing event) and the all-or-nothing write
//! behavior of [`PgEventRepository`](crate::PgEventRepository): each write
//! is applied to a staged copy of the tables that replaces the live copy
//! only once every row change has succeeded.

use std::collections::HashMap;

use async_trait::async_trait;
use eventsched_core::{
    errors::{SchedulingError, SchedulingResult},
    models::event::Event,
    repository::EventRepository,
};
use eyre::eyre;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{DbEvent, DbInvitation, DbSchedule};

#[derive(Debug, Clone, Default)]
struct Tables {
    events: HashMap<String, DbEvent>,
    schedules: HashMap<String, DbSchedule>,
    invitations: HashMap<String, DbInvitation>,
}

impl Tables {
    fn insert_event(&mut self, row: DbEvent) -> SchedulingResult<()> {
        if self.events.contains_key(&row.id) {
            return Err(duplicate_key("event", &row.id));
        }
        self.events.insert(row.id.clone(), row);
        Ok(())
    }

    fn insert_schedule(&mut self, row: DbSchedule) -> SchedulingResult<()> {
        self.check_parent("schedule", &row.event_id)?;
        if self.schedules.contains_key(&row.id) {
            return Err(duplicate_key("schedule", &row.id));
        }
        check_duration(&row)?;
        self.schedules.insert(row.id.clone(), row);
        Ok(())
    }

    fn insert_invitation(&mut self, row: DbInvitation) -> SchedulingResult<()> {
        self.check_parent("invitation", &row.event_id)?;
        if self.invitations.contains_key(&row.id) {
            return Err(duplicate_key("invitation", &row.id));
        }
        self.invitations.insert(row.id.clone(), row);
        Ok(())
    }

    fn upsert_schedule(&mut self, row: DbSchedule) -> SchedulingResult<()> {
        match self.schedules.get_mut(&row.id) {
            Some(existing) if existing.event_id == row.event_id => {
                check_duration(&row)?;
                *existing = row;
                Ok(())
            }
            Some(_) => Err(foreign_child("schedule", &row.id, &row.event_id)),
            None => self.insert_schedule(row),
        }
    }

    fn upsert_invitation(&mut self, row: DbInvitation) -> SchedulingResult<()> {
        match self.invitations.get_mut(&row.id) {
            Some(existing) if existing.event_id == row.event_id => {
                *existing = row;
                Ok(())
            }
            Some(_) => Err(foreign_child("invitation", &row.id, &row.event_id)),
            None => self.insert_invitation(row),
        }
    }

    fn check_parent(&self, table: &str, event_id: &str) -> SchedulingResult<()> {
        if self.events.contains_key(event_id) {
            Ok(())
        } else {
            Err(SchedulingError::Storage(eyre!(
                "{table} references missing event {event_id}"
            )))
        }
    }
}

fn check_duration(row: &DbSchedule) -> SchedulingResult<()> {
    if row.duration > 0 {
        Ok(())
    } else {
        Err(SchedulingError::Storage(eyre!(
            "schedule {} violates check constraint positive_duration",
            row.id
        )))
    }
}

fn foreign_child(table: &str, id: &str, event_id: &str) -> SchedulingError {
    SchedulingError::Storage(eyre!("{table} {id} is not owned by event {event_id}"))
}

fn duplicate_key(table: &str, id: &str) -> SchedulingError {
    SchedulingError::Storage(eyre!("duplicate key {id:?} in {table}"))
}

#[derive(Debug, Default)]
pub struct MemoryEventRepository {
    tables: RwLock<Tables>,
}

impl MemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row counts of (event, schedule, invitation).
    pub async fn row_counts(&self) -> (usize, usize, usize) {
        let tables = self.tables.read().await;
        (
            tables.events.len(),
            tables.schedules.len(),
            tables.invitations.len(),
        )
    }

    pub async fn child_rows_of(&self, event_id: &str) -> (usize, usize) {
        let tables = self.tables.read().await;
        (
            tables.schedules.values().filter(|s| s.event_id == event_id).count(),
            tables.invitations.values().filter(|i| i.event_id == event_id).count(),
        )
    }
}

#[async_trait]
impl EventRepository for MemoryEventRepository {
    async fn store(&self, event: &Event) -> SchedulingResult<()> {
        let mut tables = self.tables.write().await;
        let mut staged = tables.clone();

        staged.insert_event(DbEvent::from_event(event))?;
        for schedule in &event.schedules {
            staged.insert_schedule(DbSchedule::from_schedule(&event.id, schedule))?;
        }
        for invitation in &event.invitations {
            staged.insert_invitation(DbInvitation::from_invitation(&event.id, invitation))?;
        }

        *tables = staged;
        debug!(event_id = %event.id, "event stored in memory");
        Ok(())
    }

    async fn update(&self, event: &Event) -> SchedulingResult<()> {
        let mut tables = self.tables.write().await;
        let mut staged = tables.clone();

        let row = staged
            .events
            .get_mut(&event.id)
            .ok_or_else(|| SchedulingError::NotFound(format!("event {}", event.id)))?;
        row.title = event.title.clone();
        row.description = event.description.clone();
        row.timezone = event.timezone.clone();
        row.updated_at = event.updated_at;

        staged.schedules.retain(|id, s| {
            s.event_id != event.id || event.schedules.iter().any(|keep| &keep.id == id)
        });
        staged.invitations.retain(|id, i| {
            i.event_id != event.id || event.invitations.iter().any(|keep| &keep.id == id)
        });

        for schedule in &event.schedules {
            staged.upsert_schedule(DbSchedule::from_schedule(&event.id, schedule))?;
        }
        for invitation in &event.invitations {
            staged.upsert_invitation(DbInvitation::from_invitation(&event.id, invitation))?;
        }

        *tables = staged;
        Ok(())
    }

    async fn delete_by_id(&self, id: &str) -> SchedulingResult<()> {
        let mut tables = self.tables.write().await;

        if tables.events.remove(id).is_none() {
            return Err(SchedulingError::NotFound(format!("event {id}")));
        }
        tables.schedules.retain(|_, s| s.event_id != id);
        tables.invitations.retain(|_, i| i.event_id != id);

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> SchedulingResult<Event> {
        let tables = self.tables.read().await;

        let event = tables
            .events
            .get(id)
            .cloned()
            .ok_or_else(|| SchedulingError::NotFound(format!("event {id}")))?;

        let mut schedules: Vec<DbSchedule> = tables
            .schedules
            .values()
            .filter(|s| s.event_id == id)
            .cloned()
            .collect();
        schedules.sort_by(|a, b| (a.start_time, &a.id).cmp(&(b.start_time, &b.id)));

        let mut invitations: Vec<DbInvitation> = tables
            .invitations
            .values()
            .filter(|i| i.event_id == id)
            .cloned()
            .collect();
        invitations.sort_by(|a, b| (&a.user_id, &a.id).cmp(&(&b.user_id, &b.id)));

        Ok(event.into_event(schedules, invitations)?)
    }
}
