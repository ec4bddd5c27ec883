//! Row shapes of the `event`, `schedule` and `invitation` tables and their
//! conversion to and from the domain aggregate.

use chrono::{DateTime, Utc};
use eventsched_core::models::{
    event::Event,
    invitation::{Invitation, InvitationStatus},
    schedule::{RecurringType, Schedule},
};
use eyre::{Result, eyre};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    pub timezone: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSchedule {
    pub id: String,
    pub event_id: String,
    pub start_time: i64,
    pub duration: i64,
    pub is_full_day: bool,
    pub recurring_type: String,
    /// Written for readers of the table; never trusted on load.
    pub recurring_interval: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbInvitation {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub token: String,
    pub status: i16,
}

impl DbEvent {
    pub fn from_event(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            title: event.title.clone(),
            description: event.description.clone(),
            timezone: event.timezone.clone(),
            created_by: event.created_by.clone(),
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }

    /// Assembles the aggregate from its rows.
    pub fn into_event(
        self,
        schedules: Vec<DbSchedule>,
        invitations: Vec<DbInvitation>,
    ) -> Result<Event> {
        Ok(Event {
            id: self.id,
            title: self.title,
            description: self.description,
            timezone: self.timezone,
            schedules: schedules
                .into_iter()
                .map(Schedule::try_from)
                .collect::<Result<_>>()?,
            invitations: invitations
                .into_iter()
                .map(Invitation::try_from)
                .collect::<Result<_>>()?,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl DbSchedule {
    pub fn from_schedule(event_id: &str, schedule: &Schedule) -> Self {
        Self {
            id: schedule.id.clone(),
            event_id: event_id.to_string(),
            start_time: schedule.start_time,
            duration: schedule.duration_in_minutes,
            is_full_day: schedule.is_full_day,
            recurring_type: schedule.recurring_type.as_str().to_string(),
            recurring_interval: schedule.recurring_interval(),
        }
    }
}

impl TryFrom<DbSchedule> for Schedule {
    type Error = eyre::Report;

    fn try_from(row: DbSchedule) -> Result<Self> {
        let recurring_type = row
            .recurring_type
            .parse::<RecurringType>()
            .map_err(|e| eyre!("schedule {}: {}", row.id, e))?;

        Ok(Schedule {
            id: row.id,
            event_id: row.event_id,
            start_time: row.start_time,
            duration_in_minutes: row.duration,
            is_full_day: row.is_full_day,
            recurring_type,
        })
    }
}

impl DbInvitation {
    pub fn from_invitation(event_id: &str, invitation: &Invitation) -> Self {
        Self {
            id: invitation.id.clone(),
            event_id: event_id.to_string(),
            user_id: invitation.user_id.clone(),
            token: invitation.token.clone(),
            status: invitation.status.code(),
        }
    }
}

impl TryFrom<DbInvitation> for Invitation {
    type Error = eyre::Report;

    fn try_from(row: DbInvitation) -> Result<Self> {
        let status = InvitationStatus::from_code(row.status)
            .map_err(|e| eyre!("invitation {}: {}", row.id, e))?;

        Ok(Invitation {
            id: row.id,
            event_id: row.event_id,
            user_id: row.user_id,
            status,
            token: row.token,
        })
    }
}
