//! JSON shapes of the event endpoints.
//!
//! Clients send wall-clock RFC 3339 timestamps and a list of attendee user
//! ids. Responses render every schedule in the event's own timezone.

use eventsched_core::{
    errors::{SchedulingError, SchedulingResult},
    models::{
        event::Event,
        invitation::{Invitation, InvitationStatus},
        schedule::{RecurringType, Schedule},
    },
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulePayload {
    /// Present when an existing schedule is being kept across an update.
    #[serde(default)]
    pub id: Option<String>,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub is_full_day: bool,
    #[serde(default)]
    pub recurring_type: RecurringType,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventPayload {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub timezone: String,
    #[serde(default)]
    pub schedules: Vec<SchedulePayload>,
    /// User ids to invite.
    #[serde(default)]
    pub attendees: Vec<String>,
}

impl EventPayload {
    /// Copies the payload onto `event`, building its children.
    ///
    /// A schedule id in the payload must name one of the schedules already
    /// on `event`; a fresh event has none, so any id is rejected there.
    /// Invitations already present on `event` are kept for attendees that
    /// remain on the list, so their status and token survive an update.
    pub fn apply_to(self, mut event: Event) -> SchedulingResult<Event> {
        let schedules = self
            .schedules
            .iter()
            .map(|payload| -> SchedulingResult<Schedule> {
                let mut schedule = Schedule::new(
                    &event.id,
                    &payload.start_time,
                    &payload.end_time,
                    payload.is_full_day,
                    payload.recurring_type,
                )?;
                if let Some(id) = &payload.id {
                    if !event.schedules.iter().any(|existing| &existing.id == id) {
                        return Err(SchedulingError::Validation(format!(
                            "schedule {id} does not belong to event {}",
                            event.id
                        )));
                    }
                    schedule.id = id.clone();
                }
                Ok(schedule)
            })
            .collect::<SchedulingResult<Vec<_>>>()?;

        let mut previous = std::mem::take(&mut event.invitations);
        let mut invitations = Vec::with_capacity(self.attendees.len());
        for user_id in self.attendees {
            if invitations.iter().any(|i: &Invitation| i.user_id == user_id) {
                continue;
            }
            match previous.iter().position(|i| i.user_id == user_id) {
                Some(pos) => invitations.push(previous.swap_remove(pos)),
                None => invitations.push(Invitation::new(&event.id, user_id)),
            }
        }

        event.title = self.title;
        event.description = self.description;
        event.timezone = self.timezone;
        event.schedules = schedules;
        event.invitations = invitations;

        Ok(event)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScheduleResponse {
    pub id: String,
    pub start_time: String,
    pub end_time: String,
    pub duration_in_minutes: i64,
    pub is_full_day: bool,
    pub recurring_type: RecurringType,
    pub recurring_interval: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InvitationResponse {
    pub id: String,
    pub user_id: String,
    pub status: InvitationStatus,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EventResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub timezone: String,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
    pub schedules: Vec<ScheduleResponse>,
    pub invitations: Vec<InvitationResponse>,
}

impl EventResponse {
    pub fn from_event(event: Event) -> SchedulingResult<Self> {
        let schedules = event
            .schedules
            .iter()
            .map(|schedule| -> SchedulingResult<ScheduleResponse> {
                let start = schedule.start_time_in(&event.timezone)?;
                let end = schedule.end_time_from(&start);
                Ok(ScheduleResponse {
                    id: schedule.id.clone(),
                    start_time: start.to_rfc3339(),
                    end_time: end.to_rfc3339(),
                    duration_in_minutes: schedule.duration_in_minutes,
                    is_full_day: schedule.is_full_day,
                    recurring_type: schedule.recurring_type,
                    recurring_interval: schedule.recurring_interval(),
                })
            })
            .collect::<SchedulingResult<Vec<_>>>()?;

        let updated_at = event.updated_at_rfc3339();
        let invitations = event
            .invitations
            .into_iter()
            .map(|invitation| InvitationResponse {
                id: invitation.id,
                user_id: invitation.user_id,
                status: invitation.status,
                token: invitation.token,
            })
            .collect();

        Ok(Self {
            id: event.id,
            title: event.title,
            description: event.description,
            timezone: event.timezone,
            created_by: event.created_by,
            created_at: event.created_at.to_rfc3339(),
            updated_at,
            schedules,
            invitations,
        })
    }
}
