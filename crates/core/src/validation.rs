use validator::Validate;

use crate::errors::{SchedulingError, SchedulingResult};
use crate::models::{event::Event, invitation::Invitation, parse_timezone};
use crate::requests::{
    CreateEventRequest, DeleteEventByIdRequest, FindEventByIdRequest, UpdateEventRequest,
};

/// Stateless request and aggregate checks. Every check runs before any
/// I/O, so a rejected request never touches storage.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventValidator;

impl EventValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_event(&self, event: &Event) -> SchedulingResult<()> {
        // An empty zone is reported as a missing field below.
        if !event.timezone.is_empty() {
            parse_timezone(&event.timezone)?;
        }

        Validate::validate(event)?;

        if event.schedules.is_empty() {
            return Err(SchedulingError::validation("no schedules provided for the event"));
        }

        for (idx, schedule) in event.schedules.iter().enumerate() {
            schedule
                .validate()
                .map_err(|e| SchedulingError::Validation(format!("schedules[{idx}]: {e}")))?;

            if schedule.event_id != event.id {
                return Err(SchedulingError::Validation(format!(
                    "schedules[{idx}]: belongs to event {} instead of {}",
                    schedule.event_id, event.id
                )));
            }
        }

        for (idx, invitation) in event.invitations.iter().enumerate() {
            self.validate_invitation(invitation)
                .map_err(|e| SchedulingError::Validation(format!("invitations[{idx}]: {e}")))?;

            if invitation.event_id != event.id {
                return Err(SchedulingError::Validation(format!(
                    "invitations[{idx}]: belongs to event {} instead of {}",
                    invitation.event_id, event.id
                )));
            }
        }

        Ok(())
    }

    fn validate_invitation(&self, invitation: &Invitation) -> Result<(), String> {
        invitation.validate().map_err(|e| e.to_string())?;

        if !invitation.has_consistent_token() {
            return Err("token does not match invitation id".to_string());
        }

        Ok(())
    }

    pub fn validate_create<'a>(&self, req: &'a CreateEventRequest) -> SchedulingResult<&'a Event> {
        if req.actor_id.is_empty() {
            return Err(SchedulingError::validation("invalid actor id"));
        }

        let event = req
            .event
            .as_ref()
            .ok_or_else(|| SchedulingError::validation("invalid event"))?;

        if event.schedules.is_empty() {
            return Err(SchedulingError::validation("no schedules provided for the event"));
        }

        self.validate_event(event)?;
        Ok(event)
    }

    pub fn validate_update<'a>(&self, req: &'a UpdateEventRequest) -> SchedulingResult<&'a Event> {
        if req.actor_id.is_empty() {
            return Err(SchedulingError::validation("invalid actor id"));
        }

        let event = req
            .event
            .as_ref()
            .ok_or_else(|| SchedulingError::validation("invalid event"))?;

        self.validate_event(event)?;
        Ok(event)
    }

    pub fn validate_delete(&self, req: &DeleteEventByIdRequest) -> SchedulingResult<()> {
        if req.actor_id.is_empty() {
            return Err(SchedulingError::validation("invalid actor id"));
        }

        if req.event_id.is_empty() {
            return Err(SchedulingError::validation("invalid event id"));
        }

        Ok(())
    }

    pub fn validate_find(&self, req: &FindEventByIdRequest) -> SchedulingResult<()> {
        if req.event_id.is_empty() {
            return Err(SchedulingError::validation("invalid event id"));
        }

        Ok(())
    }
}
