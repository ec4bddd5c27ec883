use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::errors::SchedulingResult;
use crate::models::event::Event;
use crate::repository::EventRepository;
use crate::requests::{
    CreateEventRequest, DeleteEventByIdRequest, FindEventByIdRequest, UpdateEventRequest,
};
use crate::validation::EventValidator;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SchedulingService: Send + Sync {
    /// Returns the id of the stored event.
    async fn create_event(&self, req: CreateEventRequest) -> SchedulingResult<String>;

    async fn delete_event_by_id(&self, req: DeleteEventByIdRequest) -> SchedulingResult<()>;

    async fn update_event(&self, req: UpdateEventRequest) -> SchedulingResult<()>;

    async fn find_event_by_id(&self, req: FindEventByIdRequest) -> SchedulingResult<Event>;
}

/// Validates requests and hands them to the repository.
pub struct EventService<R> {
    repository: R,
    validator: EventValidator,
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repository: R) -> Self {
        Self::with_validator(repository, EventValidator::new())
    }

    pub fn with_validator(repository: R, validator: EventValidator) -> Self {
        Self {
            repository,
            validator,
        }
    }
}

#[async_trait]
impl<R: EventRepository> SchedulingService for EventService<R> {
    async fn create_event(&self, req: CreateEventRequest) -> SchedulingResult<String> {
        let event = self.validator.validate_create(&req)?;

        debug!(event_id = %event.id, actor_id = %req.actor_id, "creating event");
        self.repository.store(event).await?;

        Ok(event.id.clone())
    }

    async fn delete_event_by_id(&self, req: DeleteEventByIdRequest) -> SchedulingResult<()> {
        self.validator.validate_delete(&req)?;

        debug!(event_id = %req.event_id, actor_id = %req.actor_id, "deleting event");
        self.repository.delete_by_id(&req.event_id).await
    }

    async fn update_event(&self, req: UpdateEventRequest) -> SchedulingResult<()> {
        let mut event = self.validator.validate_update(&req)?.clone();
        event.updated_at = Some(Utc::now());

        debug!(event_id = %event.id, actor_id = %req.actor_id, "updating event");
        self.repository.update(&event).await
    }

    async fn find_event_by_id(&self, req: FindEventByIdRequest) -> SchedulingResult<Event> {
        self.validator.validate_find(&req)?;
        self.repository.find_by_id(&req.event_id).await
    }
}
