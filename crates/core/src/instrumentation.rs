//! Tracing decorators for the repository and service contracts.
//!
//! Each wrapper implements the same trait as the value it wraps, opens one
//! span per call and records the failure inside that span before handing
//! the result back untouched.

use async_trait::async_trait;
use tracing::{Instrument, Span, error, info_span};

use crate::errors::SchedulingResult;
use crate::models::event::Event;
use crate::repository::EventRepository;
use crate::requests::{
    CreateEventRequest, DeleteEventByIdRequest, FindEventByIdRequest, UpdateEventRequest,
};
use crate::service::SchedulingService;

fn record<T>(span: &Span, result: SchedulingResult<T>) -> SchedulingResult<T> {
    if let Err(err) = &result {
        span.in_scope(|| error!(error = %err, "operation failed"));
    }
    result
}

pub struct InstrumentedEventRepository<R> {
    inner: R,
}

impl<R> InstrumentedEventRepository<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<R: EventRepository> EventRepository for InstrumentedEventRepository<R> {
    async fn store(&self, event: &Event) -> SchedulingResult<()> {
        let span = info_span!(
            "event_repository.store",
            event_id = %event.id,
            schedules = event.schedules.len(),
            invitations = event.invitations.len(),
        );
        let result = self.inner.store(event).instrument(span.clone()).await;
        record(&span, result)
    }

    async fn update(&self, event: &Event) -> SchedulingResult<()> {
        let span = info_span!(
            "event_repository.update",
            event_id = %event.id,
            schedules = event.schedules.len(),
            invitations = event.invitations.len(),
        );
        let result = self.inner.update(event).instrument(span.clone()).await;
        record(&span, result)
    }

    async fn delete_by_id(&self, id: &str) -> SchedulingResult<()> {
        let span = info_span!("event_repository.delete_by_id", event_id = %id);
        let result = self.inner.delete_by_id(id).instrument(span.clone()).await;
        record(&span, result)
    }

    async fn find_by_id(&self, id: &str) -> SchedulingResult<Event> {
        let span = info_span!("event_repository.find_by_id", event_id = %id);
        let result = self.inner.find_by_id(id).instrument(span.clone()).await;
        record(&span, result)
    }
}

pub struct InstrumentedSchedulingService<S> {
    inner: S,
}

impl<S> InstrumentedSchedulingService<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: SchedulingService> SchedulingService for InstrumentedSchedulingService<S> {
    async fn create_event(&self, req: CreateEventRequest) -> SchedulingResult<String> {
        let span = info_span!("scheduling_service.create_event", actor_id = %req.actor_id);
        let result = self.inner.create_event(req).instrument(span.clone()).await;
        record(&span, result)
    }

    async fn delete_event_by_id(&self, req: DeleteEventByIdRequest) -> SchedulingResult<()> {
        let span = info_span!(
            "scheduling_service.delete_event_by_id",
            actor_id = %req.actor_id,
            event_id = %req.event_id,
        );
        let result = self.inner.delete_event_by_id(req).instrument(span.clone()).await;
        record(&span, result)
    }

    async fn update_event(&self, req: UpdateEventRequest) -> SchedulingResult<()> {
        let span = info_span!("scheduling_service.update_event", actor_id = %req.actor_id);
        let result = self.inner.update_event(req).instrument(span.clone()).await;
        record(&span, result)
    }

    async fn find_event_by_id(&self, req: FindEventByIdRequest) -> SchedulingResult<Event> {
        let span = info_span!("scheduling_service.find_event_by_id", event_id = %req.event_id);
        let result = self.inner.find_event_by_id(req).instrument(span.clone()).await;
        record(&span, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SchedulingError;
    use crate::repository::MockEventRepository;
    use crate::service::MockSchedulingService;

    #[test_log::test(tokio::test)]
    async fn test_repository_decorator_delegates() {
        let mut repo = MockEventRepository::new();
        repo.expect_delete_by_id()
            .withf(|id| id == "event-1")
            .times(1)
            .returning(|_| Ok(()));

        let instrumented = InstrumentedEventRepository::new(repo);
        instrumented.delete_by_id("event-1").await.unwrap();
    }

    #[test_log::test(tokio::test)]
    async fn test_repository_decorator_returns_errors_unchanged() {
        let mut repo = MockEventRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .returning(|id| Err(SchedulingError::NotFound(format!("event {id}"))));

        let instrumented = InstrumentedEventRepository::new(repo);
        let err = instrumented.find_by_id("missing").await.unwrap_err();

        assert!(matches!(err, SchedulingError::NotFound(msg) if msg == "event missing"));
    }

    #[test_log::test(tokio::test)]
    async fn test_service_decorator_delegates() {
        let mut service = MockSchedulingService::new();
        service
            .expect_find_event_by_id()
            .times(1)
            .returning(|req| Err(SchedulingError::NotFound(req.event_id)));

        let instrumented = InstrumentedSchedulingService::new(service);
        let err = instrumented
            .find_event_by_id(FindEventByIdRequest {
                event_id: "event-9".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, SchedulingError::NotFound(id) if id == "event-9"));
    }

    #[test_log::test(tokio::test)]
    async fn test_service_decorator_passes_results() {
        let mut service = MockSchedulingService::new();
        service
            .expect_create_event()
            .times(1)
            .returning(|_| Ok("event-1".to_string()));

        let instrumented = InstrumentedSchedulingService::new(service);
        let id = instrumented
            .create_event(CreateEventRequest {
                actor_id: "actor-1".to_string(),
                event: None,
            })
            .await
            .unwrap();

        assert_eq!(id, "event-1");
    }
}
