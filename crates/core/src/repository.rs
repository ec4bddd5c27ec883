use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::SchedulingResult;
use crate::models::event::Event;

/// Durable storage of event aggregates.
///
/// Each method is one unit of work: implementations either apply every row
/// change of the call or none of them. Storage failures are returned as
/// [`SchedulingError::Storage`](crate::errors::SchedulingError::Storage)
/// and are never retried.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Inserts the event row, then every schedule, then every invitation.
    async fn store(&self, event: &Event) -> SchedulingResult<()>;

    /// Replaces the scalar fields and children of an existing event.
    /// Children missing from `event` are removed.
    async fn update(&self, event: &Event) -> SchedulingResult<()>;

    /// Removes the event together with all of its children. Fails with
    /// `NotFound` when no such event exists.
    async fn delete_by_id(&self, id: &str) -> SchedulingResult<()>;

    async fn find_by_id(&self, id: &str) -> SchedulingResult<Event>;
}

#[async_trait]
impl<R: EventRepository + ?Sized> EventRepository for Arc<R> {
    async fn store(&self, event: &Event) -> SchedulingResult<()> {
        (**self).store(event).await
    }

    async fn update(&self, event: &Event) -> SchedulingResult<()> {
        (**self).update(event).await
    }

    async fn delete_by_id(&self, id: &str) -> SchedulingResult<()> {
        (**self).delete_by_id(id).await
    }

    async fn find_by_id(&self, id: &str) -> SchedulingResult<Event> {
        (**self).find_by_id(id).await
    }
}
