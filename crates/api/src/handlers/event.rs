//! # Event Handlers
//!
//! HTTP front of the scheduling service. Each handler turns the request into
//! the matching typed request, forwards it and renders the result; errors
//! are mapped by [`AppError`].

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use eventsched_core::{
    models::event::Event,
    requests::{CreateEventRequest, DeleteEventByIdRequest, FindEventByIdRequest, UpdateEventRequest},
};
use tracing::info;

use crate::ApiState;
use crate::dto::{CreatedResponse, EventPayload, EventResponse};
use crate::middleware::{auth::ActorId, error_handling::AppError};

/// Creates an event owned by the caller.
///
/// # Returns
///
/// * `201 Created` with `{"id": "..."}`
/// * `400 Bad Request` for a missing actor, malformed timestamps or an
///   invalid event
pub async fn create_event(
    State(state): State<Arc<ApiState>>,
    ActorId(actor_id): ActorId,
    Json(payload): Json<EventPayload>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let event = payload.apply_to(Event::new(actor_id.clone()))?;

    let id = state
        .service
        .create_event(CreateEventRequest {
            actor_id,
            event: Some(event),
        })
        .await?;

    info!(event_id = %id, "event created");
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

pub async fn get_event(
    State(state): State<Arc<ApiState>>,
    Path(event_id): Path<String>,
) -> Result<Json<EventResponse>, AppError> {
    let event = state
        .service
        .find_event_by_id(FindEventByIdRequest { event_id })
        .await?;

    Ok(Json(EventResponse::from_event(event)?))
}

/// Replaces the event's fields and children with the payload.
///
/// Attendees that were already invited keep their invitation. A schedule
/// sent with the id of one of the event's schedules keeps that id; one sent
/// without an id is created fresh. Stored schedules left out of the payload
/// are removed. An id naming any other schedule is rejected.
pub async fn update_event(
    State(state): State<Arc<ApiState>>,
    ActorId(actor_id): ActorId,
    Path(event_id): Path<String>,
    Json(payload): Json<EventPayload>,
) -> Result<StatusCode, AppError> {
    let existing = state
        .service
        .find_event_by_id(FindEventByIdRequest { event_id })
        .await?;
    let event = payload.apply_to(existing)?;
    let id = event.id.clone();

    state
        .service
        .update_event(UpdateEventRequest {
            actor_id,
            event: Some(event),
        })
        .await?;

    info!(event_id = %id, "event updated");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_event(
    State(state): State<Arc<ApiState>>,
    ActorId(actor_id): ActorId,
    Path(event_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .service
        .delete_event_by_id(DeleteEventByIdRequest {
            actor_id,
            event_id: event_id.clone(),
        })
        .await?;

    info!(event_id = %event_id, "event deleted");
    Ok(StatusCode::NO_CONTENT)
}
