//! Typed inputs of the scheduling operations.
//!
//! The actor id is whatever the transport layer extracted from the
//! caller's authorization context; it is trusted as supplied.

use crate::models::event::Event;

#[derive(Debug, Clone, PartialEq)]
pub struct CreateEventRequest {
    pub actor_id: String,
    pub event: Option<Event>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteEventByIdRequest {
    pub actor_id: String,
    pub event_id: String,
}

/// Replaces the stored aggregate identified by `event.id`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateEventRequest {
    pub actor_id: String,
    pub event: Option<Event>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FindEventByIdRequest {
    pub event_id: String,
}
