//! # Event scheduling core
//!
//! Domain model and contracts of the scheduling service: the event
//! aggregate with its schedules and invitations, the checks that guard it,
//! and the service that validates requests before handing the aggregate to
//! an [`repository::EventRepository`].

pub mod errors;
pub mod instrumentation;
pub mod models;
pub mod repository;
pub mod requests;
pub mod service;
pub mod validation;
