use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{invitation::Invitation, schedule::Schedule};
use crate::errors::SchedulingResult;
use crate::validation::EventValidator;

/// The event aggregate: scalar fields plus the schedules and invitations it
/// owns. Children never outlive the event and are always written and read
/// together with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Event {
    #[validate(length(min = 1, message = "event id is required"))]
    pub id: String,
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "timezone is required"))]
    pub timezone: String,
    pub schedules: Vec<Schedule>,
    pub invitations: Vec<Invitation>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Event {
    /// Allocates a fresh id and creation stamp for an event owned by
    /// `created_by`. Everything else starts empty.
    pub fn new(created_by: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: String::new(),
            description: String::new(),
            timezone: String::new(),
            schedules: Vec::new(),
            invitations: Vec::new(),
            created_by: created_by.into(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn validate(&self) -> SchedulingResult<()> {
        EventValidator::new().validate_event(self)
    }

    pub fn updated_at_rfc3339(&self) -> String {
        self.updated_at
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}
