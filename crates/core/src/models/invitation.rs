use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{SchedulingError, SchedulingResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    #[default]
    Unknown,
    Confirmed,
    Declined,
}

impl InvitationStatus {
    /// Integer code used in the `invitation.status` column.
    pub fn code(self) -> i16 {
        match self {
            InvitationStatus::Unknown => 0,
            InvitationStatus::Confirmed => 1,
            InvitationStatus::Declined => 2,
        }
    }

    pub fn from_code(code: i16) -> SchedulingResult<Self> {
        match code {
            0 => Ok(InvitationStatus::Unknown),
            1 => Ok(InvitationStatus::Confirmed),
            2 => Ok(InvitationStatus::Declined),
            other => Err(SchedulingError::validation(format!(
                "unknown invitation status {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Invitation {
    #[validate(length(min = 1, message = "invitation id is required"))]
    pub id: String,
    #[validate(length(min = 1, message = "invitation event id is required"))]
    pub event_id: String,
    #[validate(length(min = 1, message = "invited user id is required"))]
    pub user_id: String,
    pub status: InvitationStatus,
    #[validate(length(min = 1, message = "invitation token is required"))]
    pub token: String,
}

impl Invitation {
    pub fn new(event_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        let id = Uuid::new_v4().to_string();
        let token = Self::token_for(&id);

        Self {
            id,
            event_id: event_id.into(),
            user_id: user_id.into(),
            status: InvitationStatus::Unknown,
            token,
        }
    }

    /// Confirmation token for an invitation id. This is a plain reversible
    /// encoding, not a secret.
    pub fn token_for(id: &str) -> String {
        STANDARD.encode(id.as_bytes())
    }

    /// Recovers the invitation id carried by `token`.
    pub fn decode_token(token: &str) -> SchedulingResult<String> {
        let bytes = STANDARD
            .decode(token)
            .map_err(|e| SchedulingError::validation(format!("malformed invitation token: {e}")))?;

        String::from_utf8(bytes)
            .map_err(|e| SchedulingError::validation(format!("malformed invitation token: {e}")))
    }

    pub fn has_consistent_token(&self) -> bool {
        self.token == Self::token_for(&self.id)
    }

    pub fn confirm(&mut self) {
        self.status = InvitationStatus::Confirmed;
    }

    pub fn decline(&mut self) {
        self.status = InvitationStatus::Declined;
    }
}
