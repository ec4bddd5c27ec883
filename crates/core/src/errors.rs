use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid timestamp {value:?}: {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] eyre::Report),
}

impl SchedulingError {
    pub fn validation(msg: impl Into<String>) -> Self {
        SchedulingError::Validation(msg.into())
    }

    /// True for failures detected before any I/O was attempted.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SchedulingError::Validation(_)
                | SchedulingError::InvalidTimezone(_)
                | SchedulingError::InvalidTimestamp { .. }
        )
    }
}

impl From<validator::ValidationErrors> for SchedulingError {
    fn from(errors: validator::ValidationErrors) -> Self {
        SchedulingError::Validation(errors.to_string())
    }
}

pub type SchedulingResult<T> = Result<T, SchedulingError>;
