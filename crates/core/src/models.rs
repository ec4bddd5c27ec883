pub mod event;
pub mod invitation;
pub mod schedule;

use chrono_tz::Tz;

use crate::errors::{SchedulingError, SchedulingResult};

/// Resolves an IANA zone name such as `Asia/Jakarta`.
pub fn parse_timezone(zone: &str) -> SchedulingResult<Tz> {
    zone.parse::<Tz>()
        .map_err(|_| SchedulingError::InvalidTimezone(zone.to_string()))
}
