use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::parse_timezone;
use crate::errors::{SchedulingError, SchedulingResult};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecurringType {
    #[default]
    #[serde(rename = "NONE")]
    None,
    #[serde(rename = "DAILY")]
    Daily,
    #[serde(rename = "WEEK")]
    Weekly,
}

impl RecurringType {
    /// Seconds between two occurrences. Zero for one-off schedules.
    pub fn interval(self) -> i64 {
        match self {
            RecurringType::None => 0,
            RecurringType::Daily => SECONDS_PER_DAY,
            RecurringType::Weekly => 7 * SECONDS_PER_DAY,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecurringType::None => "NONE",
            RecurringType::Daily => "DAILY",
            RecurringType::Weekly => "WEEK",
        }
    }
}

impl fmt::Display for RecurringType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurringType {
    type Err = SchedulingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" => Ok(RecurringType::None),
            "DAILY" => Ok(RecurringType::Daily),
            "WEEK" => Ok(RecurringType::Weekly),
            other => Err(SchedulingError::validation(format!(
                "unknown recurring type {other:?}"
            ))),
        }
    }
}

/// A single time slot of an event.
///
/// The start is kept as UTC epoch seconds and carries no zone of its own;
/// the owning event's timezone is applied only when rendering. The
/// recurring interval is not a field: it is always derived from
/// [`RecurringType`] so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Schedule {
    #[validate(length(min = 1, message = "schedule id is required"))]
    pub id: String,
    #[validate(length(min = 1, message = "schedule event id is required"))]
    pub event_id: String,
    pub start_time: i64,
    #[validate(range(min = 1, message = "schedule must last at least one minute"))]
    pub duration_in_minutes: i64,
    pub is_full_day: bool,
    pub recurring_type: RecurringType,
}

impl Schedule {
    /// Builds a schedule from two RFC 3339 timestamps.
    ///
    /// Both ends are normalized to UTC before the duration is taken, so the
    /// offsets used by the caller do not leak into storage.
    pub fn new(
        event_id: impl Into<String>,
        start: &str,
        end: &str,
        is_full_day: bool,
        recurring_type: RecurringType,
    ) -> SchedulingResult<Self> {
        let start_utc = parse_timestamp(start)?;
        let end_utc = parse_timestamp(end)?;
        let elapsed = end_utc - start_utc;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            event_id: event_id.into(),
            start_time: start_utc.timestamp(),
            duration_in_minutes: elapsed.num_seconds().div_euclid(60),
            is_full_day,
            recurring_type,
        })
    }

    pub fn recurring_interval(&self) -> i64 {
        self.recurring_type.interval()
    }

    pub fn start_time_utc(&self) -> SchedulingResult<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(self.start_time, 0).ok_or_else(|| {
            SchedulingError::validation(format!("start time {} is out of range", self.start_time))
        })
    }

    /// Wall-clock start of this schedule in `zone`.
    pub fn start_time_in(&self, zone: &str) -> SchedulingResult<DateTime<Tz>> {
        let tz = parse_timezone(zone)?;
        Ok(self.start_time_utc()?.with_timezone(&tz))
    }

    /// Adds the elapsed duration to `start`. Valid in any zone because the
    /// duration is a span of real time, not a wall-clock delta.
    pub fn end_time_from<T: TimeZone>(&self, start: &DateTime<T>) -> DateTime<T> {
        start.clone() + Duration::minutes(self.duration_in_minutes)
    }

    pub fn end_time_in(&self, zone: &str) -> SchedulingResult<DateTime<Tz>> {
        let start = self.start_time_in(zone)?;
        Ok(self.end_time_from(&start))
    }
}

fn parse_timestamp(value: &str) -> SchedulingResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| SchedulingError::InvalidTimestamp {
            value: value.to_string(),
            source,
        })
}
