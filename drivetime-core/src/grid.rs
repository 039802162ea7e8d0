//! Departure-time grid: evenly spaced timezone-aware instants over a window.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use thiserror::Error;

/// Structural errors in the requested time window. These are fatal to grid
/// construction and surface immediately — nothing here is retried.
#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("end must be after start")]
    InvalidRange,

    #[error("interval must be at least one minute")]
    ZeroInterval,

    #[error("{0} does not resolve to a unique instant in this timezone")]
    UnresolvableLocalTime(NaiveDateTime),
}

/// Build the departure grid: `start, start+i, start+2i, ...`, inclusive of
/// `start` and of the last instant at or before `end`.
///
/// Both wall-clock endpoints are resolved on `date` in `tz` before the
/// comparison, so a window that straddles a DST transition is measured in
/// absolute time, not wall-clock arithmetic.
pub fn minute_grid(
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    interval_minutes: u32,
    tz: Tz,
) -> Result<Vec<DateTime<Tz>>, GridError> {
    if interval_minutes == 0 {
        return Err(GridError::ZeroInterval);
    }

    let start = resolve_local(date.and_time(start), tz)?;
    let end = resolve_local(date.and_time(end), tz)?;
    if end <= start {
        return Err(GridError::InvalidRange);
    }

    let step = Duration::minutes(i64::from(interval_minutes));
    let mut out = Vec::new();
    let mut cursor = start;
    while cursor <= end {
        out.push(cursor);
        cursor = cursor + step;
    }
    Ok(out)
}

fn resolve_local(naive: NaiveDateTime, tz: Tz) -> Result<DateTime<Tz>, GridError> {
    // Nonexistent (spring-forward gap) and ambiguous (fall-back fold)
    // wall-clock times are both rejected.
    tz.from_local_datetime(&naive)
        .single()
        .ok_or(GridError::UnresolvableLocalTime(naive))
}
