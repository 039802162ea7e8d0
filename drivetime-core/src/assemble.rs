//! Series assembly: filter complete instants, derive best/worst insight.

use chrono::DateTime;
use chrono_tz::Tz;
use thiserror::Error;

use crate::engine::DurationTable;

/// Round to one decimal place, half away from zero.
///
/// This is the crate-wide rounding rule — per-call minutes, averages, and
/// the best/worst spread all go through it.
pub fn round_to_tenth(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// One complete sample: both traffic models resolved for a departure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub departure: DateTime<Tz>,
    pub optimistic: f64,
    pub pessimistic: f64,
    pub average: f64,
}

/// Best and worst departures by average duration, and the gap between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Insight {
    pub best: SeriesPoint,
    pub worst: SeriesPoint,
    pub spread: f64,
}

/// The assembled view of a batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembled {
    /// Complete samples in ascending departure order.
    pub points: Vec<SeriesPoint>,
    pub insight: Insight,
    /// Instants dropped because only one model succeeded.
    pub dropped: usize,
}

#[derive(Debug, Error, PartialEq)]
pub enum AssembleError {
    #[error("no departure has durations for both traffic models")]
    EmptySeries,
}

/// Assemble the series and insight from an accumulated table.
///
/// Instants missing either model are dropped silently (counted, not
/// errored). Ties for best/worst resolve to the earliest departure —
/// strict comparisons while scanning in ascending order. Pure: the same
/// table always assembles to the same result.
pub fn assemble(table: &DurationTable) -> Result<Assembled, AssembleError> {
    let mut points = Vec::with_capacity(table.len());
    let mut dropped = 0usize;

    for (departure, pair) in table.iter() {
        match (pair.optimistic, pair.pessimistic) {
            (Some(optimistic), Some(pessimistic)) => points.push(SeriesPoint {
                departure: *departure,
                optimistic,
                pessimistic,
                average: round_to_tenth((optimistic + pessimistic) / 2.0),
            }),
            _ => dropped += 1,
        }
    }

    if points.is_empty() {
        return Err(AssembleError::EmptySeries);
    }

    let mut best = points[0];
    let mut worst = points[0];
    for pt in &points[1..] {
        if pt.average < best.average {
            best = *pt;
        }
        if pt.average > worst.average {
            worst = *pt;
        }
    }

    Ok(Assembled {
        points,
        insight: Insight {
            best,
            worst,
            spread: round_to_tenth(worst.average - best.average),
        },
        dropped,
    })
}
