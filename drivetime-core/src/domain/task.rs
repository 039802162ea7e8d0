//! Fetch tasks: one routing call per (departure instant, traffic model).

use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::LatLng;

/// Congestion assumption the routing API applies when estimating an ETA.
///
/// The service also offers a best-guess model; the scanner only brackets
/// the estimate with the two extremes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficModel {
    Optimistic,
    Pessimistic,
}

impl TrafficModel {
    /// Both models, in the order tasks are generated per instant.
    pub const BOTH: [TrafficModel; 2] = [TrafficModel::Optimistic, TrafficModel::Pessimistic];

    /// The `traffic_model` query-parameter value.
    pub fn as_param(&self) -> &'static str {
        match self {
            TrafficModel::Optimistic => "optimistic",
            TrafficModel::Pessimistic => "pessimistic",
        }
    }
}

impl std::fmt::Display for TrafficModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_param())
    }
}

/// One unit of work mapped to exactly one remote routing call.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTask {
    pub origin: LatLng,
    pub dest: LatLng,
    pub departure: DateTime<Tz>,
    pub model: TrafficModel,
}

impl FetchTask {
    /// Departure as Unix epoch seconds, the form the Directions API takes.
    pub fn departure_epoch(&self) -> i64 {
        self.departure.timestamp()
    }
}
