//! Accumulated fetch results keyed by departure instant.

use chrono::DateTime;
use chrono_tz::Tz;
use std::collections::BTreeMap;

use crate::domain::TrafficModel;

/// Durations for one departure instant, one slot per traffic model.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ModelPair {
    pub optimistic: Option<f64>,
    pub pessimistic: Option<f64>,
}

impl ModelPair {
    pub fn get(&self, model: TrafficModel) -> Option<f64> {
        match model {
            TrafficModel::Optimistic => self.optimistic,
            TrafficModel::Pessimistic => self.pessimistic,
        }
    }

    /// Both models resolved for this instant.
    pub fn is_complete(&self) -> bool {
        self.optimistic.is_some() && self.pessimistic.is_some()
    }
}

/// Results accumulated across retry rounds, in ascending instant order.
///
/// The table only grows: a recorded duration is never overwritten or
/// removed, so a task that succeeded in an earlier round is immune to
/// anything later rounds do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DurationTable {
    entries: BTreeMap<DateTime<Tz>, ModelPair>,
}

impl DurationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a duration in minutes. First write wins.
    pub fn record(&mut self, departure: DateTime<Tz>, model: TrafficModel, minutes: f64) {
        let pair = self.entries.entry(departure).or_default();
        let slot = match model {
            TrafficModel::Optimistic => &mut pair.optimistic,
            TrafficModel::Pessimistic => &mut pair.pessimistic,
        };
        if slot.is_none() {
            *slot = Some(minutes);
        }
    }

    pub fn get(&self, departure: &DateTime<Tz>, model: TrafficModel) -> Option<f64> {
        self.entries.get(departure).and_then(|p| p.get(model))
    }

    /// Number of departure instants with at least one recorded model.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of recorded (instant, model) cells.
    pub fn cell_count(&self) -> usize {
        self.entries
            .values()
            .map(|p| usize::from(p.optimistic.is_some()) + usize::from(p.pessimistic.is_some()))
            .sum()
    }

    /// Iterate instants in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (&DateTime<Tz>, &ModelPair)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::Los_Angeles;

    fn instant(h: u32, m: u32) -> DateTime<Tz> {
        Los_Angeles.with_ymd_and_hms(2025, 6, 2, h, m, 0).unwrap()
    }

    #[test]
    fn first_write_wins() {
        let mut table = DurationTable::new();
        table.record(instant(8, 0), TrafficModel::Optimistic, 10.0);
        table.record(instant(8, 0), TrafficModel::Optimistic, 99.0);
        assert_eq!(table.get(&instant(8, 0), TrafficModel::Optimistic), Some(10.0));
    }

    #[test]
    fn models_occupy_independent_slots() {
        let mut table = DurationTable::new();
        table.record(instant(8, 0), TrafficModel::Optimistic, 10.0);
        table.record(instant(8, 0), TrafficModel::Pessimistic, 14.0);
        assert_eq!(table.len(), 1);
        assert_eq!(table.cell_count(), 2);
        assert!(table.iter().next().unwrap().1.is_complete());
    }

    #[test]
    fn iterates_in_ascending_instant_order() {
        let mut table = DurationTable::new();
        table.record(instant(9, 0), TrafficModel::Optimistic, 1.0);
        table.record(instant(8, 0), TrafficModel::Optimistic, 2.0);
        table.record(instant(8, 30), TrafficModel::Optimistic, 3.0);
        let order: Vec<u32> = table
            .iter()
            .map(|(dt, _)| chrono::Timelike::minute(dt) + chrono::Timelike::hour(dt) * 60)
            .collect();
        assert_eq!(order, vec![480, 510, 540]);
    }
}
