//! Scan orchestration: departure grid -> task set -> batch fetch ->
//! series assembly -> chart.

use thiserror::Error;

use drivetime_core::assemble::{assemble, AssembleError, Insight, SeriesPoint};
use drivetime_core::chart;
use drivetime_core::domain::{FetchTask, LatLng, TrafficModel};
use drivetime_core::engine::{run_batch, FetchProgress};
use drivetime_core::grid::{minute_grid, GridError};
use drivetime_core::maps::RouteProvider;

use crate::config::{ConfigError, ScanConfig};

/// Everything a caller needs to report a scan: the filtered series, the
/// best/worst insight, the rendered chart, and how much data went missing.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub scan_id: String,
    pub origin: LatLng,
    pub destination: LatLng,
    /// Complete samples in ascending departure order.
    pub points: Vec<SeriesPoint>,
    pub insight: Insight,
    /// Rendered chart, empty when disabled in the config.
    pub chart: String,
    /// Instants dropped because only one model succeeded.
    pub dropped_points: usize,
    /// Calls that never succeeded in any retry round.
    pub failed_tasks: usize,
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Grid(#[from] GridError),

    /// Reportable "no data" outcome — distinct from a crash. Every instant
    /// lost at least one model across all rounds.
    #[error("no departure produced durations for both traffic models ({failed_tasks} calls never succeeded)")]
    NoCompleteSamples { failed_tasks: usize },
}

/// Run a full scan for already-resolved endpoints.
///
/// Geocoding happens before this call; the scan itself only ever sees
/// coordinates.
pub fn run_scan(
    config: &ScanConfig,
    origin: LatLng,
    destination: LatLng,
    provider: &dyn RouteProvider,
    progress: &dyn FetchProgress,
) -> Result<ScanResult, ScanError> {
    let window = config.resolved_window()?;
    let grid = minute_grid(
        window.date,
        window.start,
        window.end,
        window.interval_minutes,
        window.tz,
    )?;

    let mut tasks = Vec::with_capacity(grid.len() * 2);
    for departure in &grid {
        for model in TrafficModel::BOTH {
            tasks.push(FetchTask {
                origin,
                dest: destination,
                departure: *departure,
                model,
            });
        }
    }

    let outcome = run_batch(&tasks, provider, &config.fetch.to_policy(), progress);

    let assembled = match assemble(&outcome.table) {
        Ok(assembled) => assembled,
        Err(AssembleError::EmptySeries) => {
            return Err(ScanError::NoCompleteSamples {
                failed_tasks: outcome.failed_count(),
            })
        }
    };

    let chart = if config.chart.enabled {
        chart::render(&assembled.points, config.chart.height)
    } else {
        String::new()
    };

    Ok(ScanResult {
        scan_id: config.scan_id(),
        origin,
        destination,
        points: assembled.points,
        insight: assembled.insight,
        chart,
        dropped_points: assembled.dropped,
        failed_tasks: outcome.failed_count(),
    })
}
