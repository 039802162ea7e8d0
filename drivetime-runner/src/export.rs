//! Artifact export: one directory per scan holding the manifest, the
//! series as CSV, and the rendered chart.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use drivetime_core::assemble::SeriesPoint;
use drivetime_core::domain::LatLng;

use crate::config::ScanConfig;
use crate::scan::ScanResult;

#[derive(Debug, Serialize)]
struct SeriesRow {
    departure: String,
    optimistic_min: f64,
    pessimistic_min: f64,
    average_min: f64,
}

impl SeriesRow {
    fn from_point(point: &SeriesPoint) -> Self {
        Self {
            departure: point.departure.to_rfc3339(),
            optimistic_min: point.optimistic,
            pessimistic_min: point.pessimistic,
            average_min: point.average,
        }
    }
}

#[derive(Debug, Serialize)]
struct InsightRow {
    departure: String,
    average_min: f64,
    optimistic_min: f64,
    pessimistic_min: f64,
}

impl InsightRow {
    fn from_point(point: &SeriesPoint) -> Self {
        Self {
            departure: point.departure.format("%H:%M").to_string(),
            average_min: point.average,
            optimistic_min: point.optimistic,
            pessimistic_min: point.pessimistic,
        }
    }
}

#[derive(Debug, Serialize)]
struct Manifest<'a> {
    scan_id: &'a str,
    generated_at: String,
    origin: LatLng,
    destination: LatLng,
    config: &'a ScanConfig,
    best: InsightRow,
    worst: InsightRow,
    difference_min: f64,
    dropped_points: usize,
    failed_tasks: usize,
}

/// Save the full artifact set under `out_dir`, keyed by a scan-id prefix.
/// Returns the created directory.
pub fn save_artifacts(
    result: &ScanResult,
    config: &ScanConfig,
    out_dir: impl AsRef<Path>,
) -> Result<PathBuf> {
    let dir = out_dir.as_ref().join(&result.scan_id[..12]);
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create artifact dir {}", dir.display()))?;

    let manifest = Manifest {
        scan_id: &result.scan_id,
        generated_at: chrono::Utc::now().to_rfc3339(),
        origin: result.origin,
        destination: result.destination,
        config,
        best: InsightRow::from_point(&result.insight.best),
        worst: InsightRow::from_point(&result.insight.worst),
        difference_min: result.insight.spread,
        dropped_points: result.dropped_points,
        failed_tasks: result.failed_tasks,
    };
    let manifest_path = dir.join("manifest.json");
    fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)
        .with_context(|| format!("failed to write {}", manifest_path.display()))?;

    let csv_path = dir.join("series.csv");
    let mut writer = csv::Writer::from_path(&csv_path)
        .with_context(|| format!("failed to create {}", csv_path.display()))?;
    for point in &result.points {
        writer.serialize(SeriesRow::from_point(point))?;
    }
    writer.flush()?;

    let chart_path = dir.join("chart.txt");
    fs::write(&chart_path, &result.chart)
        .with_context(|| format!("failed to write {}", chart_path.display()))?;

    Ok(dir)
}
