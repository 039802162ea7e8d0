//! Plain-text reporting: the departure table and the key-points block.

use drivetime_core::assemble::{Insight, SeriesPoint};

/// Departure table with one row per complete sample.
pub fn departure_table(points: &[SeriesPoint]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<10} {:>16} {:>17} {:>13}\n",
        "Departure", "Optimistic (min)", "Pessimistic (min)", "Average (min)"
    ));
    out.push_str(&format!("{}\n", "-".repeat(59)));
    for point in points {
        out.push_str(&format!(
            "{:<10} {:>16.1} {:>17.1} {:>13.1}\n",
            point.departure.format("%H:%M").to_string(),
            point.optimistic,
            point.pessimistic,
            point.average,
        ));
    }
    out
}

/// Best/worst/difference summary by average drive time.
pub fn key_points(insight: &Insight) -> String {
    format!(
        "Key points (average drive time):\n\
         \x20 Best time:   {} -> {:.1} minutes\n\
         \x20 Worst time:  {} -> {:.1} minutes\n\
         \x20 Difference:  {:.1} minutes\n",
        insight.best.departure.format("%H:%M"),
        insight.best.average,
        insight.worst.departure.format("%H:%M"),
        insight.worst.average,
        insight.spread,
    )
}
