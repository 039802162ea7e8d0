//! Fixed-height ASCII chart of the three duration series.
//!
//! Layout: `height` value rows with a minute gutter, a dashed axis, hour
//! labels under top-of-hour columns, a caption, and a legend. Scale bounds
//! come from the optimistic and pessimistic series only — the average is
//! plotted but never widens the range.

use chrono::Timelike;

use crate::assemble::SeriesPoint;

/// Default number of value rows.
pub const DEFAULT_HEIGHT: usize = 20;

const GUTTER: usize = 10; // "{:>3} min | "

/// Render the chart as a static multi-line block.
///
/// Per column the draw order is pessimistic `o`, optimistic `+` (blank
/// cells only), average `*` (allowed to overwrite the other two), then the
/// best `B` and worst `W` markers, which override anything in their cell.
/// A flat series (max == min across both bound series) collapses every
/// marker onto the bottom row.
pub fn render(points: &[SeriesPoint], height: usize) -> String {
    if points.is_empty() {
        return String::new();
    }
    let height = height.max(2);
    let width = points.len();

    let lo = points
        .iter()
        .map(|p| p.optimistic.min(p.pessimistic))
        .fold(f64::INFINITY, f64::min);
    let hi = points
        .iter()
        .map(|p| p.optimistic.max(p.pessimistic))
        .fold(f64::NEG_INFINITY, f64::max);
    let span = hi - lo;

    // Row index from the top; values map to the nearest row.
    let row_of = |v: f64| -> usize {
        let scaled = if span == 0.0 {
            0
        } else {
            (((v - lo) / span) * (height - 1) as f64).round() as usize
        };
        height - 1 - scaled.min(height - 1)
    };

    let mut rows = vec![vec![' '; width]; height];
    for (col, pt) in points.iter().enumerate() {
        let pes = row_of(pt.pessimistic);
        let opt = row_of(pt.optimistic);
        let avg = row_of(pt.average);
        if rows[pes][col] == ' ' {
            rows[pes][col] = 'o';
        }
        if rows[opt][col] == ' ' {
            rows[opt][col] = '+';
        }
        if matches!(rows[avg][col], ' ' | '+' | 'o') {
            rows[avg][col] = '*';
        }
    }

    // Ties resolve to the earliest departure, same as the assembler.
    let mut best_idx = 0;
    let mut worst_idx = 0;
    for (i, pt) in points.iter().enumerate() {
        if pt.average < points[best_idx].average {
            best_idx = i;
        }
        if pt.average > points[worst_idx].average {
            worst_idx = i;
        }
    }
    rows[row_of(points[best_idx].average)][best_idx] = 'B';
    rows[row_of(points[worst_idx].average)][worst_idx] = 'W';

    let mut out = String::new();
    for (r, row) in rows.iter().enumerate() {
        let value = hi - (r as f64 / (height - 1) as f64) * span;
        let cells: String = row.iter().collect();
        out.push_str(&format!("{:>3} min | {}\n", value as i64, cells));
    }
    out.push_str(&format!("{}+{}\n", " ".repeat(GUTTER - 2), "-".repeat(width)));
    out.push_str(&hour_label_row(points, width));
    out.push_str(&format!("{}Hour of Day\n", " ".repeat(GUTTER)));

    out.push('\n');
    out.push_str("LEGEND:\n");
    out.push_str("  + = Optimistic  |  o = Pessimistic  |  * = Average\n");
    out.push_str(&format!(
        "  B = Best ({}, {:.1} min)  |  W = Worst ({}, {:.1} min)\n",
        points[best_idx].departure.format("%H:%M"),
        points[best_idx].average,
        points[worst_idx].departure.format("%H:%M"),
        points[worst_idx].average,
    ));
    out
}

/// Hour labels written positionally under their columns. A label that
/// would touch one already placed is skipped, so 1-2 digit hours stay
/// readable even at 60-minute intervals.
fn hour_label_row(points: &[SeriesPoint], width: usize) -> String {
    let mut cells = vec![' '; GUTTER + width + 2];
    for (col, pt) in points.iter().enumerate() {
        if pt.departure.minute() != 0 {
            continue;
        }
        let label = pt.departure.hour().to_string();
        let at = GUTTER + col;
        let claimed = (at - 1)..(at + label.len());
        if claimed.clone().any(|i| cells[i] != ' ') {
            continue;
        }
        for (i, ch) in label.chars().enumerate() {
            cells[at + i] = ch;
        }
    }
    let mut line: String = cells.into_iter().collect();
    line.truncate(line.trim_end().len());
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone};
    use chrono_tz::America::Los_Angeles;
    use chrono_tz::Tz;

    fn instant(h: u32, m: u32) -> DateTime<Tz> {
        Los_Angeles.with_ymd_and_hms(2025, 6, 2, h, m, 0).unwrap()
    }

    fn point(h: u32, m: u32, optimistic: f64, pessimistic: f64) -> SeriesPoint {
        SeriesPoint {
            departure: instant(h, m),
            optimistic,
            pessimistic,
            average: (optimistic + pessimistic) / 2.0,
        }
    }

    fn plot_cell(chart: &str, row: usize, col: usize) -> char {
        chart
            .lines()
            .nth(row)
            .and_then(|l| l.chars().nth(GUTTER + col))
            .unwrap_or(' ')
    }

    #[test]
    fn three_column_chart_has_twenty_value_rows_and_trailer() {
        let points = vec![
            point(8, 0, 10.0, 14.0),
            point(8, 15, 12.0, 16.0),
            point(8, 30, 20.0, 24.0),
        ];
        let chart = render(&points, DEFAULT_HEIGHT);
        let lines: Vec<&str> = chart.lines().collect();
        // 20 value rows + axis + hour labels + caption + blank + 3 legend lines
        assert_eq!(lines.len(), DEFAULT_HEIGHT + 7);
        for line in &lines[..DEFAULT_HEIGHT] {
            assert!(line.contains(" min | "), "value row missing gutter: {line}");
        }
        assert!(lines[DEFAULT_HEIGHT].contains("+---"));
        assert_eq!(lines[DEFAULT_HEIGHT + 2].trim(), "Hour of Day");
        assert!(lines[DEFAULT_HEIGHT + 4].starts_with("LEGEND"));
    }

    #[test]
    fn scale_bounds_come_from_optimistic_and_pessimistic() {
        let points = vec![point(8, 0, 10.0, 30.0), point(8, 15, 12.0, 28.0)];
        let chart = render(&points, 20);
        // Row 0 = 30 min (pessimistic max), bottom row = 10 min (optimistic min).
        assert!(chart.lines().next().unwrap().starts_with(" 30 min |"));
        assert!(chart.lines().nth(19).unwrap().starts_with(" 10 min |"));
        // Max pessimistic sits on the top row, min optimistic on the bottom.
        assert_eq!(plot_cell(&chart, 0, 0), 'o');
        assert_eq!(plot_cell(&chart, 19, 0), '+');
    }

    #[test]
    fn best_and_worst_markers_override_series_markers() {
        let points = vec![
            point(8, 0, 10.0, 14.0),
            point(8, 15, 12.0, 16.0),
            point(8, 30, 20.0, 24.0),
            point(8, 45, 15.0, 19.0),
        ];
        let chart = render(&points, 20);
        let plot: String = chart.lines().take(20).collect();
        assert_eq!(plot.matches('B').count(), 1);
        assert_eq!(plot.matches('W').count(), 1);
        let legend = chart.lines().last().unwrap();
        assert!(legend.contains("Best (08:00, 12.0 min)"));
        assert!(legend.contains("Worst (08:30, 22.0 min)"));
    }

    #[test]
    fn average_marker_overwrites_series_markers() {
        // Flat series: every marker collapses to the bottom row, and the
        // average overwrites the 'o' placed first. The single point is both
        // best and worst; worst is drawn last.
        let points = vec![point(8, 0, 10.0, 10.0), point(8, 15, 10.0, 10.0)];
        let chart = render(&points, 20);
        assert_eq!(plot_cell(&chart, 19, 0), 'W');
        assert_eq!(plot_cell(&chart, 19, 1), '*');
    }

    #[test]
    fn hour_labels_sit_under_their_columns() {
        let points = vec![
            point(8, 0, 10.0, 14.0),
            point(8, 15, 11.0, 15.0),
            point(8, 30, 12.0, 16.0),
            point(8, 45, 13.0, 17.0),
            point(9, 0, 14.0, 18.0),
        ];
        let chart = render(&points, 20);
        let labels = chart.lines().nth(21).unwrap();
        assert_eq!(labels.chars().nth(GUTTER), Some('8'));
        assert_eq!(labels.chars().nth(GUTTER + 4), Some('9'));
    }

    #[test]
    fn colliding_hour_labels_are_skipped() {
        // 60-minute interval: columns are adjacent, "10" would touch "9".
        let points = vec![
            point(9, 0, 10.0, 14.0),
            point(10, 0, 11.0, 15.0),
            point(11, 0, 12.0, 16.0),
        ];
        let chart = render(&points, 20);
        let labels = chart.lines().nth(21).unwrap();
        assert_eq!(&labels[GUTTER..], "9 11");
    }
}
