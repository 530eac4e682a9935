//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed values: `o`
//! - rolling-mean overlay: `*`

use chrono::NaiveDate;

use crate::domain::{DerivedSeries, Series};
use crate::error::MetricsError;

/// Render a column over time, with an optional rolling-mean overlay.
///
/// The x axis is the observation index (dates are labeled at the edges); the
/// y axis spans the combined range of the raw and smoothed values.
pub fn render_ascii_trend(
    series: &Series,
    column: &str,
    trend: Option<&DerivedSeries>,
    width: usize,
    height: usize,
) -> Result<String, MetricsError> {
    let values = series.column(column)?;
    if values.is_empty() {
        return Err(MetricsError::EmptySeries);
    }

    let mut layers = vec![(
        'o',
        values.iter().copied().enumerate().collect::<Vec<_>>(),
    )];
    let legend = match trend {
        Some(trend) => {
            // The first smoothed point aligns to source index `window - 1`.
            layers.push((
                '*',
                trend
                    .values
                    .iter()
                    .copied()
                    .enumerate()
                    .map(|(k, v)| (k + trend.window - 1, v))
                    .collect(),
            ));
            format!("o {column}   * {}-day mean", trend.window)
        }
        None => format!("o {column}"),
    };

    Ok(render_grid(
        &layers,
        series.len(),
        series.first_date(),
        series.last_date(),
        &legend,
        width,
        height,
    ))
}

/// Render a saved derived series on its own (no source-column overlay).
pub fn render_ascii_derived(trend: &DerivedSeries, width: usize, height: usize) -> String {
    if trend.is_empty() {
        return "(empty trend)".to_string();
    }

    let layers = vec![(
        '*',
        trend.values.iter().copied().enumerate().collect::<Vec<_>>(),
    )];
    let legend = format!("* {}-day mean of {}", trend.window, trend.column);

    render_grid(
        &layers,
        trend.len(),
        trend.dates.first().copied(),
        trend.dates.last().copied(),
        &legend,
        width,
        height,
    )
}

/// Shared fixed-grid renderer. `layers` hold `(x index, value)` points; later
/// layers overwrite earlier ones where they collide.
fn render_grid(
    layers: &[(char, Vec<(usize, f64)>)],
    n: usize,
    first_date: Option<NaiveDate>,
    last_date: Option<NaiveDate>,
    legend: &str,
    width: usize,
    height: usize,
) -> String {
    let width = width.clamp(20, 400);
    let height = height.clamp(5, 100);

    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for (_, points) in layers {
        for &(_, v) in points {
            y_min = y_min.min(v);
            y_max = y_max.max(v);
        }
    }
    if (y_max - y_min).abs() < 1e-12 {
        // Flat series still needs a non-degenerate axis.
        y_min -= 1.0;
        y_max += 1.0;
    }

    let col_of = |i: usize| -> usize {
        if n <= 1 { 0 } else { i * (width - 1) / (n - 1) }
    };
    let row_of = |v: f64| -> usize {
        let u = (y_max - v) / (y_max - y_min);
        ((u * (height - 1) as f64).round() as usize).min(height - 1)
    };

    let mut grid = vec![vec![' '; width]; height];
    for (glyph, points) in layers {
        for &(i, v) in points {
            grid[row_of(v)][col_of(i)] = *glyph;
        }
    }

    let top_label = format!("{y_max:.0}");
    let bottom_label = format!("{y_min:.0}");
    let margin = top_label.len().max(bottom_label.len());

    let mut out = String::new();
    for (row, cells) in grid.iter().enumerate() {
        let label: &str = if row == 0 {
            &top_label
        } else if row == height - 1 {
            &bottom_label
        } else {
            ""
        };
        out.push_str(&format!("{label:>margin$} |"));
        out.extend(cells.iter());
        out.push('\n');
    }

    out.push_str(&format!("{:>margin$} +{}\n", "", "-".repeat(width)));

    let first = first_date.map(|d| d.to_string()).unwrap_or_default();
    let last = last_date.map(|d| d.to_string()).unwrap_or_default();
    let gap = width.saturating_sub(first.len() + last.len());
    out.push_str(&format!("{:>margin$}  {first}{}{last}\n", "", " ".repeat(gap)));

    out.push_str(&format!("{:>margin$}  {legend}\n", ""));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Column;
    use chrono::Duration;

    fn series_of(values: Vec<f64>) -> Series {
        let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let dates = (0..values.len())
            .map(|i| start + Duration::days(i as i64))
            .collect();
        Series::new(dates, vec![Column::new("new_cases", values)]).unwrap()
    }

    #[test]
    fn extremes_land_on_top_and_bottom_rows() {
        let series = series_of(vec![0.0, 100.0]);
        let plot = render_ascii_trend(&series, "new_cases", None, 20, 5).unwrap();
        let lines: Vec<&str> = plot.lines().collect();

        // 5 grid rows + axis + date line + legend.
        assert_eq!(lines.len(), 8);
        assert!(lines[0].starts_with("100 |"));
        assert!(lines[0].ends_with('o'));
        assert!(lines[4].contains("0 |o"));
        assert!(lines[6].contains("2021-01-01"));
        assert!(lines[6].contains("2021-01-02"));
    }

    #[test]
    fn overlay_marks_smoothed_points() {
        let series = series_of(vec![10.0, 20.0, 15.0, 25.0, 30.0]);
        let trend = crate::metrics::rolling_mean(&series, "new_cases", 2).unwrap();
        let plot = render_ascii_trend(&series, "new_cases", Some(&trend), 40, 10).unwrap();

        assert!(plot.contains('o'));
        assert!(plot.contains('*'));
        assert!(plot.contains("2-day mean"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let series = series_of(vec![5.0, 9.0, 7.0]);
        let a = render_ascii_trend(&series, "new_cases", None, 30, 8).unwrap();
        let b = render_ascii_trend(&series, "new_cases", None, 30, 8).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn derived_series_renders_standalone() {
        let series = series_of(vec![10.0, 20.0, 15.0]);
        let trend = crate::metrics::rolling_mean(&series, "new_cases", 2).unwrap();
        let plot = render_ascii_derived(&trend, 30, 8);

        assert!(plot.contains('*'));
        assert!(plot.contains("2-day mean of new_cases"));
        assert!(plot.contains("2021-01-02"));
    }

    #[test]
    fn unknown_column_is_rejected() {
        let series = series_of(vec![1.0]);
        assert!(render_ascii_trend(&series, "nope", None, 30, 8).is_err());
    }
}
