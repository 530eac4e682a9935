//! Plotters-powered dashboard charts for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//! - easy to extend later (annotations, exportable PNG/SVG backends, etc.)
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};

/// A labeled series in `(day offset, value)` coordinates.
pub struct ChartLine {
    pub label: String,
    pub color: RGBColor,
    pub points: Vec<(f64, f64)>,
}

impl ChartLine {
    pub fn new(label: impl Into<String>, color: RGBColor, points: Vec<(f64, f64)>) -> Self {
        Self {
            label: label.into(),
            color,
            points,
        }
    }
}

/// A lightweight, render-only chart description.
///
/// The widget is intentionally data-driven: all series and bounds are computed
/// outside the render call. This keeps `render()` focused on drawing and makes
/// it easy to test/benchmark the data prep separately.
pub struct DashboardChart<'a> {
    /// Plain line series, drawn over the bands.
    pub lines: &'a [ChartLine],
    /// Stacked bands: pre-cumulated values, ordered back-to-front (the tallest
    /// cumulative series first). Each band fills down to the x axis, so later
    /// bands mask the lower part of earlier ones.
    pub bands: &'a [ChartLine],
    /// X bounds in day offsets from `base_date`.
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    /// Date corresponding to day offset 0 (used for tick labels).
    pub base_date: NaiveDate,
    pub y_label: String,
}

impl Widget for DashboardChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(ratatui::style::Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite())
            || x1 <= x0
            || y1 <= y0
        {
            return;
        }

        let base_date = self.base_date;

        // `plotters-ratatui-backend` draws Plotters primitives via Ratatui's
        // `Canvas` widget, which ultimately writes to the terminal buffer.
        //
        // We delegate rendering to the crate-provided widget helper to avoid
        // coupling our code to its internal backend types.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                // Small margins keep the chart readable without wasting space.
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 7)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Axes + tick labels.
            //
            // We disable the mesh lines to reduce visual clutter in low-resolution
            // terminal rendering; the axes + labels are usually enough.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("date")
                .y_desc(&self.y_label)
                .x_labels(4)
                .y_labels(5)
                .x_label_formatter(&|v| fmt_axis_date(base_date, *v))
                .y_label_formatter(&|v| fmt_axis_count(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // 1) Stacked bands, back to front.
            for band in self.bands {
                chart
                    .draw_series(
                        AreaSeries::new(band.points.iter().copied(), 0.0, band.color.mix(0.35))
                            .border_style(band.color),
                    )?
                    .label(band.label.clone())
                    .legend({
                        let color = band.color;
                        move |(x, y)| Rectangle::new([(x, y - 3), (x + 8, y + 3)], color.filled())
                    });
            }

            // 2) Line series on top.
            for line in self.lines {
                chart
                    .draw_series(LineSeries::new(line.points.iter().copied(), &line.color))?
                    .label(line.label.clone())
                    .legend({
                        let color = line.color;
                        move |(x, y)| PathElement::new(vec![(x, y), (x + 8, y)], color)
                    });
            }

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .label_font(("sans-serif", 10).into_font().color(&WHITE))
                .border_style(WHITE)
                .draw()?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

fn fmt_axis_date(base: NaiveDate, offset: f64) -> String {
    let date = base + Duration::days(offset.round() as i64);
    date.format("%m-%d").to_string()
}

/// Compact tick labels: people counts get large fast.
fn fmt_axis_count(v: f64) -> String {
    if v.abs() >= 1_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if v.abs() >= 10_000.0 {
        format!("{:.0}k", v / 1_000.0)
    } else if v.abs() >= 1_000.0 {
        format!("{:.1}k", v / 1_000.0)
    } else {
        format!("{v:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_counts_abbreviate() {
        assert_eq!(fmt_axis_count(950.0), "950");
        assert_eq!(fmt_axis_count(1_500.0), "1.5k");
        assert_eq!(fmt_axis_count(25_000.0), "25k");
        assert_eq!(fmt_axis_count(2_400_000.0), "2.4M");
    }

    #[test]
    fn axis_dates_offset_from_base() {
        let base = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        assert_eq!(fmt_axis_date(base, 0.0), "01-01");
        assert_eq!(fmt_axis_date(base, 31.0), "02-01");
    }
}
