//! Export computed results to CSV.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream
//! scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{DerivedSeries, Kpi, Series};
use crate::error::AppError;

/// Write the KPI board to a CSV file.
pub fn write_kpis_csv(path: &Path, kpis: &[Kpi]) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create KPI CSV '{}': {e}", path.display())))?;

    writeln!(file, "label,value,date")
        .map_err(|e| AppError::new(2, format!("Failed to write KPI CSV header: {e}")))?;

    for kpi in kpis {
        writeln!(
            file,
            "{},{:.4},{}",
            escape_csv_field(&kpi.label),
            kpi.value,
            kpi.date.map(|d| d.to_string()).unwrap_or_default(),
        )
        .map_err(|e| AppError::new(2, format!("Failed to write KPI CSV row: {e}")))?;
    }

    Ok(())
}

/// Write a derived (smoothed) series to a CSV file.
pub fn write_trend_csv(path: &Path, trend: &DerivedSeries) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create trend CSV '{}': {e}", path.display()))
    })?;

    writeln!(file, "date,rolling_mean")
        .map_err(|e| AppError::new(2, format!("Failed to write trend CSV header: {e}")))?;

    for (date, value) in trend.points() {
        writeln!(file, "{date},{value:.4}")
            .map_err(|e| AppError::new(2, format!("Failed to write trend CSV row: {e}")))?;
    }

    Ok(())
}

/// Write a full series back out as a dataset CSV (used by `covd sample`).
pub fn write_series_csv(path: &Path, series: &Series) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create dataset CSV '{}': {e}", path.display()))
    })?;

    let names: Vec<&str> = series.column_names().collect();
    writeln!(file, "date,{}", names.join(","))
        .map_err(|e| AppError::new(2, format!("Failed to write dataset CSV header: {e}")))?;

    // Columns resolved from column_names() always exist.
    let mut columns = Vec::with_capacity(names.len());
    for name in &names {
        columns.push(series.column(name).map_err(|e| AppError::new(4, e.to_string()))?);
    }

    for (row, date) in series.dates().iter().enumerate() {
        let mut line = date.to_string();
        for values in &columns {
            line.push(',');
            line.push_str(&format_cell(values[row]));
        }
        writeln!(file, "{line}")
            .map_err(|e| AppError::new(2, format!("Failed to write dataset CSV row: {e}")))?;
    }

    Ok(())
}

/// Counts serialize without a fractional part; anything else keeps full
/// precision so a written file re-ingests losslessly.
fn format_cell(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_render_counts_without_fraction() {
        assert_eq!(format_cell(1234.0), "1234");
        assert_eq!(format_cell(17.5), "17.5");
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        assert_eq!(escape_csv_field("Total cases"), "Total cases");
        assert_eq!(
            escape_csv_field("New cases (period, sum)"),
            "\"New cases (period, sum)\""
        );
    }
}
