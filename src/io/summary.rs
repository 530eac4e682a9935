//! Read/write dashboard summary JSON files.
//!
//! Summary JSON is the "portable" representation of a dashboard run:
//! - resolved dataset variant + row/date span metadata
//! - the KPI board
//! - the smoothed trend series for chart-only rendering
//!
//! The schema is defined by `domain::SummaryFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{DatasetVariant, DerivedSeries, Kpi, Series, SummaryFile};
use crate::error::{AppError, MetricsError};

/// Assemble the summary for a completed run.
pub fn build_summary(
    series: &Series,
    variant: DatasetVariant,
    kpis: &[Kpi],
    trend: &DerivedSeries,
) -> Result<SummaryFile, MetricsError> {
    let (Some(first_date), Some(last_date)) = (series.first_date(), series.last_date()) else {
        return Err(MetricsError::EmptySeries);
    };

    Ok(SummaryFile {
        tool: "covd".to_string(),
        dataset: variant,
        rows: series.len(),
        first_date,
        last_date,
        kpis: kpis.to_vec(),
        trend: trend.clone(),
    })
}

/// Write a summary JSON file.
pub fn write_summary_json(path: &Path, summary: &SummaryFile) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create summary JSON '{}': {e}", path.display()))
    })?;

    serde_json::to_writer_pretty(file, summary)
        .map_err(|e| AppError::new(2, format!("Failed to write summary JSON: {e}")))?;

    Ok(())
}

/// Read a summary JSON file.
pub fn read_summary_json(path: &Path) -> Result<SummaryFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open summary JSON '{}': {e}", path.display()))
    })?;
    let summary: SummaryFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid summary JSON: {e}")))?;
    Ok(summary)
}
