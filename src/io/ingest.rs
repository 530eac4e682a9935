//! CSV ingest and validation.
//!
//! This module turns a dataset CSV into a validated [`Series`].
//!
//! Design goals:
//!
//! - **Strict schema**: a `date` column is required; every other column is a
//!   numeric metric. Missing or malformed cells are hard errors with a 1-based
//!   CSV line number, never coerced to zero.
//! - **Strict ordering**: dates must be strictly increasing. Duplicates and
//!   out-of-order rows are rejected rather than silently sorted, since
//!   peak/rolling computations downstream assume monotonic time.
//! - **Separation of concerns**: no KPI logic here.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{Column, Series};
use crate::error::{AppError, MetricsError};

/// Load and validate a series from a CSV file on disk.
pub fn load_series(path: &Path) -> Result<Series, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    Ok(read_series(file)?)
}

/// Read and validate a series from any CSV byte stream.
pub fn read_series<R: Read>(input: R) -> Result<Series, MetricsError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| MetricsError::malformed(1, format!("failed to read CSV headers: {e}")))?
        .clone();

    let layout = HeaderLayout::from_headers(&headers)?;

    let mut dates: Vec<NaiveDate> = Vec::new();
    let mut columns: Vec<Column> = layout
        .metric_names
        .iter()
        .map(|name| Column::new(name.clone(), Vec::new()))
        .collect();

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;

        let record =
            result.map_err(|e| MetricsError::malformed(line, format!("CSV parse error: {e}")))?;

        let date = parse_date_cell(&record, &layout, line)?;
        if let Some(&prev) = dates.last() {
            if date <= prev {
                let kind = if date == prev { "duplicate" } else { "out-of-order" };
                return Err(MetricsError::malformed(
                    line,
                    format!("{kind} date {date} (dates must be strictly increasing)"),
                ));
            }
        }
        dates.push(date);

        for (slot, column) in columns.iter_mut().enumerate() {
            let value = parse_metric_cell(&record, &layout, slot, &column.name, line)?;
            column.values.push(value);
        }
    }

    Series::new(dates, columns)
}

/// Resolved header positions: the date column plus every metric column in
/// input order.
struct HeaderLayout {
    date_idx: usize,
    metric_names: Vec<String>,
    metric_idx: Vec<usize>,
}

impl HeaderLayout {
    fn from_headers(headers: &StringRecord) -> Result<Self, MetricsError> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut date_idx = None;
        let mut metric_names = Vec::new();
        let mut metric_idx = Vec::new();

        for (idx, raw) in headers.iter().enumerate() {
            let name = normalize_header_name(raw);
            if name.is_empty() {
                return Err(MetricsError::malformed(1, format!("empty header at column {}", idx + 1)));
            }
            if seen.insert(name.clone(), idx).is_some() {
                return Err(MetricsError::malformed(1, format!("duplicate column `{name}`")));
            }
            if name == "date" {
                date_idx = Some(idx);
            } else {
                metric_names.push(name);
                metric_idx.push(idx);
            }
        }

        let date_idx = date_idx.ok_or_else(|| MetricsError::schema("date"))?;
        if metric_names.is_empty() {
            return Err(MetricsError::schema("<numeric metric>"));
        }

        Ok(Self {
            date_idx,
            metric_names,
            metric_idx,
        })
    }
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿date"). If we don't strip it, schema validation
    // will incorrectly report a missing date column.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_date_cell(
    record: &StringRecord,
    layout: &HeaderLayout,
    line: usize,
) -> Result<NaiveDate, MetricsError> {
    let cell = record
        .get(layout.date_idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| MetricsError::malformed(line, "missing `date` value"))?;
    parse_date(cell).map_err(|msg| MetricsError::malformed(line, msg))
}

fn parse_metric_cell(
    record: &StringRecord,
    layout: &HeaderLayout,
    slot: usize,
    name: &str,
    line: usize,
) -> Result<f64, MetricsError> {
    let cell = record
        .get(layout.metric_idx[slot])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| MetricsError::malformed(line, format!("missing value in column `{name}`")))?;

    let value: f64 = cell.parse().map_err(|_| {
        MetricsError::malformed(line, format!("invalid number '{cell}' in column `{name}`"))
    })?;
    if !value.is_finite() {
        return Err(MetricsError::malformed(
            line,
            format!("non-finite value in column `{name}`"),
        ));
    }
    Ok(value)
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // We recommend ISO dates (`YYYY-MM-DD`), but in practice dataset exports
    // often use `DD/MM/YYYY` or `DD-MM-YYYY`. We accept a small set of common
    // formats to reduce friction while keeping parsing deterministic.
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "invalid date '{s}' (expected one of: YYYY-MM-DD, DD/MM/YYYY, DD-MM-YYYY, YYYY/MM/DD)"
    ))
}
