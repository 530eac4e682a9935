//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory while computing KPIs and derived series
//! - exported to JSON/CSV
//! - reloaded later for chart-only rendering

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::MetricsError;

/// Which CSV schema to expect.
///
/// `Auto` means: resolve from the header row (`deaths_unvaccinated` implies
/// the vaccination dataset, `new_cases` implies the daily dataset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Auto,
    Vaccination,
    Daily,
}

/// Concrete dataset schema actually used after resolving `DatasetKind::Auto`.
///
/// The two observed schemas mix cumulative and per-period semantics
/// differently, so each variant carries its own KPI interpretation:
///
/// - `Vaccination`: period-aggregate columns; totals are sums over the series.
/// - `Daily`: explicit `new_*` (per-period) vs `total_*` (running cumulative)
///   columns; totals are the last value of the cumulative columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetVariant {
    Vaccination,
    Daily,
}

impl DatasetKind {
    pub fn to_variant(self) -> Option<DatasetVariant> {
        match self {
            DatasetKind::Auto => None,
            DatasetKind::Vaccination => Some(DatasetVariant::Vaccination),
            DatasetKind::Daily => Some(DatasetVariant::Daily),
        }
    }
}

impl From<DatasetVariant> for DatasetKind {
    fn from(value: DatasetVariant) -> Self {
        match value {
            DatasetVariant::Vaccination => DatasetKind::Vaccination,
            DatasetVariant::Daily => DatasetKind::Daily,
        }
    }
}

impl DatasetVariant {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            DatasetVariant::Vaccination => "vaccination",
            DatasetVariant::Daily => "daily",
        }
    }

    /// Columns that must be present for this variant.
    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            DatasetVariant::Vaccination => &[
                "confirmed_cases",
                "total_deaths",
                "recovered_cases",
                "deaths_unvaccinated",
                "deaths_after_1_dose",
                "deaths_after_2_doses",
                "alive_unvaccinated",
                "alive_after_1_dose",
                "alive_after_2_doses",
            ],
            DatasetVariant::Daily => &["new_cases", "new_deaths", "total_cases", "total_deaths"],
        }
    }

    /// Headline cases column charted and smoothed on the dashboard.
    pub fn cases_column(self) -> &'static str {
        match self {
            DatasetVariant::Vaccination => "confirmed_cases",
            DatasetVariant::Daily => "new_cases",
        }
    }

    /// Deaths column used for the peak KPI and the deaths chart.
    pub fn deaths_column(self) -> &'static str {
        match self {
            DatasetVariant::Vaccination => "total_deaths",
            DatasetVariant::Daily => "new_deaths",
        }
    }

    /// Per-vaccination-status death columns (line chart), if the variant has them.
    pub fn vaccination_death_columns(self) -> &'static [&'static str] {
        match self {
            DatasetVariant::Vaccination => &[
                "deaths_unvaccinated",
                "deaths_after_1_dose",
                "deaths_after_2_doses",
            ],
            DatasetVariant::Daily => &[],
        }
    }

    /// Columns feeding the stacked-area composition, if the variant has them.
    pub fn stack_columns(self) -> &'static [&'static str] {
        match self {
            DatasetVariant::Vaccination => &[
                "alive_unvaccinated",
                "alive_after_1_dose",
                "alive_after_2_doses",
            ],
            DatasetVariant::Daily => &[],
        }
    }
}

/// A named numeric column of a [`Series`].
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// An ordered time series: one date per observation plus an open, named
/// collection of numeric columns.
///
/// Invariants, enforced at construction:
///
/// - dates are strictly increasing (duplicates and out-of-order input are
///   rejected, since peak/rolling computations assume monotonic time)
/// - every column has exactly one value per date
///
/// A `Series` is immutable after construction; every metrics operation takes
/// it by shared reference and returns new values, so it can be shared across
/// readers without locking.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    dates: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl Series {
    /// Build a series, validating the ordering and shape invariants.
    pub fn new(dates: Vec<NaiveDate>, columns: Vec<Column>) -> Result<Self, MetricsError> {
        for pair in dates.windows(2) {
            if pair[1] <= pair[0] {
                let kind = if pair[1] == pair[0] {
                    "duplicate"
                } else {
                    "out-of-order"
                };
                return Err(MetricsError::malformed(
                    0,
                    format!("{kind} date {} (dates must be strictly increasing)", pair[1]),
                ));
            }
        }
        for col in &columns {
            if col.values.len() != dates.len() {
                return Err(MetricsError::malformed(
                    0,
                    format!(
                        "column `{}` has {} values for {} dates",
                        col.name,
                        col.values.len(),
                        dates.len()
                    ),
                ));
            }
        }
        Ok(Self { dates, columns })
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Observation dates, ascending.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Column names in input order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Values of a column, or `UnknownColumn` — never a silent default.
    pub fn column(&self, name: &str) -> Result<&[f64], MetricsError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
            .ok_or_else(|| MetricsError::unknown_column(name))
    }

    /// Check a variant's required columns, reporting the first missing one.
    pub fn require_columns(&self, names: &[&str]) -> Result<(), MetricsError> {
        for name in names {
            if !self.has_column(name) {
                return Err(MetricsError::schema(*name));
            }
        }
        Ok(())
    }
}

/// A maximum value paired with the date of its first occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    pub value: f64,
    pub date: NaiveDate,
}

/// A named scalar KPI derived from a series.
///
/// `date` is set for peak-style KPIs (the date the maximum occurred on) and
/// absent for totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub label: String,
    pub value: f64,
    pub date: Option<NaiveDate>,
}

impl Kpi {
    pub fn total(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            date: None,
        }
    }

    pub fn peak(label: impl Into<String>, peak: Peak) -> Self {
        Self {
            label: label.into(),
            value: peak.value,
            date: Some(peak.date),
        }
    }
}

/// A window-shortened sequence produced by a trailing-window aggregation.
///
/// The first defined position corresponds to the source series' `window - 1`
/// index; leading positions with insufficient history are absent rather than
/// zero, so `dates.len() == values.len() == source_len - window + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedSeries {
    pub column: String,
    pub window: usize,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

impl DerivedSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(date, value)` pairs in chronological order.
    pub fn points(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}

/// One row of a stacked composition: the date plus the requested columns'
/// values, preserving the requested column order (stacking order).
#[derive(Debug, Clone, PartialEq)]
pub struct StackSlice {
    pub date: NaiveDate,
    pub parts: Vec<(String, f64)>,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub csv_path: PathBuf,
    pub dataset: DatasetKind,
    /// Trailing window (observations) for the smoothed trend series.
    pub window: usize,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_kpis: Option<PathBuf>,
    pub export_trend: Option<PathBuf>,
    pub export_summary: Option<PathBuf>,
}

/// A saved dashboard summary file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryFile {
    pub tool: String,
    pub dataset: DatasetVariant,
    pub rows: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub kpis: Vec<Kpi>,
    pub trend: DerivedSeries,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn series_rejects_duplicate_dates() {
        let dates = vec![d(2021, 1, 1), d(2021, 1, 1)];
        let cols = vec![Column::new("x", vec![1.0, 2.0])];
        let err = Series::new(dates, cols).unwrap_err();
        assert!(matches!(err, MetricsError::MalformedInput { .. }));
    }

    #[test]
    fn series_rejects_out_of_order_dates() {
        let dates = vec![d(2021, 1, 2), d(2021, 1, 1)];
        let cols = vec![Column::new("x", vec![1.0, 2.0])];
        assert!(Series::new(dates, cols).is_err());
    }

    #[test]
    fn series_rejects_ragged_columns() {
        let dates = vec![d(2021, 1, 1), d(2021, 1, 2)];
        let cols = vec![Column::new("x", vec![1.0])];
        assert!(Series::new(dates, cols).is_err());
    }

    #[test]
    fn column_lookup_never_defaults() {
        let series = Series::new(
            vec![d(2021, 1, 1)],
            vec![Column::new("new_cases", vec![5.0])],
        )
        .unwrap();

        assert_eq!(series.column("new_cases").unwrap(), &[5.0]);
        let err = series.column("new_deaths").unwrap_err();
        assert_eq!(err, MetricsError::unknown_column("new_deaths"));
    }

    #[test]
    fn require_columns_reports_first_missing() {
        let series = Series::new(
            vec![d(2021, 1, 1)],
            vec![Column::new("new_cases", vec![5.0])],
        )
        .unwrap();

        let err = series
            .require_columns(DatasetVariant::Daily.required_columns())
            .unwrap_err();
        assert_eq!(err, MetricsError::schema("new_deaths"));
    }

    #[test]
    fn variant_resolution_round_trip() {
        assert_eq!(
            DatasetKind::Vaccination.to_variant(),
            Some(DatasetVariant::Vaccination)
        );
        assert_eq!(DatasetKind::Auto.to_variant(), None);
        assert_eq!(
            DatasetKind::from(DatasetVariant::Daily),
            DatasetKind::Daily
        );
    }
}
