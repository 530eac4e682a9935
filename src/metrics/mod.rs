//! KPI and derived-series computations over a [`Series`].
//!
//! Responsibilities:
//!
//! - scalar KPIs: column totals, last cumulative values, peak lookups
//! - trailing-window smoothing (`rolling`)
//! - stacked-composition reshaping (`stack`)
//!
//! Every operation here is a stateless pure function of its series argument:
//! no I/O, no caching, no mutation. The two dataset variants differ in whether
//! a "total" is a sum over a per-period column or the last value of an
//! already-cumulative column, so both readings are exposed and the caller
//! picks per column.

pub mod rolling;
pub mod stack;

pub use rolling::*;
pub use stack::*;

use crate::domain::{Peak, Series};
use crate::error::MetricsError;

/// Sum of all values in `column` across the series.
///
/// The cumulative-style KPI for per-period columns. An empty series sums to
/// zero; a missing column is an error, never a silent default.
pub fn total_of(series: &Series, column: &str) -> Result<f64, MetricsError> {
    Ok(series.column(column)?.iter().sum())
}

/// Value of `column` in the chronologically last observation.
///
/// The KPI reading for columns that already hold a running cumulative total.
pub fn last_value_of(series: &Series, column: &str) -> Result<f64, MetricsError> {
    series
        .column(column)?
        .last()
        .copied()
        .ok_or(MetricsError::EmptySeries)
}

/// Maximum value of `column` and the date of its first occurrence.
///
/// Ties resolve to the earliest date (stable argmax).
pub fn peak_of(series: &Series, column: &str) -> Result<Peak, MetricsError> {
    let values = series.column(column)?;
    if values.is_empty() {
        return Err(MetricsError::EmptySeries);
    }

    let mut best = Peak {
        value: values[0],
        date: series.dates()[0],
    };
    for (i, &v) in values.iter().enumerate().skip(1) {
        // Strict comparison keeps the first occurrence on ties.
        if v > best.value {
            best = Peak {
                value: v,
                date: series.dates()[i],
            };
        }
    }
    Ok(best)
}
