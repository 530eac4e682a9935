//! Trailing-window rolling mean.
//!
//! Implementation notes:
//!
//! - O(n) sliding sum: each step subtracts the value leaving the window and
//!   adds the one entering it, instead of re-summing the whole window.
//! - The running sum is recomputed from scratch every [`RESUM_INTERVAL`]
//!   outputs so add/subtract rounding cannot accumulate over long series.
//! - Positions with insufficient history are absent from the output, not
//!   zero-filled; zeros would bias early-period trend charts toward false lows.

use crate::domain::{DerivedSeries, Series};
use crate::error::MetricsError;

/// How many sliding steps between full window re-summations.
const RESUM_INTERVAL: usize = 1024;

/// Trailing arithmetic mean of `column` over windows of `window` observations.
///
/// The result has exactly `series.len() - window + 1` positions; the first is
/// aligned to the source index `window - 1`. `window` must satisfy
/// `1 <= window <= series.len()`.
pub fn rolling_mean(
    series: &Series,
    column: &str,
    window: usize,
) -> Result<DerivedSeries, MetricsError> {
    let values = series.column(column)?;
    let len = values.len();
    if window == 0 || window > len {
        return Err(MetricsError::InvalidWindow { window, len });
    }

    let dates = series.dates();
    if window == 1 {
        // Identity case; a sliding update would not be bit-exact here.
        return Ok(DerivedSeries {
            column: column.to_string(),
            window,
            dates: dates.to_vec(),
            values: values.to_vec(),
        });
    }

    let n_out = len - window + 1;
    let mut out_dates = Vec::with_capacity(n_out);
    let mut out_values = Vec::with_capacity(n_out);

    let mut sum: f64 = values[..window].iter().sum();
    out_dates.push(dates[window - 1]);
    out_values.push(sum / window as f64);

    let mut steps_since_resum = 0usize;
    for i in window..len {
        steps_since_resum += 1;
        if steps_since_resum == RESUM_INTERVAL {
            sum = values[i + 1 - window..=i].iter().sum();
            steps_since_resum = 0;
        } else {
            sum += values[i] - values[i - window];
        }
        out_dates.push(dates[i]);
        out_values.push(sum / window as f64);
    }

    Ok(DerivedSeries {
        column: column.to_string(),
        window,
        dates: out_dates,
        values: out_values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Column;
    use chrono::{Duration, NaiveDate};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn series_of(values: Vec<f64>) -> Series {
        let start = d(2021, 1, 1);
        let dates = (0..values.len())
            .map(|i| start + Duration::days(i as i64))
            .collect();
        Series::new(dates, vec![Column::new("new_deaths", values)]).unwrap()
    }

    #[test]
    fn window_two_matches_hand_computed_means() {
        let series = series_of(vec![10.0, 20.0, 15.0]);
        let trend = rolling_mean(&series, "new_deaths", 2).unwrap();

        assert_eq!(trend.values, vec![15.0, 17.5]);
        assert_eq!(trend.dates, vec![d(2021, 1, 2), d(2021, 1, 3)]);
    }

    #[test]
    fn window_one_is_identity() {
        let values = vec![3.0, 1.0, 4.0, 1.0, 5.0];
        let series = series_of(values.clone());
        let trend = rolling_mean(&series, "new_deaths", 1).unwrap();

        assert_eq!(trend.values, values);
        assert_eq!(trend.dates, series.dates());
    }

    #[test]
    fn output_length_is_len_minus_window_plus_one() {
        let series = series_of((0..30).map(f64::from).collect());
        for window in [1usize, 7, 30] {
            let trend = rolling_mean(&series, "new_deaths", window).unwrap();
            assert_eq!(trend.len(), 30 - window + 1);
            assert_eq!(trend.window, window);
        }
    }

    #[test]
    fn zero_and_oversized_windows_are_rejected() {
        let series = series_of(vec![1.0, 2.0, 3.0]);

        assert_eq!(
            rolling_mean(&series, "new_deaths", 0).unwrap_err(),
            MetricsError::InvalidWindow { window: 0, len: 3 }
        );
        assert_eq!(
            rolling_mean(&series, "new_deaths", 4).unwrap_err(),
            MetricsError::InvalidWindow { window: 4, len: 3 }
        );
    }

    #[test]
    fn unknown_column_is_rejected() {
        let series = series_of(vec![1.0, 2.0]);
        assert!(matches!(
            rolling_mean(&series, "cases", 2).unwrap_err(),
            MetricsError::UnknownColumn { .. }
        ));
    }

    #[test]
    fn sliding_sum_matches_naive_recomputation_past_resum_boundary() {
        // Long enough to cross RESUM_INTERVAL several times, with values that
        // exercise add/subtract rounding.
        let values: Vec<f64> = (0..3000)
            .map(|i| 100.0 * ((i as f64) * 0.37).sin() + 0.1 * i as f64)
            .collect();
        let series = series_of(values.clone());
        let window = 7;
        let trend = rolling_mean(&series, "new_deaths", window).unwrap();

        for (k, &got) in trend.values.iter().enumerate() {
            let naive: f64 = values[k..k + window].iter().sum::<f64>() / window as f64;
            assert!(
                (got - naive).abs() < 1e-6,
                "position {k}: sliding {got} vs naive {naive}"
            );
        }
    }
}
