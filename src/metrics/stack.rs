//! Stacked-composition reshaping.
//!
//! Pass-through reshape feeding the stacked-area chart: one slice per
//! observation, pairing the date with the requested columns' values in the
//! requested order (which is the stacking order). No aggregation happens here.

use crate::domain::{Series, StackSlice};
use crate::error::MetricsError;

/// Reshape `columns` into per-date stack slices.
///
/// All requested columns must exist and contain only non-negative values; a
/// stacked composition is meaningless with negative parts. Both violations
/// report `InvalidComposition`.
pub fn stack_composition(
    series: &Series,
    columns: &[&str],
) -> Result<Vec<StackSlice>, MetricsError> {
    if columns.is_empty() {
        return Err(MetricsError::composition("no columns requested"));
    }

    let mut resolved = Vec::with_capacity(columns.len());
    for &name in columns {
        let values = series
            .column(name)
            .map_err(|_| MetricsError::composition(format!("unknown column `{name}`")))?;
        if let Some((i, v)) = values.iter().enumerate().find(|(_, v)| **v < 0.0) {
            return Err(MetricsError::composition(format!(
                "negative value {v} in `{name}` on {}",
                series.dates()[i]
            )));
        }
        resolved.push((name, values));
    }

    let slices = series
        .dates()
        .iter()
        .enumerate()
        .map(|(row, &date)| StackSlice {
            date,
            parts: resolved
                .iter()
                .map(|(name, values)| (name.to_string(), values[row]))
                .collect(),
        })
        .collect();

    Ok(slices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Column;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn alive_series() -> Series {
        Series::new(
            vec![d(2021, 1, 1), d(2021, 1, 2)],
            vec![
                Column::new("alive_unvaccinated", vec![90.0, 80.0]),
                Column::new("alive_after_1_dose", vec![8.0, 15.0]),
                Column::new("alive_after_2_doses", vec![2.0, 5.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn one_slice_per_row_in_requested_order() {
        let series = alive_series();
        let slices = stack_composition(
            &series,
            &["alive_after_2_doses", "alive_after_1_dose", "alive_unvaccinated"],
        )
        .unwrap();

        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].date, d(2021, 1, 1));
        assert_eq!(
            slices[0].parts,
            vec![
                ("alive_after_2_doses".to_string(), 2.0),
                ("alive_after_1_dose".to_string(), 8.0),
                ("alive_unvaccinated".to_string(), 90.0),
            ]
        );
        assert_eq!(slices[1].parts[2].1, 80.0);
    }

    #[test]
    fn negative_values_are_rejected() {
        let series = Series::new(
            vec![d(2021, 1, 1), d(2021, 1, 2)],
            vec![Column::new("alive_unvaccinated", vec![90.0, -1.0])],
        )
        .unwrap();

        let err = stack_composition(&series, &["alive_unvaccinated"]).unwrap_err();
        assert!(matches!(err, MetricsError::InvalidComposition { .. }));
        assert!(err.to_string().contains("2021-01-02"));
    }

    #[test]
    fn missing_column_is_rejected() {
        let series = alive_series();
        let err = stack_composition(&series, &["alive_unvaccinated", "alive_boosted"]).unwrap_err();
        assert!(matches!(err, MetricsError::InvalidComposition { .. }));
    }

    #[test]
    fn empty_request_is_rejected() {
        let series = alive_series();
        assert!(stack_composition(&series, &[]).is_err());
    }

    #[test]
    fn empty_series_yields_no_slices() {
        let series = Series::new(vec![], vec![Column::new("alive_unvaccinated", vec![])]).unwrap();
        let slices = stack_composition(&series, &["alive_unvaccinated"]).unwrap();
        assert!(slices.is_empty());
    }
}
