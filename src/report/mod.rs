//! Reporting utilities: KPI assembly and formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the metrics code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

pub mod format;

pub use format::*;

use crate::domain::{DatasetVariant, Kpi, Series};
use crate::error::MetricsError;
use crate::metrics::{last_value_of, peak_of, total_of};

/// Build the KPI board for a series under a variant's column semantics.
///
/// The vaccination dataset carries period aggregates, so its totals are sums;
/// the daily dataset carries explicit running totals, so its headline numbers
/// read the last cumulative value and only `new_*` columns are summed.
pub fn build_kpis(series: &Series, variant: DatasetVariant) -> Result<Vec<Kpi>, MetricsError> {
    let kpis = match variant {
        DatasetVariant::Vaccination => vec![
            Kpi::total("Total cases", total_of(series, "confirmed_cases")?),
            Kpi::total("Total deaths", total_of(series, "total_deaths")?),
            Kpi::total("Recovered", total_of(series, "recovered_cases")?),
            Kpi::peak("Peak deaths", peak_of(series, "total_deaths")?),
        ],
        DatasetVariant::Daily => vec![
            Kpi::total("Total cases", last_value_of(series, "total_cases")?),
            Kpi::total("Total deaths", last_value_of(series, "total_deaths")?),
            Kpi::total("New cases (period sum)", total_of(series, "new_cases")?),
            Kpi::peak("Peak daily deaths", peak_of(series, "new_deaths")?),
        ],
    };
    Ok(kpis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Column;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn daily_series() -> Series {
        Series::new(
            vec![d(2021, 3, 1), d(2021, 3, 2), d(2021, 3, 3)],
            vec![
                Column::new("new_cases", vec![100.0, 250.0, 175.0]),
                Column::new("new_deaths", vec![2.0, 9.0, 4.0]),
                Column::new("total_cases", vec![100.0, 350.0, 525.0]),
                Column::new("total_deaths", vec![2.0, 11.0, 15.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn daily_kpis_read_cumulative_columns_by_last_value() {
        let kpis = build_kpis(&daily_series(), DatasetVariant::Daily).unwrap();

        assert_eq!(kpis[0].label, "Total cases");
        assert_eq!(kpis[0].value, 525.0);
        assert_eq!(kpis[1].value, 15.0);
        assert_eq!(kpis[2].value, 525.0); // sum of new_cases
        assert_eq!(kpis[3].value, 9.0);
        assert_eq!(kpis[3].date, Some(d(2021, 3, 2)));
    }

    #[test]
    fn vaccination_kpis_sum_period_aggregates() {
        let series = Series::new(
            vec![d(2021, 1, 1), d(2021, 1, 2)],
            vec![
                Column::new("confirmed_cases", vec![10.0, 30.0]),
                Column::new("total_deaths", vec![1.0, 4.0]),
                Column::new("recovered_cases", vec![5.0, 20.0]),
            ],
        )
        .unwrap();

        let kpis = build_kpis(&series, DatasetVariant::Vaccination).unwrap();
        assert_eq!(kpis[0].value, 40.0);
        assert_eq!(kpis[1].value, 5.0);
        assert_eq!(kpis[2].value, 25.0);
        assert_eq!(kpis[3].value, 4.0);
        assert_eq!(kpis[3].date, Some(d(2021, 1, 2)));
    }

    #[test]
    fn kpis_over_missing_columns_fail() {
        let series = Series::new(
            vec![d(2021, 1, 1)],
            vec![Column::new("new_cases", vec![1.0])],
        )
        .unwrap();
        assert!(build_kpis(&series, DatasetVariant::Daily).is_err());
    }
}
