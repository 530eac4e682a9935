//! Shared "dashboard pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV load -> variant resolution -> schema check -> KPIs -> trend -> composition
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::domain::{
    DashboardConfig, DatasetKind, DatasetVariant, DerivedSeries, Kpi, Series, StackSlice,
};
use crate::error::AppError;
use crate::metrics::{rolling_mean, stack_composition};

/// All computed outputs of a single dashboard run.
#[derive(Debug, Clone)]
pub struct DashboardRun {
    pub series: Series,
    pub variant: DatasetVariant,
    pub kpis: Vec<Kpi>,
    pub trend: DerivedSeries,
    /// Stacked composition slices (empty for variants without stackable columns).
    pub composition: Vec<StackSlice>,
}

/// Execute the full pipeline from a CSV path.
pub fn run_dashboard(config: &DashboardConfig) -> Result<DashboardRun, AppError> {
    let series = crate::io::ingest::load_series(&config.csv_path)?;
    run_dashboard_with_series(config, series)
}

/// Execute the pipeline with an already-loaded series.
///
/// This is useful for the TUI where we want to recompute (e.g., a new rolling
/// window) without re-reading the file.
pub fn run_dashboard_with_series(
    config: &DashboardConfig,
    series: Series,
) -> Result<DashboardRun, AppError> {
    if series.is_empty() {
        return Err(AppError::new(3, "Dataset has no observations."));
    }

    let variant = resolve_variant(config.dataset, &series)?;
    series.require_columns(variant.required_columns())?;

    let kpis = crate::report::build_kpis(&series, variant)?;
    let trend = rolling_mean(&series, variant.cases_column(), config.window)?;

    let composition = if variant.stack_columns().is_empty() {
        Vec::new()
    } else {
        stack_composition(&series, variant.stack_columns())?
    };

    Ok(DashboardRun {
        series,
        variant,
        kpis,
        trend,
        composition,
    })
}

/// Resolve `--dataset auto` to a concrete variant based on which columns exist.
pub fn resolve_variant(kind: DatasetKind, series: &Series) -> Result<DatasetVariant, AppError> {
    if let Some(variant) = kind.to_variant() {
        return Ok(variant);
    }

    // Auto resolution: the vaccination schema is the more specific one.
    if series.has_column("deaths_unvaccinated") {
        return Ok(DatasetVariant::Vaccination);
    }
    if series.has_column("new_cases") {
        return Ok(DatasetVariant::Daily);
    }

    Err(AppError::new(
        2,
        "Could not resolve `--dataset auto`: neither `deaths_unvaccinated` nor `new_cases` columns were found.",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{generate_series, SampleConfig};
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn config(window: usize) -> DashboardConfig {
        DashboardConfig {
            csv_path: PathBuf::from("unused.csv"),
            dataset: DatasetKind::Auto,
            window,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            export_kpis: None,
            export_trend: None,
            export_summary: None,
        }
    }

    fn sample(variant: DatasetVariant) -> Series {
        generate_series(&SampleConfig {
            variant,
            days: 90,
            seed: 7,
            start_date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            population: 500_000.0,
        })
        .unwrap()
    }

    #[test]
    fn auto_resolves_daily_and_smooths_new_cases() {
        let run = run_dashboard_with_series(&config(7), sample(DatasetVariant::Daily)).unwrap();

        assert_eq!(run.variant, DatasetVariant::Daily);
        assert_eq!(run.trend.column, "new_cases");
        assert_eq!(run.trend.len(), 90 - 7 + 1);
        assert!(run.composition.is_empty());
        assert_eq!(run.kpis.len(), 4);
    }

    #[test]
    fn auto_resolves_vaccination_and_builds_composition() {
        let run =
            run_dashboard_with_series(&config(7), sample(DatasetVariant::Vaccination)).unwrap();

        assert_eq!(run.variant, DatasetVariant::Vaccination);
        assert_eq!(run.trend.column, "confirmed_cases");
        assert_eq!(run.composition.len(), 90);
        assert_eq!(run.composition[0].parts.len(), 3);
    }

    #[test]
    fn oversized_window_is_an_input_error() {
        let err = run_dashboard_with_series(&config(91), sample(DatasetVariant::Daily)).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn empty_series_aborts_with_no_data_exit_code() {
        let series = Series::new(vec![], vec![crate::domain::Column::new("new_cases", vec![])])
            .unwrap();
        let err = run_dashboard_with_series(&config(7), series).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
