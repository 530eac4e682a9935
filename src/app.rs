//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads/generates datasets
//! - runs the dashboard pipeline
//! - prints reports/charts
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, PlotArgs, SampleArgs, ShowArgs};
use crate::domain::DashboardConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `covd` binary.
pub fn run() -> Result<(), AppError> {
    // We want `covd data.csv` and `covd -w 14 data.csv` to behave like
    // `covd tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Show(args) => handle_show(args, OutputMode::Full),
        Command::Kpi(args) => handle_show(args, OutputMode::KpiOnly),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => crate::tui::run(args),
        Command::Sample(args) => handle_sample(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    KpiOnly,
}

fn handle_show(args: ShowArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = dashboard_config_from_args(&args);
    let run = pipeline::run_dashboard(&config)?;

    match mode {
        OutputMode::Full => {
            println!(
                "{}",
                crate::report::format_run_summary(&run.series, run.variant, &run.kpis, &run.trend)
            );

            if config.plot {
                let cases = crate::plot::render_ascii_trend(
                    &run.series,
                    run.variant.cases_column(),
                    Some(&run.trend),
                    config.plot_width,
                    config.plot_height,
                )?;
                println!("{cases}");

                let deaths = crate::plot::render_ascii_trend(
                    &run.series,
                    run.variant.deaths_column(),
                    None,
                    config.plot_width,
                    config.plot_height,
                )?;
                println!("{deaths}");
            }
        }
        OutputMode::KpiOnly => {
            println!("{}", crate::report::format_kpis(&run.kpis));
        }
    }

    // Optional exports.
    if let Some(path) = &config.export_kpis {
        crate::io::export::write_kpis_csv(path, &run.kpis)?;
    }
    if let Some(path) = &config.export_trend {
        crate::io::export::write_trend_csv(path, &run.trend)?;
    }
    if let Some(path) = &config.export_summary {
        let summary =
            crate::io::summary::build_summary(&run.series, run.variant, &run.kpis, &run.trend)?;
        crate::io::summary::write_summary_json(path, &summary)?;
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let summary = crate::io::summary::read_summary_json(&args.summary)?;

    println!(
        "Dataset: {} | rows={} | span {} .. {}\n",
        summary.dataset.display_name(),
        summary.rows,
        summary.first_date,
        summary.last_date
    );
    println!("{}", crate::report::format_kpis(&summary.kpis));

    let plot = crate::plot::render_ascii_derived(&summary.trend, args.width, args.height);
    println!("{plot}");
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let Some(variant) = args.dataset.to_variant() else {
        return Err(AppError::new(
            2,
            "`covd sample` needs a concrete --dataset (vaccination or daily).",
        ));
    };

    let series = crate::data::generate_series(&crate::data::SampleConfig {
        variant,
        days: args.days,
        seed: args.seed,
        start_date: args.start_date,
        population: args.population,
    })?;

    crate::io::export::write_series_csv(&args.out, &series)?;
    println!(
        "Wrote {} rows of {} data to '{}'.",
        series.len(),
        variant.display_name(),
        args.out.display()
    );
    Ok(())
}

pub fn dashboard_config_from_args(args: &ShowArgs) -> DashboardConfig {
    DashboardConfig {
        csv_path: args.csv.clone(),
        dataset: args.dataset,
        window: args.window,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_kpis: args.export_kpis.clone(),
        export_trend: args.export_trend.clone(),
        export_summary: args.export_summary.clone(),
    }
}

/// Rewrite argv so `covd <csv>` defaults to `covd tui <csv>`.
///
/// Rules:
/// - `covd data.csv ...`       -> `covd tui data.csv ...`
/// - `covd -w 14 data.csv`     -> `covd tui -w 14 data.csv`
/// - `covd --help/--version`   -> unchanged (show top-level help/version)
/// - `covd` (no args)          -> unchanged (clap prints usage)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "show" | "kpi" | "plot" | "tui" | "sample");
    if is_subcommand {
        return argv;
    }

    // Anything else (a flag or a CSV path) is treated as "tui arguments".
    argv.insert(1, "tui".to_string());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_csv_path_defaults_to_tui() {
        assert_eq!(
            rewrite_args(argv(&["covd", "data.csv"])),
            argv(&["covd", "tui", "data.csv"])
        );
        assert_eq!(
            rewrite_args(argv(&["covd", "-w", "14", "data.csv"])),
            argv(&["covd", "tui", "-w", "14", "data.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(argv(&["covd", "show", "data.csv"])),
            argv(&["covd", "show", "data.csv"])
        );
        assert_eq!(rewrite_args(argv(&["covd", "--help"])), argv(&["covd", "--help"]));
        assert_eq!(rewrite_args(argv(&["covd"])), argv(&["covd"]));
    }
}
