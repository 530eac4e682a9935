//! Command-line parsing for the CSV-based COVID dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the metrics code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::domain::DatasetKind;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "covd", version, about = "COVID-19 Analysis Dashboard (CSV-based)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load a dataset, print the KPI board and trend charts, optionally export.
    Show(ShowArgs),
    /// Print the KPI board only (useful for scripting).
    Kpi(ShowArgs),
    /// Plot a previously exported summary JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying pipeline as `covd show`, but renders
    /// results in a terminal UI using Ratatui.
    Tui(ShowArgs),
    /// Write a synthetic sample dataset CSV.
    Sample(SampleArgs),
}

/// Common options for loading and displaying a dataset.
#[derive(Debug, Parser, Clone)]
pub struct ShowArgs {
    /// Path to the dataset CSV.
    pub csv: PathBuf,

    /// Which schema to expect (auto-detected from the header by default).
    #[arg(short = 'd', long, value_enum, default_value_t = DatasetKind::Auto)]
    pub dataset: DatasetKind,

    /// Trailing window (observations) for the smoothed trend.
    #[arg(short = 'w', long, default_value_t = 7)]
    pub window: usize,

    /// Render ASCII charts in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal charts.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the KPI board to CSV.
    #[arg(long = "export-kpis")]
    pub export_kpis: Option<PathBuf>,

    /// Export the smoothed trend series to CSV.
    #[arg(long = "export-trend")]
    pub export_trend: Option<PathBuf>,

    /// Export the run summary (metadata + KPIs + trend) to JSON.
    #[arg(long = "export-summary")]
    pub export_summary: Option<PathBuf>,
}

/// Options for `covd plot`.
#[derive(Debug, Parser, Clone)]
pub struct PlotArgs {
    /// Path to a summary JSON written by `covd show --export-summary`.
    pub summary: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// Options for `covd sample`.
#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Output CSV path.
    pub out: PathBuf,

    /// Which schema to generate (must be concrete, not `auto`).
    #[arg(short = 'd', long, value_enum, default_value_t = DatasetKind::Vaccination)]
    pub dataset: DatasetKind,

    /// Number of daily observations.
    #[arg(long, default_value_t = 365)]
    pub days: usize,

    /// Random seed (same seed, same file).
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// First observation date.
    #[arg(long, default_value = "2021-01-01")]
    pub start_date: NaiveDate,

    /// Country population the wave amplitudes are scaled to.
    #[arg(long, default_value_t = 1_000_000.0)]
    pub population: f64,
}
