//! Ratatui-based terminal UI.
//!
//! The TUI renders the KPI board plus a small set of chart tabs (trend with
//! rolling mean, deaths, and the vaccination-specific views), and lets the
//! user adjust the smoothing window or reload the file without restarting.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use plotters::style::RGBColor;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
    Terminal,
};

use crate::app::pipeline::{self, DashboardRun};
use crate::cli::ShowArgs;
use crate::domain::{DatasetVariant, Series};
use crate::error::AppError;
use crate::report::format_count;

mod charts;

use charts::{ChartLine, DashboardChart};

// Series palette: keep high contrast for dark terminal backgrounds.
const COLOR_MEAN: RGBColor = RGBColor(0, 255, 255);
const COLOR_RAW: RGBColor = RGBColor(148, 148, 148);
const COLOR_DEATHS: RGBColor = RGBColor(220, 38, 38);
const COLOR_UNVAX: RGBColor = RGBColor(124, 35, 171);
const COLOR_DOSE1: RGBColor = RGBColor(245, 158, 11);
const COLOR_DOSE2: RGBColor = RGBColor(22, 163, 74);
const COLOR_ALIVE_UNVAX: RGBColor = RGBColor(148, 163, 184);
const COLOR_ALIVE_DOSE1: RGBColor = RGBColor(96, 165, 250);
const COLOR_ALIVE_DOSE2: RGBColor = RGBColor(34, 197, 94);

/// Start the TUI.
pub fn run(args: ShowArgs) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(args)?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Chart tabs; availability depends on the resolved dataset variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChartTab {
    Trend,
    Deaths,
    VaccinationDeaths,
    AliveComposition,
}

impl ChartTab {
    fn title(self) -> &'static str {
        match self {
            ChartTab::Trend => "Cases trend",
            ChartTab::Deaths => "Deaths",
            ChartTab::VaccinationDeaths => "Deaths by vaccination status",
            ChartTab::AliveComposition => "Alive population by vaccination status",
        }
    }
}

fn available_tabs(variant: DatasetVariant) -> &'static [ChartTab] {
    match variant {
        DatasetVariant::Vaccination => &[
            ChartTab::Trend,
            ChartTab::Deaths,
            ChartTab::VaccinationDeaths,
            ChartTab::AliveComposition,
        ],
        DatasetVariant::Daily => &[ChartTab::Trend, ChartTab::Deaths],
    }
}

struct App {
    config: crate::domain::DashboardConfig,
    run: Option<DashboardRun>,
    tab_idx: usize,
    status: String,
}

impl App {
    fn new(args: ShowArgs) -> Result<Self, AppError> {
        let config = crate::app::dashboard_config_from_args(&args);
        let run = pipeline::run_dashboard(&config)?;
        let status = format!("Loaded '{}'.", config.csv_path.display());
        Ok(Self {
            config,
            run: Some(run),
            tab_idx: 0,
            status,
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Right | KeyCode::Tab => self.cycle_tab(1),
            KeyCode::Left | KeyCode::BackTab => self.cycle_tab(-1),
            KeyCode::Char('+') | KeyCode::Char('=') => self.adjust_window(1),
            KeyCode::Char('-') => self.adjust_window(-1),
            KeyCode::Char('r') => self.reload(),
            _ => {}
        }
        false
    }

    fn tabs(&self) -> &'static [ChartTab] {
        self.run
            .as_ref()
            .map(|run| available_tabs(run.variant))
            .unwrap_or(&[ChartTab::Trend])
    }

    fn cycle_tab(&mut self, delta: i32) {
        let n = self.tabs().len() as i32;
        self.tab_idx = (self.tab_idx as i32 + delta).rem_euclid(n) as usize;
    }

    fn adjust_window(&mut self, delta: i64) {
        let Some(run) = &self.run else {
            return;
        };

        let window = (self.config.window as i64 + delta).max(1) as usize;
        if window == self.config.window {
            return;
        }

        let mut config = self.config.clone();
        config.window = window;
        // Recompute from the already-loaded series; an invalid window keeps
        // the previous state and only updates the status line.
        match pipeline::run_dashboard_with_series(&config, run.series.clone()) {
            Ok(new_run) => {
                self.config = config;
                self.run = Some(new_run);
                self.status = format!("window: {window}d");
            }
            Err(err) => self.status = err.to_string(),
        }
    }

    fn reload(&mut self) {
        match pipeline::run_dashboard(&self.config) {
            Ok(run) => {
                self.tab_idx = self.tab_idx.min(available_tabs(run.variant).len() - 1);
                self.run = Some(run);
                self.status = format!("Reloaded '{}'.", self.config.csv_path.display());
            }
            Err(err) => self.status = err.to_string(),
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("covd", Style::default().fg(Color::Cyan)),
            Span::raw(" — COVID-19 analysis dashboard"),
        ]));

        if let Some(run) = &self.run {
            let span = match (run.series.first_date(), run.series.last_date()) {
                (Some(first), Some(last)) => format!("{first} → {last}"),
                _ => "-".to_string(),
            };
            lines.push(Line::from(Span::styled(
                format!(
                    "dataset: {} | rows: {} | span: {span} | window: {}d",
                    run.variant.display_name(),
                    run.series.len(),
                    self.config.window,
                ),
                Style::default().fg(Color::Gray),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);

        self.draw_kpi_tiles(frame, chunks[0]);
        self.draw_chart(frame, chunks[1]);
    }

    fn draw_kpi_tiles(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(run) = &self.run else {
            return;
        };
        if run.kpis.is_empty() {
            return;
        }

        let constraints: Vec<Constraint> = run
            .kpis
            .iter()
            .map(|_| Constraint::Ratio(1, run.kpis.len() as u32))
            .collect();
        let tiles = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (kpi, tile) in run.kpis.iter().zip(tiles.iter()) {
            let mut lines = vec![Line::from(Span::styled(
                format_count(kpi.value),
                Style::default().add_modifier(Modifier::BOLD),
            ))];
            if let Some(date) = kpi.date {
                lines.push(Line::from(Span::styled(
                    date.to_string(),
                    Style::default().fg(Color::Gray),
                )));
            }
            let p = Paragraph::new(Text::from(lines)).block(
                Block::default()
                    .title(kpi.label.as_str())
                    .borders(Borders::ALL),
            );
            frame.render_widget(p, *tile);
        }
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let tab = self.tabs()[self.tab_idx.min(self.tabs().len() - 1)];
        let block = Block::default()
            .title(format!("◀ {} ▶", tab.title()))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(run) = &self.run else {
            let msg = Paragraph::new("Waiting for data...")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let Some(data) = chart_data(run, tab) else {
            let msg = Paragraph::new("Nothing to chart for this dataset.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let widget = DashboardChart {
            lines: &data.lines,
            bands: &data.bands,
            x_bounds: data.x_bounds,
            y_bounds: data.y_bounds,
            base_date: data.base_date,
            y_label: data.y_label,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ chart  +/- window  r reload  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Prepared series/bounds for one chart tab.
struct ChartData {
    lines: Vec<ChartLine>,
    bands: Vec<ChartLine>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    base_date: chrono::NaiveDate,
    y_label: String,
}

fn chart_data(run: &DashboardRun, tab: ChartTab) -> Option<ChartData> {
    let base_date = run.series.first_date()?;

    let (lines, bands, y_label) = match tab {
        ChartTab::Trend => {
            let raw = day_points(&run.series, run.variant.cases_column())?;
            let mean: Vec<(f64, f64)> = run
                .trend
                .points()
                .map(|(d, v)| ((d - base_date).num_days() as f64, v))
                .collect();
            (
                vec![
                    ChartLine::new(run.variant.cases_column(), COLOR_RAW, raw),
                    ChartLine::new(
                        format!("{}d mean", run.trend.window),
                        COLOR_MEAN,
                        mean,
                    ),
                ],
                Vec::new(),
                "cases".to_string(),
            )
        }
        ChartTab::Deaths => {
            let deaths = day_points(&run.series, run.variant.deaths_column())?;
            (
                Vec::new(),
                vec![ChartLine::new(run.variant.deaths_column(), COLOR_DEATHS, deaths)],
                "deaths".to_string(),
            )
        }
        ChartTab::VaccinationDeaths => {
            let columns = run.variant.vaccination_death_columns();
            if columns.len() != 3 {
                return None;
            }
            (
                vec![
                    ChartLine::new("unvaccinated", COLOR_UNVAX, day_points(&run.series, columns[0])?),
                    ChartLine::new("1 dose", COLOR_DOSE1, day_points(&run.series, columns[1])?),
                    ChartLine::new("2 doses", COLOR_DOSE2, day_points(&run.series, columns[2])?),
                ],
                Vec::new(),
                "deaths".to_string(),
            )
        }
        ChartTab::AliveComposition => {
            if run.composition.is_empty() {
                return None;
            }
            // Cumulate slice parts bottom-up, then draw back-to-front so the
            // top band (fully vaccinated) paints last.
            let mut c1 = Vec::with_capacity(run.composition.len());
            let mut c2 = Vec::with_capacity(run.composition.len());
            let mut c3 = Vec::with_capacity(run.composition.len());
            for slice in &run.composition {
                let x = (slice.date - base_date).num_days() as f64;
                let p0 = slice.parts.first().map(|(_, v)| *v).unwrap_or(0.0);
                let p1 = slice.parts.get(1).map(|(_, v)| *v).unwrap_or(0.0);
                let p2 = slice.parts.get(2).map(|(_, v)| *v).unwrap_or(0.0);
                c1.push((x, p0));
                c2.push((x, p0 + p1));
                c3.push((x, p0 + p1 + p2));
            }
            (
                Vec::new(),
                vec![
                    ChartLine::new("2 doses", COLOR_ALIVE_DOSE2, c3),
                    ChartLine::new("1 dose", COLOR_ALIVE_DOSE1, c2),
                    ChartLine::new("unvaccinated", COLOR_ALIVE_UNVAX, c1),
                ],
                "people".to_string(),
            )
        }
    };

    let (x_bounds, y_bounds) = bounds(lines.iter().chain(bands.iter()))?;
    Some(ChartData {
        lines,
        bands,
        x_bounds,
        y_bounds,
        base_date,
        y_label,
    })
}

/// A column as `(day offset, value)` points.
fn day_points(series: &Series, column: &str) -> Option<Vec<(f64, f64)>> {
    let first = series.first_date()?;
    let values = series.column(column).ok()?;
    Some(
        series
            .dates()
            .iter()
            .zip(values)
            .map(|(d, v)| ((*d - first).num_days() as f64, *v))
            .collect(),
    )
}

fn bounds<'a>(layers: impl Iterator<Item = &'a ChartLine>) -> Option<([f64; 2], [f64; 2])> {
    let mut x_max = f64::NEG_INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    let mut any = false;
    for layer in layers {
        for &(x, y) in &layer.points {
            any = true;
            x_max = x_max.max(x);
            y_max = y_max.max(y);
        }
    }
    if !any || !x_max.is_finite() || !y_max.is_finite() {
        return None;
    }

    // Counts start at zero; pad the top so peaks don't touch the frame.
    let x_bounds = [0.0, x_max.max(1.0)];
    let y_bounds = [0.0, (y_max * 1.05).max(1.0)];
    Some((x_bounds, y_bounds))
}
