//! Terminal report formatting.

use crate::domain::{DatasetVariant, DerivedSeries, Kpi, Series};

/// Format the full run summary (dataset stats + KPI board + insight line).
pub fn format_run_summary(
    series: &Series,
    variant: DatasetVariant,
    kpis: &[Kpi],
    trend: &DerivedSeries,
) -> String {
    let mut out = String::new();

    out.push_str("=== covd - COVID-19 dashboard ===\n");
    out.push_str(&format!("Dataset: {}\n", variant.display_name()));
    match (series.first_date(), series.last_date()) {
        (Some(first), Some(last)) => {
            out.push_str(&format!("Span: {first} .. {last} | rows={}\n", series.len()));
        }
        _ => out.push_str("Span: (empty)\n"),
    }
    out.push_str(&format!(
        "Columns: {}\n",
        series.column_names().collect::<Vec<_>>().join(", ")
    ));

    out.push('\n');
    out.push_str(&format_kpis(kpis));

    out.push_str(&format!(
        "\nTrend: {}-day mean of `{}` ({} points)\n",
        trend.window,
        trend.column,
        trend.len()
    ));

    if let Some(peak) = kpis.iter().find(|k| k.date.is_some()) {
        out.push_str(&format!(
            "Insight: highest {} ({}) occurred around {}\n",
            peak.label.to_lowercase(),
            format_count(peak.value),
            peak.date.unwrap_or_default()
        ));
    }

    out
}

/// Format the KPI board as aligned label/value lines.
pub fn format_kpis(kpis: &[Kpi]) -> String {
    let width = kpis.iter().map(|k| k.label.len()).max().unwrap_or(0);
    let mut out = String::new();
    for kpi in kpis {
        match kpi.date {
            Some(date) => out.push_str(&format!(
                "{:<width$}  {:>14}  ({date})\n",
                kpi.label,
                format_count(kpi.value),
            )),
            None => out.push_str(&format!(
                "{:<width$}  {:>14}\n",
                kpi.label,
                format_count(kpi.value),
            )),
        }
    }
    out
}

/// Format a count with thousands separators (`1234567` -> `1,234,567`).
///
/// KPI values are people counts; fractional parts only appear on smoothed
/// series and are rendered with one decimal there, not here.
pub fn format_count(value: f64) -> String {
    let negative = value < 0.0;
    let rounded = value.abs().round() as u64;
    let digits = rounded.to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Column;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn counts_are_grouped_by_thousands() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(999.0), "999");
        assert_eq!(format_count(1000.0), "1,000");
        assert_eq!(format_count(1234567.0), "1,234,567");
        assert_eq!(format_count(-4200.0), "-4,200");
    }

    #[test]
    fn summary_includes_span_kpis_and_insight() {
        let series = Series::new(
            vec![d(2021, 1, 1), d(2021, 1, 2)],
            vec![Column::new("new_deaths", vec![10.0, 20.0])],
        )
        .unwrap();
        let kpis = vec![
            Kpi::total("Total deaths", 30.0),
            Kpi::peak(
                "Peak daily deaths",
                crate::domain::Peak {
                    value: 20.0,
                    date: d(2021, 1, 2),
                },
            ),
        ];
        let trend = crate::metrics::rolling_mean(&series, "new_deaths", 2).unwrap();

        let text = format_run_summary(&series, DatasetVariant::Daily, &kpis, &trend);
        assert!(text.contains("2021-01-01 .. 2021-01-02"));
        assert!(text.contains("Total deaths"));
        assert!(text.contains("(2021-01-02)"));
        assert!(text.contains("Insight: highest peak daily deaths (20)"));
    }
}
