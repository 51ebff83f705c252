// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use crate::aggregation::VolatilityMatrix;
use crate::error::{FxError, Result};
use crate::models::Currency;
use crate::sections::{InsightsReport, OverviewReport, SectionReport, TrendsReport, VolatilityReport};
use crate::utils::format_stat;
use chrono::Local;
use plotters::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const COLOR_EMERALD: RGBColor = RGBColor(16, 185, 129);
const COLOR_ROSE: RGBColor = RGBColor(244, 63, 94);
const COLOR_BLUE: RGBColor = RGBColor(59, 130, 246);
const COLOR_AMBER: RGBColor = RGBColor(245, 158, 11);
const COLOR_PURPLE: RGBColor = RGBColor(139, 92, 246);
const COLOR_SLATE: RGBColor = RGBColor(100, 116, 139);
const COLOR_GRAY_LIGHT: RGBColor = RGBColor(243, 244, 246);

const CHART_COLORS: [RGBColor; Currency::COUNT] = [
    COLOR_BLUE,
    COLOR_EMERALD,
    COLOR_AMBER,
    COLOR_ROSE,
    COLOR_PURPLE,
];

fn chart_err<E: std::fmt::Display>(e: E) -> FxError {
    FxError::Chart(e.to_string())
}

fn currency_color(currency: Currency) -> RGBColor {
    CHART_COLORS[currency.index()]
}

/// Draws the charts belonging to a report into `output_dir` and returns the
/// written files. Sections without charts yield an empty list.
pub fn generate_charts(report: &SectionReport, output_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;
    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let path = |name: &str| output_dir.join(format!("{}_{}.svg", name, timestamp));

    let mut written = Vec::new();
    match report {
        SectionReport::Overview(overview) => {
            let target = path("average_rates");
            if create_average_chart(overview, &target)? {
                written.push(target);
            }
        }
        SectionReport::Trends(trends) => {
            let target = path("rate_trends");
            if create_trend_chart(trends, &target)? {
                written.push(target);
            }
        }
        SectionReport::Insights(insights) => {
            let target = path(&format!("seasonality_{}", insights.currency.code().to_lowercase()));
            if create_seasonal_chart(insights, &target)? {
                written.push(target);
            }
        }
        SectionReport::Volatility(volatility) => {
            let target = path("stability_ranking");
            if create_stability_chart(volatility, &target)? {
                written.push(target);
            }
            let target = path("yearly_volatility");
            if create_volatility_heatmap(&volatility.matrix, &target)? {
                written.push(target);
            }
        }
        SectionReport::Export(_) => {}
    }

    for file in &written {
        println!("✅ Generated chart: {}", file.display());
    }
    Ok(written)
}

/// Vertical bars, one per label. Undefined values leave a gap and are
/// labelled "NaN". Returns false when there is nothing to draw.
fn draw_bar_chart(
    output_path: &Path,
    title: &str,
    y_desc: &str,
    bars: &[(String, f64, RGBColor)],
) -> Result<bool> {
    let max_value = bars
        .iter()
        .map(|(_, v, _)| *v)
        .filter(|v| v.is_finite())
        .fold(f64::NAN, f64::max);
    if max_value.is_nan() {
        return Ok(false);
    }

    let root = SVGBackend::new(output_path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let count = bars.len() as i32;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30).into_font().color(&BLACK))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(0i32..count, 0.0..(max_value * 1.1).max(1e-9))
        .map_err(chart_err)?;

    let label_at = |x: &i32| {
        bars.get(*x as usize)
            .map(|(label, _, _)| label.clone())
            .unwrap_or_default()
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len())
        .x_label_formatter(&label_at)
        .y_desc(y_desc)
        .axis_desc_style(("sans-serif", 16))
        .draw()
        .map_err(chart_err)?;

    for (i, (_, value, color)) in bars.iter().enumerate() {
        let i = i as i32;
        if value.is_finite() {
            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(i, 0.0), (i + 1, *value)],
                    color.mix(0.8).filled(),
                )))
                .map_err(chart_err)?;
        }
        let label_y = if value.is_finite() { *value } else { 0.0 };
        chart
            .draw_series(std::iter::once(Text::new(
                format_stat(*value),
                (i, label_y + max_value * 0.02),
                ("sans-serif", 14).into_font(),
            )))
            .map_err(chart_err)?;
    }

    root.present().map_err(chart_err)?;
    Ok(true)
}

fn create_average_chart(report: &OverviewReport, output_path: &Path) -> Result<bool> {
    let bars: Vec<_> = report
        .averages
        .iter()
        .map(|(c, avg)| (c.code().to_string(), *avg, currency_color(*c)))
        .collect();
    draw_bar_chart(output_path, "Average Exchange Rate by Currency", "LKR per unit", &bars)
}

fn create_stability_chart(report: &VolatilityReport, output_path: &Path) -> Result<bool> {
    let bars: Vec<_> = report
        .ranking
        .iter()
        .map(|r| (r.currency.code().to_string(), r.std, currency_color(r.currency)))
        .collect();
    draw_bar_chart(
        output_path,
        "Currency Stability (lower is more stable)",
        "Standard deviation (LKR)",
        &bars,
    )
}

fn create_seasonal_chart(report: &InsightsReport, output_path: &Path) -> Result<bool> {
    let color = currency_color(report.currency);
    let bars: Vec<_> = report
        .seasonal
        .iter()
        .map(|s| (format!("{} {}", s.month_name, s.year), s.mean, color))
        .collect();
    draw_bar_chart(
        output_path,
        &format!("Monthly Averages: {}", report.currency.label()),
        "LKR per unit",
        &bars,
    )
}

/// One line per currency over a shared month axis.
fn create_trend_chart(report: &TrendsReport, output_path: &Path) -> Result<bool> {
    let months: Vec<_> = {
        let mut months: Vec<_> = report.series.iter().map(|r| r.month).collect();
        months.sort();
        months.dedup();
        months
    };
    if months.is_empty() {
        return Ok(false);
    }
    let position: BTreeMap<_, i32> = months
        .iter()
        .enumerate()
        .map(|(i, m)| (*m, i as i32))
        .collect();

    let (low, high) = report
        .series
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
            (lo.min(r.rate), hi.max(r.rate))
        });
    let padding = ((high - low) * 0.05).max(1.0);

    let root = SVGBackend::new(output_path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Exchange Rates Against LKR",
            ("sans-serif", 30).into_font().color(&BLACK),
        )
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(0i32..months.len() as i32, (low - padding).max(0.0)..(high + padding))
        .map_err(chart_err)?;

    let month_label = |x: &i32| {
        months
            .get(*x as usize)
            .map(|m| m.format("%Y-%m").to_string())
            .unwrap_or_default()
    };
    chart
        .configure_mesh()
        .x_labels(12)
        .x_label_formatter(&month_label)
        .y_desc("LKR per unit")
        .axis_desc_style(("sans-serif", 16))
        .draw()
        .map_err(chart_err)?;

    for currency in &report.currencies {
        let color = currency_color(*currency);
        let points: Vec<(i32, f64)> = report
            .series
            .iter()
            .filter(|r| r.currency == *currency)
            .filter_map(|r| position.get(&r.month).map(|x| (*x, r.rate)))
            .collect();
        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))
            .map_err(chart_err)?
            .label(currency.code())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(true)
}

/// Currency x year grid shaded by each currency's relative volatility.
fn create_volatility_heatmap(matrix: &VolatilityMatrix, output_path: &Path) -> Result<bool> {
    if matrix.years.is_empty() {
        return Ok(false);
    }

    let root = SVGBackend::new(output_path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    root.draw_text(
        "Yearly Volatility (standard deviation)",
        &TextStyle::from(("sans-serif", 30).into_font()).color(&BLACK),
        (330, 30),
    )
    .map_err(chart_err)?;

    let left = 160;
    let top = 120;
    let cell_w = (1000 / matrix.years.len() as i32).max(40);
    let cell_h = 110;

    for (col, year) in matrix.years.iter().enumerate() {
        root.draw_text(
            &year.to_string(),
            &TextStyle::from(("sans-serif", 16).into_font()).color(&COLOR_SLATE),
            (left + col as i32 * cell_w + cell_w / 2 - 20, top - 30),
        )
        .map_err(chart_err)?;
    }

    for (row, currency) in Currency::ALL.iter().enumerate() {
        let y = top + row as i32 * cell_h;
        root.draw_text(
            currency.code(),
            &TextStyle::from(("sans-serif", 16).into_font()),
            (20, y + cell_h / 2 - 8),
        )
        .map_err(chart_err)?;

        let values: Vec<f64> = matrix
            .years
            .iter()
            .map(|year| matrix.get(*currency, *year).unwrap_or(f64::NAN))
            .collect();
        let row_max = values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max);

        for (col, value) in values.iter().enumerate() {
            let x = left + col as i32 * cell_w;
            let fill = if value.is_finite() && row_max > 0.0 {
                let intensity = value / row_max;
                RGBColor(
                    (255.0 - 11.0 * intensity) as u8,
                    (255.0 - 192.0 * intensity) as u8,
                    (255.0 - 161.0 * intensity) as u8,
                )
            } else {
                COLOR_GRAY_LIGHT
            };

            root.draw(&Rectangle::new(
                [(x, y), (x + cell_w - 4, y + cell_h - 4)],
                fill.filled(),
            ))
            .map_err(chart_err)?;
            root.draw_text(
                &format_stat(*value),
                &TextStyle::from(("sans-serif", 14).into_font()).color(&BLACK),
                (x + 8, y + cell_h / 2 - 7),
            )
            .map_err(chart_err)?;
        }
    }

    root.present().map_err(chart_err)?;
    Ok(true)
}
