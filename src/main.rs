// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use lkr_fx_dashboard::config;
use lkr_fx_dashboard::export::write_export;
use lkr_fx_dashboard::loader::parse_month;
use lkr_fx_dashboard::sections::{
    ExportReport, InsightsReport, OverviewReport, TrendsReport, VolatilityReport,
};
use lkr_fx_dashboard::utils::format_stat;
use lkr_fx_dashboard::visualizations::generate_charts;
use lkr_fx_dashboard::{Currency, Dashboard, DatasetLoader, ExchangeRateTable, Query, Section, SectionReport};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "lkr-fx-dashboard",
    version,
    about = "Sri Lanka FX dashboard: monthly exchange rates against LKR"
)]
struct Cli {
    /// Dashboard section to show
    #[arg(value_enum, default_value_t = Section::Overview)]
    section: Section,

    /// Show every section in order
    #[arg(long, conflicts_with = "section")]
    all: bool,

    /// Rates file (overrides config.toml and FX_DATA_PATH)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Directory for exports and charts
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Currency for the insights section, e.g. USD_LKR
    #[arg(long, value_parser = parse_currency)]
    currency: Option<Currency>,

    /// Comma separated currencies for the trends section
    #[arg(long, value_delimiter = ',', value_parser = parse_currency)]
    currencies: Vec<Currency>,

    /// First month to include (YYYY-MM or YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    from: Option<NaiveDate>,

    /// Last month to include (YYYY-MM or YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    to: Option<NaiveDate>,

    /// Print reports as JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Also draw SVG charts into the output directory
    #[arg(long)]
    charts: bool,
}

fn parse_currency(raw: &str) -> std::result::Result<Currency, String> {
    raw.parse::<Currency>().map_err(|e| e.to_string())
}

fn parse_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    parse_month(raw).ok_or_else(|| format!("invalid date '{}'", raw))
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();
    let cli = Cli::parse();

    let mut config = config::load_config()
        .context("Failed to read config.toml")?
        .with_env_overrides();
    if let Some(data) = cli.data.clone() {
        config.data_path = data;
    }
    if let Some(dir) = cli.output_dir.clone() {
        config.output_dir = dir;
    }

    let loader = DatasetLoader::new(&config.data_path);
    let table = loader.load()?;
    if !cli.json {
        println!("✅ Loaded {} months from {}", table.len(), loader.path().display());
    }
    let dashboard = Dashboard::new(table, config.default_currency);

    let query = Query {
        currency: cli.currency,
        currencies: cli.currencies.clone(),
        range: resolve_range(table, cli.from, cli.to),
    };

    let sections = if cli.all {
        Section::ALL.to_vec()
    } else {
        vec![cli.section]
    };

    for section in sections {
        let report = dashboard
            .render(section, &query)
            .with_context(|| format!("Failed to build the {} section", section.title()))?;

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("\n=== {} ===", section.title());
            print_report(&report);
        }

        if let SectionReport::Export(export) = &report {
            let path = write_export(&export.table, &config.output_dir)?;
            println!("📁 CSV file created: {}", path.display());
        }
        if cli.charts {
            generate_charts(&report, &config.output_dir)?;
        }
    }

    Ok(())
}

/// Fills a half-open range from the table's own span.
fn resolve_range(
    table: &ExchangeRateTable,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Option<(NaiveDate, NaiveDate)> {
    match (from, to, table.date_span()) {
        (None, None, _) => None,
        (Some(start), Some(end), _) => Some((start, end)),
        (Some(start), None, Some((_, last))) => Some((start, last)),
        (None, Some(end), Some((first, _))) => Some((first, end)),
        (Some(day), None, None) | (None, Some(day), None) => Some((day, day)),
    }
}

fn print_report(report: &SectionReport) {
    match report {
        SectionReport::Overview(r) => print_overview(r),
        SectionReport::Trends(r) => print_trends(r),
        SectionReport::Insights(r) => print_insights(r),
        SectionReport::Volatility(r) => print_volatility(r),
        SectionReport::Export(r) => print_export(r),
    }
}

fn print_overview(r: &OverviewReport) {
    match (r.start, r.end) {
        (Some(start), Some(end)) => println!("{} months from {} to {}", r.rows, start, end),
        _ => {
            println!("No data in the selected range");
            return;
        }
    }

    println!(
        "\n{:<10} {:>12} {:>12} {:>12} {:>12}",
        "Currency", "Average", "Min", "Max", "Latest"
    );
    for currency in Currency::ALL {
        let average = r.averages.get(&currency).copied().unwrap_or(f64::NAN);
        let (min, max) = r
            .ranges
            .get(&currency)
            .map(|m| (m.min, m.max))
            .unwrap_or((f64::NAN, f64::NAN));
        let latest = r.latest.as_ref().map(|l| l.rate(currency)).unwrap_or(f64::NAN);
        println!(
            "{:<10} {:>12} {:>12} {:>12} {:>12}",
            currency.code(),
            format_stat(average),
            format_stat(min),
            format_stat(max),
            format_stat(latest)
        );
    }
}

fn print_trends(r: &TrendsReport) {
    println!("{} observations", r.series.len());
    println!("\n{:<10} {:>14}", "Currency", "Change (%)");
    for currency in &r.currencies {
        let change = r.changes.get(currency).copied().flatten();
        let change = change.map(|c| format!("{:+.2}", c)).unwrap_or_else(|| "NA".to_string());
        println!("{:<10} {:>14}", currency.code(), change);
    }
}

fn print_insights(r: &InsightsReport) {
    println!("{} ({})", r.currency.label(), r.currency.code());
    let s = &r.summary;
    println!(
        "Mean {}  Min {}  Max {}  Std {}",
        format_stat(s.mean),
        format_stat(s.min),
        format_stat(s.max),
        format_stat(s.std)
    );
    let d = &r.description;
    println!(
        "Count {}  25% {}  50% {}  75% {}",
        d.count,
        format_stat(d.p25),
        format_stat(d.median),
        format_stat(d.p75)
    );

    println!("\n{:<6} {:<5} {:>12} {:>10} {:>6}", "Year", "Month", "Average", "Std", "N");
    for cell in &r.seasonal {
        println!(
            "{:<6} {:<5} {:>12} {:>10} {:>6}",
            cell.year,
            cell.month_name,
            format_stat(cell.mean),
            format_stat(cell.std),
            cell.count
        );
    }
}

fn print_volatility(r: &VolatilityReport) {
    println!("Stability ranking (most stable first)");
    for (rank, entry) in r.ranking.iter().enumerate() {
        println!("{:>2}. {:<10} {:>10}", rank + 1, entry.currency.code(), format_stat(entry.std));
    }

    print!("\n{:<10}", "Currency");
    for year in &r.matrix.years {
        print!(" {:>10}", year);
    }
    println!();
    for currency in Currency::ALL {
        print!("{:<10}", currency.code());
        for year in &r.matrix.years {
            let value = r.matrix.get(currency, *year).unwrap_or(f64::NAN);
            print!(" {:>10}", format_stat(value));
        }
        println!();
    }
}

fn print_export(r: &ExportReport) {
    println!("{} rows selected", r.table.len());
    print!("{}", r.csv);
}
