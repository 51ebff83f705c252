// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Dashboard sections. Each section turns the shared table and the user's
//! query into a serializable report; rendering is left to the caller.

use crate::aggregation::{self, Description, MinMax, SeasonalAverage, VolatilityMatrix};
use crate::error::Result;
use crate::export::serialize_to_csv;
use crate::filter::filter_by_date_range;
use crate::models::{Currency, ExchangeRateTable, LongFormatRow, MonthlyRates, SummaryStatistic};
use chrono::NaiveDate;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Overview,
    Trends,
    Insights,
    Volatility,
    Export,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Overview,
        Section::Trends,
        Section::Insights,
        Section::Volatility,
        Section::Export,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::Overview => "Overview",
            Section::Trends => "Exchange Rate Trends",
            Section::Insights => "Currency Insights",
            Section::Volatility => "Volatility & Stability",
            Section::Export => "Data Export",
        }
    }
}

/// User selections feeding a section.
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Currency for single-currency views; falls back to the dashboard default.
    pub currency: Option<Currency>,
    /// Currencies plotted on the trends page; empty means all of them.
    pub currencies: Vec<Currency>,
    /// Inclusive month range applied before any aggregation.
    pub range: Option<(NaiveDate, NaiveDate)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverviewReport {
    pub rows: usize,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub averages: BTreeMap<Currency, f64>,
    pub ranges: BTreeMap<Currency, MinMax>,
    pub latest: Option<MonthlyRates>,
    pub contribution: BTreeMap<Currency, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendsReport {
    pub currencies: Vec<Currency>,
    pub series: Vec<LongFormatRow>,
    pub changes: BTreeMap<Currency, Option<f64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsightsReport {
    pub currency: Currency,
    pub summary: SummaryStatistic,
    pub description: Description,
    pub seasonal: Vec<SeasonalAverage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedCurrency {
    pub currency: Currency,
    pub std: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VolatilityReport {
    pub ranking: Vec<RankedCurrency>,
    pub matrix: VolatilityMatrix,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub table: ExchangeRateTable,
    pub csv: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "section", rename_all = "snake_case")]
pub enum SectionReport {
    Overview(OverviewReport),
    Trends(TrendsReport),
    Insights(InsightsReport),
    Volatility(VolatilityReport),
    Export(ExportReport),
}

/// Read-only view over the loaded table that answers section queries.
pub struct Dashboard<'a> {
    table: &'a ExchangeRateTable,
    default_currency: Currency,
}

impl<'a> Dashboard<'a> {
    pub fn new(table: &'a ExchangeRateTable, default_currency: Currency) -> Self {
        Self {
            table,
            default_currency,
        }
    }

    pub fn render(&self, section: Section, query: &Query) -> Result<SectionReport> {
        let table = self.scoped(query)?;
        log::debug!("Rendering {:?} over {} rows", section, table.len());

        let report = match section {
            Section::Overview => SectionReport::Overview(overview(&table)),
            Section::Trends => SectionReport::Trends(trends(&table, &query.currencies)),
            Section::Insights => SectionReport::Insights(insights(
                &table,
                query.currency.unwrap_or(self.default_currency),
            )),
            Section::Volatility => SectionReport::Volatility(volatility(&table)),
            Section::Export => SectionReport::Export(export(table.into_owned())?),
        };
        Ok(report)
    }

    fn scoped(&self, query: &Query) -> Result<Cow<'a, ExchangeRateTable>> {
        match query.range {
            Some((start, end)) => Ok(Cow::Owned(filter_by_date_range(self.table, start, end)?)),
            None => Ok(Cow::Borrowed(self.table)),
        }
    }
}

fn overview(table: &ExchangeRateTable) -> OverviewReport {
    let span = table.date_span();
    OverviewReport {
        rows: table.len(),
        start: span.map(|(s, _)| s),
        end: span.map(|(_, e)| e),
        averages: aggregation::average_by_currency(table),
        ranges: aggregation::min_max_by_currency(table),
        latest: aggregation::latest_rates(table).cloned(),
        contribution: aggregation::average_contribution(&aggregation::to_long_format(table)),
    }
}

fn trends(table: &ExchangeRateTable, selected: &[Currency]) -> TrendsReport {
    let currencies: Vec<Currency> = if selected.is_empty() {
        Currency::ALL.to_vec()
    } else {
        Currency::ALL
            .into_iter()
            .filter(|c| selected.contains(c))
            .collect()
    };

    let series = aggregation::to_long_format(table)
        .into_iter()
        .filter(|r| currencies.contains(&r.currency))
        .collect();
    let changes = currencies
        .iter()
        .map(|&c| (c, aggregation::percent_change(table, c)))
        .collect();

    TrendsReport {
        currencies,
        series,
        changes,
    }
}

fn insights(table: &ExchangeRateTable, currency: Currency) -> InsightsReport {
    InsightsReport {
        currency,
        summary: aggregation::summary_statistics(table, currency),
        description: aggregation::describe(table, currency),
        seasonal: aggregation::seasonal_averages(table, currency),
    }
}

fn volatility(table: &ExchangeRateTable) -> VolatilityReport {
    VolatilityReport {
        ranking: aggregation::stability_ranking(table)
            .into_iter()
            .map(|(currency, std)| RankedCurrency { currency, std })
            .collect(),
        matrix: aggregation::yearly_volatility_matrix(table),
    }
}

fn export(table: ExchangeRateTable) -> Result<ExportReport> {
    let bytes = serialize_to_csv(&table)?;
    Ok(ExportReport {
        table,
        csv: String::from_utf8_lossy(&bytes).into_owned(),
    })
}
