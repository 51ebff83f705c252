// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Descriptive statistics and reshapes over an [`ExchangeRateTable`].
//!
//! Standard deviations are sample deviations (n - 1) as computed by
//! `statrs`; groups with a single observation yield NaN.

use crate::models::{Currency, ExchangeRateTable, LongFormatRow, MonthlyRates, SummaryStatistic};
use crate::utils::{month_name, round2};
use serde::Serialize;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

/// Percentile summary of one currency column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Description {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalAverage {
    pub year: i32,
    pub month: u32,
    pub month_name: &'static str,
    pub mean: f64,
    pub std: f64,
    pub count: usize,
}

/// Standard deviation per currency and calendar year.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VolatilityMatrix {
    pub years: Vec<i32>,
    pub values: BTreeMap<Currency, BTreeMap<i32, f64>>,
}

impl VolatilityMatrix {
    pub fn get(&self, currency: Currency, year: i32) -> Option<f64> {
        self.values.get(&currency)?.get(&year).copied()
    }
}

fn sample_std(values: &[f64]) -> f64 {
    values.iter().std_dev()
}

/// Mean rate of every currency. Empty for an empty table.
pub fn average_by_currency(table: &ExchangeRateTable) -> BTreeMap<Currency, f64> {
    if table.is_empty() {
        return BTreeMap::new();
    }
    Currency::ALL
        .into_iter()
        .map(|c| (c, table.column(c).iter().mean()))
        .collect()
}

pub fn min_max_by_currency(table: &ExchangeRateTable) -> BTreeMap<Currency, MinMax> {
    if table.is_empty() {
        return BTreeMap::new();
    }
    Currency::ALL
        .into_iter()
        .map(|c| {
            let column = table.column(c);
            let range = MinMax {
                min: Statistics::min(column.iter()),
                max: Statistics::max(column.iter()),
            };
            (c, range)
        })
        .collect()
}

/// Unpivots the table: rows in table order, currencies in enumeration order.
pub fn to_long_format(table: &ExchangeRateTable) -> Vec<LongFormatRow> {
    table
        .rows()
        .iter()
        .flat_map(|row| {
            row.rates().map(|(currency, rate)| LongFormatRow {
                month: row.month,
                currency,
                rate,
            })
        })
        .collect()
}

/// Mean rate per currency computed from long-format rows.
pub fn average_contribution(rows: &[LongFormatRow]) -> BTreeMap<Currency, f64> {
    let mut grouped: BTreeMap<Currency, Vec<f64>> = BTreeMap::new();
    for row in rows {
        grouped.entry(row.currency).or_default().push(row.rate);
    }
    grouped
        .into_iter()
        .map(|(currency, rates)| (currency, rates.iter().mean()))
        .collect()
}

/// Mean, min, max and sample standard deviation, rounded to 2 decimals.
///
/// All fields are NaN for an empty table.
pub fn summary_statistics(table: &ExchangeRateTable, currency: Currency) -> SummaryStatistic {
    let column = table.column(currency);
    SummaryStatistic {
        mean: round2(column.iter().mean()),
        min: round2(Statistics::min(column.iter())),
        max: round2(Statistics::max(column.iter())),
        std: round2(sample_std(&column)),
    }
}

pub fn describe(table: &ExchangeRateTable, currency: Currency) -> Description {
    let column = table.column(currency);
    let count = column.len();
    let mean = column.iter().mean();
    let std = sample_std(&column);
    let min = Statistics::min(column.iter());
    let max = Statistics::max(column.iter());
    let mut sorted = column;
    sorted.sort_by(f64::total_cmp);
    Description {
        count,
        mean,
        std,
        min,
        p25: linear_quantile(&sorted, 0.25),
        median: linear_quantile(&sorted, 0.5),
        p75: linear_quantile(&sorted, 0.75),
        max,
    }
}

/// Quantile of sorted data, interpolating linearly between the neighbours of
/// position `(n - 1) * q`. NaN for empty input.
fn linear_quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = (sorted.len() - 1) as f64 * q;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let weight = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Average rate of one currency per (year, month), ordered by year and then
/// calendar month.
pub fn seasonal_averages(table: &ExchangeRateTable, currency: Currency) -> Vec<SeasonalAverage> {
    let mut groups: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();
    for row in table.rows() {
        groups
            .entry((row.year(), row.month_of_year()))
            .or_default()
            .push(row.rate(currency));
    }

    groups
        .into_iter()
        .map(|((year, month), rates)| SeasonalAverage {
            year,
            month,
            month_name: month_name(month),
            mean: rates.iter().mean(),
            std: sample_std(&rates),
            count: rates.len(),
        })
        .collect()
}

/// Currencies ordered from least to most volatile. Ties keep enumeration
/// order; undefined deviations sort last.
pub fn stability_ranking(table: &ExchangeRateTable) -> Vec<(Currency, f64)> {
    let mut ranking: Vec<(Currency, f64)> = Currency::ALL
        .into_iter()
        .map(|c| (c, sample_std(&table.column(c))))
        .collect();
    ranking.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranking
}

pub fn yearly_volatility_matrix(table: &ExchangeRateTable) -> VolatilityMatrix {
    let mut by_year: BTreeMap<i32, Vec<&MonthlyRates>> = BTreeMap::new();
    for row in table.rows() {
        by_year.entry(row.year()).or_default().push(row);
    }

    let mut values: BTreeMap<Currency, BTreeMap<i32, f64>> = BTreeMap::new();
    for (year, rows) in &by_year {
        for currency in Currency::ALL {
            let rates: Vec<f64> = rows.iter().map(|r| r.rate(currency)).collect();
            values
                .entry(currency)
                .or_default()
                .insert(*year, sample_std(&rates));
        }
    }

    VolatilityMatrix {
        years: by_year.into_keys().collect(),
        values,
    }
}

/// Percentage change from the first to the last row, in table order.
pub fn percent_change(table: &ExchangeRateTable, currency: Currency) -> Option<f64> {
    let rows = table.rows();
    if rows.len() < 2 {
        return None;
    }
    let first = rows.first()?.rate(currency);
    let last = rows.last()?.rate(currency);
    if first == 0.0 {
        return None;
    }
    Some((last - first) / first * 100.0)
}

/// Rates of the most recent month.
pub fn latest_rates(table: &ExchangeRateTable) -> Option<&MonthlyRates> {
    table.rows().iter().max_by_key(|r| r.month)
}
