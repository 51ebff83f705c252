// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use super::Currency;
use chrono::{Datelike, NaiveDate};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// One month of rates, one value per currency in enumeration order.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyRates {
    pub month: NaiveDate,
    rates: [f64; Currency::COUNT],
}

impl MonthlyRates {
    pub fn new(month: NaiveDate, rates: [f64; Currency::COUNT]) -> Self {
        Self { month, rates }
    }

    pub fn rate(&self, currency: Currency) -> f64 {
        self.rates[currency.index()]
    }

    pub fn rates(&self) -> impl Iterator<Item = (Currency, f64)> + '_ {
        Currency::ALL.into_iter().map(move |c| (c, self.rate(c)))
    }

    pub fn year(&self) -> i32 {
        self.month.year()
    }

    /// Calendar month number, 1 = January.
    pub fn month_of_year(&self) -> u32 {
        self.month.month()
    }
}

impl Serialize for MonthlyRates {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Currency::COUNT + 1))?;
        map.serialize_entry("Month", &self.month)?;
        for (currency, rate) in self.rates() {
            map.serialize_entry(currency.code(), &rate)?;
        }
        map.end()
    }
}

/// Monthly exchange rates against LKR, in file order.
///
/// Never mutated after construction; filters and reshapes build new values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExchangeRateTable {
    rows: Vec<MonthlyRates>,
}

impl ExchangeRateTable {
    pub fn new(rows: Vec<MonthlyRates>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[MonthlyRates] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of one currency, in row order.
    pub fn column(&self, currency: Currency) -> Vec<f64> {
        self.rows.iter().map(|r| r.rate(currency)).collect()
    }

    /// Earliest and latest month present, regardless of row order.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.rows.iter().map(|r| r.month).min()?;
        let last = self.rows.iter().map(|r| r.month).max()?;
        Some((first, last))
    }
}

/// A single (month, currency, rate) observation of the unpivoted table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LongFormatRow {
    pub month: NaiveDate,
    pub currency: Currency,
    pub rate: f64,
}

/// Descriptive statistics for one currency, rounded to 2 decimals.
///
/// `std` is the sample standard deviation and is NaN for fewer than two rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStatistic {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(y: i32, m: u32, usd: f64) -> MonthlyRates {
        MonthlyRates::new(
            NaiveDate::from_ymd_opt(y, m, 1).unwrap(),
            [120.0, 230.0, 1.4, 590.0, usd],
        )
    }

    #[test]
    fn test_rate_lookup_by_currency() {
        let r = row(2021, 6, 200.5);
        assert_eq!(r.rate(Currency::Usd), 200.5);
        assert_eq!(r.rate(Currency::Aud), 120.0);
        assert_eq!(r.year(), 2021);
        assert_eq!(r.month_of_year(), 6);
    }

    #[test]
    fn test_date_span_ignores_row_order() {
        let table = ExchangeRateTable::new(vec![row(2021, 3, 1.0), row(2020, 1, 1.0), row(2021, 1, 1.0)]);
        let (first, last) = table.date_span().unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2021, 3, 1).unwrap());
        assert!(ExchangeRateTable::default().date_span().is_none());
    }

    #[test]
    fn test_row_serializes_as_wide_record() {
        let json = serde_json::to_value(row(2020, 1, 180.0)).unwrap();
        assert_eq!(json["Month"], "2020-01-01");
        assert_eq!(json["USD_LKR"], 180.0);
        assert_eq!(json["JPY_LKR"], 1.4);
    }
}
