// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use crate::error::{FxError, Result};
use crate::models::ExchangeRateTable;
use chrono::NaiveDate;

/// Rows whose month lies in `[start, end]`, both bounds inclusive.
///
/// Bounds outside the data simply select fewer rows; a range that misses the
/// data entirely yields an empty table.
pub fn filter_by_date_range(
    table: &ExchangeRateTable,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<ExchangeRateTable> {
    if start > end {
        return Err(FxError::InvalidRange { start, end });
    }

    let rows: Vec<_> = table
        .rows()
        .iter()
        .filter(|r| r.month >= start && r.month <= end)
        .cloned()
        .collect();
    log::debug!(
        "Kept {} of {} rows between {} and {}",
        rows.len(),
        table.len(),
        start,
        end
    );
    Ok(ExchangeRateTable::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Currency, MonthlyRates};

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn table() -> ExchangeRateTable {
        ExchangeRateTable::new(vec![
            MonthlyRates::new(date(2020, 1), [1.0, 2.0, 3.0, 4.0, 180.0]),
            MonthlyRates::new(date(2020, 2), [1.0, 2.0, 3.0, 4.0, 182.0]),
            MonthlyRates::new(date(2020, 3), [1.0, 2.0, 3.0, 4.0, 185.0]),
        ])
    }

    #[test]
    fn test_single_month_range() -> Result<()> {
        let filtered = filter_by_date_range(&table(), date(2020, 2), date(2020, 2))?;
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.rows()[0].month, date(2020, 2));
        assert_eq!(filtered.rows()[0].rate(Currency::Usd), 182.0);
        Ok(())
    }

    #[test]
    fn test_full_range_is_identity() -> Result<()> {
        let t = table();
        let (first, last) = t.date_span().unwrap();
        assert_eq!(filter_by_date_range(&t, first, last)?, t);
        Ok(())
    }

    #[test]
    fn test_range_is_clamped_to_data() -> Result<()> {
        let filtered = filter_by_date_range(&table(), date(2019, 6), date(2020, 2))?;
        assert_eq!(filtered.len(), 2);
        let filtered = filter_by_date_range(&table(), date(2018, 1), date(2030, 1))?;
        assert_eq!(filtered, table());
        Ok(())
    }

    #[test]
    fn test_disjoint_range_is_empty() -> Result<()> {
        let filtered = filter_by_date_range(&table(), date(2021, 1), date(2021, 12))?;
        assert!(filtered.is_empty());
        Ok(())
    }

    #[test]
    fn test_inverted_range_fails() {
        let err = filter_by_date_range(&table(), date(2020, 3), date(2020, 1)).unwrap_err();
        assert!(matches!(
            err,
            FxError::InvalidRange { start, end } if start == date(2020, 3) && end == date(2020, 1)
        ));
    }
}
