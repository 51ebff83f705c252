// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use crate::error::{FxError, Result};
use crate::models::{Currency, ExchangeRateTable, MonthlyRates};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::SystemTime;

pub const MONTH_COLUMN: &str = "Month";

struct Cached {
    table: ExchangeRateTable,
    modified: Option<SystemTime>,
}

/// Handle to the monthly rates file. The table is read on first use and kept
/// for the lifetime of the handle.
pub struct DatasetLoader {
    path: PathBuf,
    cache: OnceLock<Cached>,
}

impl DatasetLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.get().is_some()
    }

    /// Returns the cached table, reading the file on the first call only.
    pub fn load(&self) -> Result<&ExchangeRateTable> {
        if let Some(cached) = self.cache.get() {
            return Ok(&cached.table);
        }

        log::info!("Loading exchange rates from {}", self.path.display());
        let file = File::open(&self.path)
            .map_err(|e| FxError::data_load(&self.path, e.to_string()))?;
        let modified = file.metadata().and_then(|m| m.modified()).ok();
        let table = ExchangeRateTable::from_reader(file, &self.path)?;
        log::info!("Loaded {} monthly rows", table.len());

        Ok(&self.cache.get_or_init(|| Cached { table, modified }).table)
    }

    pub fn invalidate(&mut self) {
        if self.cache.take().is_some() {
            log::debug!("Dropped cached table for {}", self.path.display());
        }
    }

    /// Drops the cached table if the file's modification time moved since it
    /// was read. Returns whether the cache was invalidated.
    pub fn reload_if_changed(&mut self) -> Result<bool> {
        let Some(cached) = self.cache.get() else {
            return Ok(false);
        };
        let current = fs::metadata(&self.path)
            .map_err(|e| FxError::data_load(&self.path, e.to_string()))?
            .modified()
            .ok();
        if current != cached.modified {
            log::info!("{} changed on disk, invalidating cache", self.path.display());
            self.invalidate();
            return Ok(true);
        }
        Ok(false)
    }
}

/// Parses a `Month` cell. `YYYY-MM` is read as the first of the month.
pub fn parse_month(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    for format in ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d").ok()
}

impl ExchangeRateTable {
    /// Reads a delimited table with a `Month` column and one column per
    /// currency code. `source` is only used in error messages.
    pub fn from_reader<R: Read>(reader: R, source: &Path) -> Result<Self> {
        let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let fail = |reason: String| FxError::data_load(source, reason);

        let headers = reader.headers().map_err(|e| fail(e.to_string()))?.clone();
        let month_idx = column_index(&headers, MONTH_COLUMN)
            .ok_or_else(|| fail(format!("missing required column '{}'", MONTH_COLUMN)))?;

        let mut currency_idx = [0usize; Currency::COUNT];
        for currency in Currency::ALL {
            currency_idx[currency.index()] = column_index(&headers, currency.code())
                .ok_or_else(|| fail(format!("missing required column '{}'", currency.code())))?;
        }
        for header in headers.iter() {
            if header != MONTH_COLUMN && header.parse::<Currency>().is_err() {
                log::debug!("Ignoring unknown column '{}'", header);
            }
        }

        let mut rows = Vec::new();
        let mut seen = HashSet::new();
        // line numbers count data rows from 1, header excluded
        for (i, result) in reader.records().enumerate() {
            let record = result.map_err(|e| fail(e.to_string()))?;
            let line = i + 1;

            let raw_month = record.get(month_idx).unwrap_or_default();
            let month = parse_month(raw_month)
                .ok_or_else(|| fail(format!("line {}: unparseable month '{}'", line, raw_month)))?;
            if !seen.insert(month) {
                return Err(fail(format!("line {}: duplicate month {}", line, month)));
            }

            let mut rates = [0.0; Currency::COUNT];
            for currency in Currency::ALL {
                let raw = record.get(currency_idx[currency.index()]).unwrap_or_default();
                let rate: f64 = raw.parse().map_err(|_| {
                    fail(format!("line {}: invalid {} rate '{}'", line, currency, raw))
                })?;
                if !rate.is_finite() || rate < 0.0 {
                    return Err(fail(format!(
                        "line {}: {} rate must be a non-negative number, got {}",
                        line, currency, rate
                    )));
                }
                rates[currency.index()] = rate;
            }
            rows.push(MonthlyRates::new(month, rates));
        }

        Ok(ExchangeRateTable::new(rows))
    }
}

fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
Month,AUD_LKR,GBP_LKR,JPY_LKR,KWD_LKR,USD_LKR
2020-01-01,125.10,237.50,1.66,597.20,181.40
2020-02-01,121.30,235.80,1.65,595.90,181.90
";

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_parse_month_formats() {
        let jan = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert_eq!(parse_month("2020-01-01"), Some(jan));
        assert_eq!(parse_month("2020-01"), Some(jan));
        assert_eq!(parse_month("2020/01/01"), Some(jan));
        assert_eq!(parse_month("01/01/2020"), Some(jan));
        assert_eq!(parse_month(" 2020-01 "), Some(jan));
        assert_eq!(parse_month("January 2020"), None);
        assert_eq!(parse_month(""), None);
    }

    #[test]
    fn test_load_sample_file() -> Result<()> {
        let file = write_temp(SAMPLE);
        let loader = DatasetLoader::new(file.path());
        let table = loader.load()?;

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1].rate(Currency::Usd), 181.90);
        assert_eq!(
            table.rows()[0].month,
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
        );
        Ok(())
    }

    #[test]
    fn test_load_is_cached() -> Result<()> {
        let file = write_temp(SAMPLE);
        let loader = DatasetLoader::new(file.path());
        assert!(!loader.is_loaded());
        let first = loader.load()?.clone();

        // Rewriting the file does not affect an already loaded handle
        std::fs::write(file.path(), "garbage").unwrap();
        let second = loader.load()?;
        assert_eq!(&first, second);
        assert!(loader.is_loaded());
        Ok(())
    }

    #[test]
    fn test_invalidate_rereads_file() -> Result<()> {
        let file = write_temp(SAMPLE);
        let mut loader = DatasetLoader::new(file.path());
        assert_eq!(loader.load()?.len(), 2);

        std::fs::write(
            file.path(),
            "Month,AUD_LKR,GBP_LKR,JPY_LKR,KWD_LKR,USD_LKR\n2021-05,1,2,3,4,5\n",
        )
        .unwrap();
        loader.invalidate();
        assert!(!loader.is_loaded());
        assert_eq!(loader.load()?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_reload_if_changed_without_cache() -> Result<()> {
        let file = write_temp(SAMPLE);
        let mut loader = DatasetLoader::new(file.path());
        assert!(!loader.reload_if_changed()?);
        loader.load()?;
        assert!(!loader.reload_if_changed()?);
        assert!(loader.is_loaded());
        Ok(())
    }

    #[test]
    fn test_reload_if_changed_after_modification() -> Result<()> {
        let file = write_temp(SAMPLE);
        let mut loader = DatasetLoader::new(file.path());
        assert_eq!(loader.load()?.len(), 2);
        assert_eq!(loader.path(), file.path());

        std::fs::write(
            file.path(),
            "Month,AUD_LKR,GBP_LKR,JPY_LKR,KWD_LKR,USD_LKR\n2021-05,1,2,3,4,5\n",
        )?;
        File::options()
            .write(true)
            .open(file.path())?
            .set_modified(SystemTime::now() + Duration::from_secs(10))?;

        assert!(loader.reload_if_changed()?);
        assert!(!loader.is_loaded());
        let table = loader.load()?;
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].rate(Currency::Usd), 5.0);
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let loader = DatasetLoader::new("does/not/exist.csv");
        let err = loader.load().unwrap_err();
        assert!(matches!(err, FxError::DataLoad { .. }));
        assert!(err.to_string().contains("does/not/exist.csv"));
    }

    #[test]
    fn test_missing_currency_column() {
        let file = write_temp("Month,AUD_LKR,GBP_LKR,JPY_LKR,USD_LKR\n2020-01,1,2,3,4\n");
        let err = DatasetLoader::new(file.path()).load().unwrap_err();
        assert!(err.to_string().contains("KWD_LKR"));
    }

    #[test]
    fn test_missing_month_column() {
        let file = write_temp("Date,AUD_LKR,GBP_LKR,JPY_LKR,KWD_LKR,USD_LKR\n2020-01,1,2,3,4,5\n");
        let err = DatasetLoader::new(file.path()).load().unwrap_err();
        assert!(err.to_string().contains("'Month'"));
    }

    #[test]
    fn test_rejects_bad_rows() {
        let header = "Month,AUD_LKR,GBP_LKR,JPY_LKR,KWD_LKR,USD_LKR\n";
        for (body, needle) in [
            ("not-a-date,1,2,3,4,5\n", "line 1: unparseable month"),
            ("2020-01,1,2,,4,5\n", "line 1: invalid JPY_LKR rate"),
            ("2020-01,1,2,3,-4,5\n", "line 1: KWD_LKR rate must be a non-negative"),
            ("2020-01,1,2,3,4,5\n2020-01-01,1,2,3,4,5\n", "line 2: duplicate month"),
            ("2020-01,1,2,3,4,5\n2020-02,1,2,3,4,5\n2020-03,x,2,3,4,5\n", "line 3: invalid AUD_LKR"),
        ] {
            let source = Path::new("inline.csv");
            let err = ExchangeRateTable::from_reader(format!("{}{}", header, body).as_bytes(), source)
                .unwrap_err();
            assert!(
                err.to_string().contains(needle),
                "expected '{}' in '{}'",
                needle,
                err
            );
        }
    }

    #[test]
    fn test_extra_columns_are_ignored() -> Result<()> {
        let csv = "Month,Notes,AUD_LKR,GBP_LKR,JPY_LKR,KWD_LKR,USD_LKR\n2020-01,x,1,2,3,4,5\n";
        let table = ExchangeRateTable::from_reader(csv.as_bytes(), Path::new("inline.csv"))?;
        assert_eq!(table.rows()[0].rate(Currency::Usd), 5.0);
        assert_eq!(table.rows()[0].rate(Currency::Aud), 1.0);
        Ok(())
    }

    #[test]
    fn test_header_only_is_empty_table() -> Result<()> {
        let csv = "Month,AUD_LKR,GBP_LKR,JPY_LKR,KWD_LKR,USD_LKR\n";
        let table = ExchangeRateTable::from_reader(csv.as_bytes(), Path::new("inline.csv"))?;
        assert!(table.is_empty());
        Ok(())
    }
}
