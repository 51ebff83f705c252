// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use crate::error::{FxError, Result};
use crate::loader::MONTH_COLUMN;
use crate::models::{Currency, ExchangeRateTable};
use chrono::Local;
use csv::Writer;
use std::fs;
use std::path::{Path, PathBuf};

/// Serializes the table as UTF-8 CSV: `Month` first, then currencies in
/// enumeration order, rates with 2 decimals, no index column.
pub fn serialize_to_csv(table: &ExchangeRateTable) -> Result<Vec<u8>> {
    let mut writer = Writer::from_writer(Vec::new());

    let mut header = vec![MONTH_COLUMN];
    header.extend(Currency::ALL.iter().map(|c| c.code()));
    writer.write_record(&header)?;

    for row in table.rows() {
        let mut record = vec![row.month.format("%Y-%m-%d").to_string()];
        record.extend(row.rates().map(|(_, rate)| format!("{:.2}", rate)));
        writer.write_record(&record)?;
    }

    writer.into_inner().map_err(|e| FxError::Io(e.into_error()))
}

/// Writes the serialized table to a timestamped file under `output_dir` and
/// returns its path.
pub fn write_export(table: &ExchangeRateTable, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;

    let span = match table.date_span() {
        Some((start, end)) => format!("{}_to_{}", start.format("%Y%m"), end.format("%Y%m")),
        None => "empty".to_string(),
    };
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = output_dir.join(format!("exchange_rates_{}_{}.csv", span, timestamp));

    fs::write(&path, serialize_to_csv(table)?)?;
    log::info!("Exported {} rows to {}", table.len(), path.display());
    Ok(path)
}
