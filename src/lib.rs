// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Monthly LKR exchange-rate dashboard: loads the rates table once and
//! answers overview, trend, insight, volatility and export queries over it.

pub mod aggregation;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod models;
pub mod sections;
pub mod utils;
pub mod visualizations;

pub use error::{FxError, Result};
pub use loader::DatasetLoader;
pub use models::{Currency, ExchangeRateTable, LongFormatRow, MonthlyRates, SummaryStatistic};
pub use sections::{Dashboard, Query, Section, SectionReport};
