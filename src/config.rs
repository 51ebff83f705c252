// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use crate::error::{FxError, Result};
use crate::models::Currency;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_PATH: &str = "data/monthly_exchange_rates.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "output";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_path: PathBuf,
    pub output_dir: PathBuf,
    pub default_currency: Currency,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            default_currency: Currency::Usd,
        }
    }
}

impl Config {
    /// Applies `FX_DATA_PATH` and `FX_OUTPUT_DIR` when set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(path) = env::var("FX_DATA_PATH") {
            self.data_path = PathBuf::from(path);
        }
        if let Ok(dir) = env::var("FX_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        self
    }
}

pub fn get_config_path() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("config.toml");
    path
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    let config_str = fs::read_to_string(path)?;
    toml::from_str(&config_str).map_err(|e| FxError::Config(format!("{}: {}", path.display(), e)))
}

/// Reads `config.toml`, falling back to the built-in defaults when the file
/// does not exist. A file that exists but does not parse is an error.
pub fn load_config() -> Result<Config> {
    let path = get_config_path();
    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    load_config_from(&path)
}

pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    let config_str =
        toml::to_string_pretty(config).map_err(|e| FxError::Config(e.to_string()))?;
    fs::write(path, config_str)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_config_uses_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_currency = \"GBP_LKR\"\n")?;

        let config = load_config_from(&path)?;
        assert_eq!(config.default_currency, Currency::Gbp);
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));
        Ok(())
    }

    #[test]
    fn test_save_and_reload() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        let config = Config {
            data_path: PathBuf::from("rates.csv"),
            output_dir: PathBuf::from("downloads"),
            default_currency: Currency::Jpy,
        };
        save_config(&config, &path)?;
        assert_eq!(load_config_from(&path)?, config);
        Ok(())
    }

    #[test]
    fn test_invalid_currency_is_config_error() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_currency = \"EUR_LKR\"\n")?;
        assert!(matches!(load_config_from(&path), Err(FxError::Config(_))));
        Ok(())
    }

    #[test]
    fn test_bundled_config_parses() -> Result<()> {
        let config = load_config()?;
        assert_eq!(config.default_currency, Currency::Usd);
        Ok(())
    }
}
