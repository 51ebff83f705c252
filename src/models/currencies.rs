// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use crate::error::FxError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Foreign currencies quoted against the Sri Lankan rupee.
///
/// Variant order is the enumeration order used for columns, long-format rows
/// and tie-breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "AUD_LKR")]
    Aud,
    #[serde(rename = "GBP_LKR")]
    Gbp,
    #[serde(rename = "JPY_LKR")]
    Jpy,
    #[serde(rename = "KWD_LKR")]
    Kwd,
    #[serde(rename = "USD_LKR")]
    Usd,
}

impl Currency {
    pub const COUNT: usize = 5;

    pub const ALL: [Currency; Currency::COUNT] = [
        Currency::Aud,
        Currency::Gbp,
        Currency::Jpy,
        Currency::Kwd,
        Currency::Usd,
    ];

    /// Column header used in the dataset and in exports.
    pub fn code(self) -> &'static str {
        match self {
            Currency::Aud => "AUD_LKR",
            Currency::Gbp => "GBP_LKR",
            Currency::Jpy => "JPY_LKR",
            Currency::Kwd => "KWD_LKR",
            Currency::Usd => "USD_LKR",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Currency::Aud => "Australian Dollar",
            Currency::Gbp => "British Pound",
            Currency::Jpy => "Japanese Yen",
            Currency::Kwd => "Kuwaiti Dinar",
            Currency::Usd => "US Dollar",
        }
    }

    /// Position in the enumeration order.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Currency::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| FxError::UnknownCurrency(wanted.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumeration_order_matches_index() {
        for (i, currency) in Currency::ALL.iter().enumerate() {
            assert_eq!(currency.index(), i);
        }
        assert!(Currency::Aud < Currency::Usd);
    }

    #[test]
    fn test_parse_currency_code() {
        assert_eq!("USD_LKR".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!(" kwd_lkr ".parse::<Currency>().unwrap(), Currency::Kwd);
        assert!(matches!(
            "EUR_LKR".parse::<Currency>(),
            Err(FxError::UnknownCurrency(code)) if code == "EUR_LKR"
        ));
    }

    #[test]
    fn test_serde_uses_column_code() {
        let json = serde_json::to_string(&Currency::Jpy).unwrap();
        assert_eq!(json, "\"JPY_LKR\"");
    }
}
