// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

/// Rounds to 2 decimal places for display. NaN stays NaN.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn month_name(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    month
        .checked_sub(1)
        .and_then(|i| NAMES.get(i as usize))
        .copied()
        .unwrap_or("???")
}

/// Formats a statistic for text output, spelling out undefined values.
pub fn format_stat(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.41421356), 1.41);
        assert_eq!(round2(181.0), 181.0);
        assert_eq!(round2(2.675000001), 2.68);
        assert!(round2(f64::NAN).is_nan());
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(1), "Jan");
        assert_eq!(month_name(12), "Dec");
        assert_eq!(month_name(0), "???");
        assert_eq!(month_name(13), "???");
    }

    #[test]
    fn test_format_stat() {
        assert_eq!(format_stat(1.414), "1.41");
        assert_eq!(format_stat(f64::NAN), "NaN");
    }
}
