//! Formatting helpers shared by every renderer.
//!
//! Absent row fields are defaulted here, the same way for every output format:
//! names become `Unknown`, dates become `N/A` and quantities become `0`.

use chrono::{DateTime, FixedOffset};

pub const UNKNOWN: &str = "Unknown";
pub const NOT_AVAILABLE: &str = "N/A";

/// `$1,234.56`; negative amounts are prefixed with `-`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0.00".to_string();
    }

    let cents = (amount.abs() * 100.0).round() as u128;
    let whole = group_thousands(cents / 100);
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, whole, cents % 100)
}

pub fn format_integer(value: i64) -> String {
    let grouped = group_thousands(value.unsigned_abs() as u128);
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `YYYY-MM-DD` in the value's own offset.
pub fn format_date(value: &DateTime<FixedOffset>) -> String {
    value.format("%Y-%m-%d").to_string()
}

/// `YYYY-MM-DD HH:mm` in the value's own offset.
pub fn format_timestamp(value: &DateTime<FixedOffset>) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}

pub fn format_optional_date(value: Option<&DateTime<FixedOffset>>) -> String {
    value.map(format_date).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn format_optional_timestamp(value: Option<&DateTime<FixedOffset>>) -> String {
    value
        .map(format_timestamp)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Division used for every derived average.
///
/// A zero denominator, or any quotient that is not finite, yields `0.0` so no
/// NaN or infinity ever reaches a document.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let ratio = numerator / denominator;
    if ratio.is_finite() {
        ratio
    } else {
        0.0
    }
}

/// Substitutes `Unknown` for absent or blank names.
pub fn or_unknown(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

/// Substitutes `N/A` for absent or blank secondary fields (SKU, user, type).
pub fn or_not_available(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Shortens `text` to at most `max_chars` characters, ending in `...` when cut.
pub fn fit_text(text: &str, max_chars: usize) -> String {
    let count = text.chars().count();
    if count <= max_chars {
        return text.to_string();
    }
    if max_chars <= 3 {
        return text.chars().take(max_chars).collect();
    }
    let mut out: String = text.chars().take(max_chars - 3).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, "$0.00")]
    #[case(5.5, "$5.50")]
    #[case(1234.567, "$1,234.57")]
    #[case(1_000_000.0, "$1,000,000.00")]
    #[case(-42.1, "-$42.10")]
    #[case(f64::NAN, "$0.00")]
    fn formats_currency(#[case] amount: f64, #[case] expected: &str) {
        assert_eq!(format_currency(amount), expected);
    }

    #[rstest]
    #[case(0, "0")]
    #[case(999, "999")]
    #[case(1000, "1,000")]
    #[case(-1234567, "-1,234,567")]
    fn formats_integers(#[case] value: i64, #[case] expected: &str) {
        assert_eq!(format_integer(value), expected);
    }

    #[test]
    fn safe_ratio_guards_zero() {
        assert_eq!(safe_ratio(10.0, 0.0), 0.0);
        assert_eq!(safe_ratio(0.0, 0.0), 0.0);
        assert_eq!(safe_ratio(f64::INFINITY, 2.0), 0.0);
        assert!((safe_ratio(10.0, 4.0) - 2.5).abs() < 1e-9);
    }

    #[test]
    fn dates_use_input_offset() {
        let value = DateTime::parse_from_rfc3339("2024-06-30T22:15:00-07:00").unwrap();
        // 2024-07-01 05:15 in UTC, but rendered as supplied
        assert_eq!(format_date(&value), "2024-06-30");
        assert_eq!(format_timestamp(&value), "2024-06-30 22:15");
        assert_eq!(format_optional_date(None), "N/A");
    }

    #[test]
    fn defaults_blank_names() {
        assert_eq!(or_unknown(None), "Unknown");
        assert_eq!(or_unknown(Some("   ")), "Unknown");
        assert_eq!(or_unknown(Some(" Widget ")), "Widget");
        assert_eq!(or_not_available(None), "N/A");
    }

    #[test]
    fn fit_text_truncates_with_ellipsis() {
        assert_eq!(fit_text("short", 10), "short");
        assert_eq!(fit_text("a much longer product name", 10), "a much ...");
        assert_eq!(fit_text("abcdef", 3), "abc");
    }
}
