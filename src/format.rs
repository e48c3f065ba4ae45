//! Locale-aware value formatting with silent fallbacks.
//!
//! Formatting never fails: malformed money becomes zero, malformed dates
//! render as the raw stored string. Business values inside line items are
//! deliberately not routed through these helpers; see
//! [`format_raw_number`].

use chrono::{DateTime, NaiveDate};

/// Currency symbol prefixed when the caller asks for one.
pub const CURRENCY_SYMBOL: &str = "\u{20B9}";

/// Date layout used in the title block.
const DATE_OUTPUT_FORMAT: &str = "%d %b %Y";

/// Structured layouts tried, in order, for stored quotation dates.
const DATE_INPUT_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

/// Format an amount with Indian digit grouping and exactly two decimals.
///
/// Non-finite input silently becomes 0 before formatting, so a malformed
/// total can never abort document generation. Symbol inclusion is caller
/// controlled.
///
/// # Example
///
/// ```
/// use quotedoc::format::format_currency;
///
/// assert_eq!(format_currency(1234.5, false), "1,234.50");
/// assert_eq!(format_currency(1234567.891, false), "12,34,567.89");
/// assert_eq!(format_currency(f64::NAN, false), format_currency(0.0, false));
/// ```
pub fn format_currency(value: f64, include_symbol: bool) -> String {
    let value = if value.is_finite() { value } else { 0.0 };

    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u128;
    let whole = cents / 100;
    let fraction = cents % 100;

    let grouped = group_indian(whole);
    let sign = if negative && cents > 0 { "-" } else { "" };

    if include_symbol {
        format!("{sign}{CURRENCY_SYMBOL}{grouped}.{fraction:02}")
    } else {
        format!("{sign}{grouped}.{fraction:02}")
    }
}

/// Indian digit grouping: last three digits, then pairs.
fn group_indian(value: u128) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let head_bytes = head.as_bytes();
    let mut end = head_bytes.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Render a stored quotation date for the title block.
///
/// Attempts RFC 3339 and the common structured layouts; on failure the
/// original raw string is returned unchanged with no error surfaced.
pub fn format_quotation_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return raw.to_string();
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return datetime.date_naive().format(DATE_OUTPUT_FORMAT).to_string();
    }

    for layout in DATE_INPUT_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, layout) {
            return date.format(DATE_OUTPUT_FORMAT).to_string();
        }
    }

    raw.to_string()
}

/// Verbatim display of a numeric line-item field.
///
/// No rounding, no grouping, no sanitization: integral values drop the
/// decimal point, everything else renders with `f64`'s own display form,
/// including `NaN` for malformed stored values.
pub fn format_raw_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_two_decimals_and_grouping() {
        assert_eq!(format_currency(0.0, false), "0.00");
        assert_eq!(format_currency(7.0, false), "7.00");
        assert_eq!(format_currency(999.999, false), "1,000.00");
        assert_eq!(format_currency(1234.5, false), "1,234.50");
        assert_eq!(format_currency(123456.789, false), "1,23,456.79");
        assert_eq!(format_currency(12345678.0, false), "1,23,45,678.00");
    }

    #[test]
    fn test_currency_nan_is_zero() {
        assert_eq!(format_currency(f64::NAN, false), format_currency(0.0, false));
        assert_eq!(format_currency(f64::INFINITY, true), format_currency(0.0, true));
        assert_eq!(format_currency(f64::NEG_INFINITY, false), "0.00");
    }

    #[test]
    fn test_currency_symbol_flag() {
        assert_eq!(format_currency(1234.5, true), "\u{20B9}1,234.50");
        assert_eq!(format_currency(1234.5, false), "1,234.50");
    }

    #[test]
    fn test_currency_negative() {
        assert_eq!(format_currency(-1234.5, false), "-1,234.50");
        assert_eq!(format_currency(-0.001, false), "0.00");
    }

    #[test]
    fn test_date_structured_inputs() {
        assert_eq!(format_quotation_date("2024-03-15"), "15 Mar 2024");
        assert_eq!(format_quotation_date("15/03/2024"), "15 Mar 2024");
        assert_eq!(format_quotation_date("15-03-2024"), "15 Mar 2024");
        assert_eq!(
            format_quotation_date("2024-03-15T10:30:00+05:30"),
            "15 Mar 2024"
        );
    }

    #[test]
    fn test_date_fallback_renders_raw() {
        assert_eq!(format_quotation_date("mid March"), "mid March");
        assert_eq!(format_quotation_date(""), "");
        assert_eq!(format_quotation_date("2024-13-45"), "2024-13-45");
    }

    #[test]
    fn test_raw_number() {
        assert_eq!(format_raw_number(5.0), "5");
        assert_eq!(format_raw_number(2.5), "2.5");
        assert_eq!(format_raw_number(f64::NAN), "NaN");
        assert_eq!(format_raw_number(-3.0), "-3");
    }
}
