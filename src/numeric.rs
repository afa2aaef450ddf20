//! Lenient number parsing shared by classification, filtering, and metrics.
//!
//! Cells are kept as raw strings; every numeric read goes through
//! [`parse_number()`], which accepts the longest numeric prefix of a value
//! (`"12 un"` reads as `12`) and rejects values with no numeric prefix at all.
//! Monetary columns use [`parse_brl_currency()`], which understands the
//! `R$ 1.234,56` layout.

/// Parses the leading numeric prefix of `raw`.
///
/// Leading whitespace and byte-order marks are skipped, an optional sign is accepted, followed by
/// `Infinity` or digits with an optional fraction and exponent. Anything after
/// the prefix is ignored. Returns `None` when no digits are found.
pub fn parse_number(raw: &str) -> Option<f64> {
    let text = raw.trim_start_matches(|ch: char| ch.is_whitespace() || ch == '\u{feff}');
    let bytes = text.as_bytes();
    let mut end = 0usize;
    let negative = match bytes.first() {
        Some(b'-') => {
            end = 1;
            true
        }
        Some(b'+') => {
            end = 1;
            false
        }
        _ => false,
    };

    if text[end..].starts_with("Infinity") {
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let integer_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - integer_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let fraction_start = end + 1;
        let mut cursor = fraction_start;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        digits += cursor - fraction_start;
        if digits > 0 {
            end = cursor;
        }
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut cursor = end + 1;
        if cursor < bytes.len() && matches!(bytes[cursor], b'+' | b'-') {
            cursor += 1;
        }
        let exponent_start = cursor;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        if cursor > exponent_start {
            end = cursor;
        }
    }

    text[..end].parse::<f64>().ok()
}

/// [`parse_number()`] with failures read as zero.
pub fn number_or_zero(raw: &str) -> f64 {
    parse_number(raw).unwrap_or(0.0)
}

/// True when the cell is non-empty and has a numeric prefix.
pub fn is_numeric_cell(raw: &str) -> bool {
    !raw.is_empty() && parse_number(raw).is_some()
}

/// Reads a Brazilian-Portuguese currency string such as `R$ 1.234,56`.
///
/// Everything but digits, `,` and `-` is stripped, the first `,` becomes the
/// decimal point, and the result is read with [`parse_number()`]. Empty or
/// unreadable values yield `0.0`.
pub fn parse_brl_currency(raw: &str) -> f64 {
    let sanitized = raw
        .chars()
        .filter(|ch| ch.is_ascii_digit() || matches!(ch, ',' | '-'))
        .collect::<String>()
        .replacen(',', ".", 1);
    number_or_zero(&sanitized)
}

/// Renders `value` as `R$ 1.234,56`.
pub fn format_brl(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let units = cents / 100;
    let fraction = cents % 100;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}R$ {},{fraction:02}", group_thousands(units))
}

/// Renders `value` rounded to whole units with `.` thousands separators.
pub fn format_units(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}{}", group_thousands(rounded.abs() as u64))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_number_accepts_plain_values() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number("-3.5"), Some(-3.5));
        assert_eq!(parse_number("+7"), Some(7.0));
        assert_eq!(parse_number(".25"), Some(0.25));
        assert_eq!(parse_number("5."), Some(5.0));
        assert_eq!(parse_number("1e3"), Some(1000.0));
    }

    #[test]
    fn parse_number_reads_leading_prefix_only() {
        assert_eq!(parse_number("  12 un"), Some(12.0));
        assert_eq!(parse_number("3.5kg"), Some(3.5));
        assert_eq!(parse_number("2e"), Some(2.0));
        assert_eq!(parse_number("1.2.3"), Some(1.2));
    }

    #[test]
    fn parse_number_rejects_values_without_digits() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("   "), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("R$ 10"), None);
        assert_eq!(parse_number("."), None);
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number("nan"), None);
    }

    #[test]
    fn parse_number_skips_leading_byte_order_mark() {
        assert_eq!(parse_number("\u{feff}5"), Some(5.0));
        assert_eq!(parse_number(" \u{feff} -2.5"), Some(-2.5));
        assert_eq!(parse_number("\u{feff}"), None);
    }

    #[test]
    fn parse_number_handles_infinity_keyword() {
        assert_eq!(parse_number("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_number("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn numeric_cell_requires_content() {
        assert!(is_numeric_cell("0"));
        assert!(!is_numeric_cell(""));
        assert!(!is_numeric_cell("n/a"));
    }

    #[test]
    fn brl_currency_follows_locale_layout() {
        assert_eq!(parse_brl_currency("R$ 1.234,56"), 1234.56);
        assert_eq!(parse_brl_currency("R$ 0,00"), 0.0);
        assert_eq!(parse_brl_currency("-R$ 10,50"), -10.5);
        assert_eq!(parse_brl_currency("R$ 1.000.000,00"), 1_000_000.0);
        assert_eq!(parse_brl_currency(""), 0.0);
        assert_eq!(parse_brl_currency("sem valor"), 0.0);
    }

    #[test]
    fn brl_currency_only_converts_first_comma() {
        assert_eq!(parse_brl_currency("1,234,56"), 1.234);
    }

    #[test]
    fn format_brl_groups_thousands() {
        assert_eq!(format_brl(1234.56), "R$ 1.234,56");
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(-1_000_000.5), "-R$ 1.000.000,50");
        assert_eq!(format_brl(999.999), "R$ 1.000,00");
    }

    #[test]
    fn format_units_rounds_to_whole_numbers() {
        assert_eq!(format_units(1499.6), "1.500");
        assert_eq!(format_units(-12.2), "-12");
        assert_eq!(format_units(0.0), "0");
    }
}
