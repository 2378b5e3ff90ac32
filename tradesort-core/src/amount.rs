//! Lenient money parsing. A bad cell becomes zero instead of aborting the file.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Parse a money-looking cell.
///
/// Tries the trimmed text as-is first, then again with everything except
/// digits, `.` and `-` removed (currency symbols, thousands separators,
/// parentheses). Absent, empty or still-unparseable input yields zero.
pub fn parse_amount(raw: Option<&str>) -> Decimal {
    let Some(raw) = raw else {
        return Decimal::ZERO;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }

    if let Some(value) = parse_decimal(trimmed) {
        return value;
    }

    let cleaned: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    parse_decimal(&cleaned).unwrap_or(Decimal::ZERO)
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Round to cents, half away from zero. A rounded zero is always positive zero.
pub fn round_cents(value: Decimal) -> Decimal {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() { Decimal::ZERO } else { rounded }
}

/// Fixed two-decimal rendering used in every output column.
pub fn format_cents(value: Decimal) -> String {
    format!("{:.2}", round_cents(value))
}
