//! Per-dialect date normalization to `MM/DD/YYYY`.

use crate::text::leading_int;
use crate::types::SourceKind;

/// Sentinel for blank acquisition/sale dates (aggregated or unknown lots).
pub const VARIOUS: &str = "VARIOUS";

/// Normalize a date cell for the given dialect.
///
/// - Robinhood writes `YYYYMMDD`.
/// - Fidelity writes `M/D/YY`; years above 50 get a `19` prefix, the rest `20`.
///   Any three-part value is prefixed, so a full year comes out six digits long.
/// - Coinbase is already `MM/DD/YYYY`.
///
/// Blank input is always [`VARIOUS`]. Input that doesn't have the expected
/// Robinhood/Fidelity shape is returned as written.
pub fn parse_date(raw: &str, source: SourceKind) -> String {
    let clean = raw.trim();
    if clean.is_empty() {
        return VARIOUS.to_string();
    }

    match source {
        SourceKind::Robinhood => reshape_yyyymmdd(clean).unwrap_or_else(|| raw.to_string()),
        SourceKind::Fidelity => expand_short_year(clean).unwrap_or_else(|| raw.to_string()),
        SourceKind::Coinbase | SourceKind::Unrecognized => clean.to_string(),
    }
}

fn reshape_yyyymmdd(s: &str) -> Option<String> {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() != 8 {
        return None;
    }
    let year: String = chars[0..4].iter().collect();
    let month: String = chars[4..6].iter().collect();
    let day: String = chars[6..8].iter().collect();
    Some(format!("{month}/{day}/{year}"))
}

fn expand_short_year(s: &str) -> Option<String> {
    let parts: Vec<&str> = s.split('/').collect();
    let [month, day, year] = parts.as_slice() else {
        return None;
    };

    let century = if leading_int(year).is_some_and(|y| y > 50) { "19" } else { "20" };
    Some(format!("{month}/{day}/{century}{year}"))
}
