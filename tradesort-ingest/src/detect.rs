//! Content-based dialect detection.
//!
//! Signatures are checked in a fixed order and the first hit wins, so a file
//! carrying more than one signature resolves deterministically.

use tradesort_core::text::split_lines;
use tradesort_core::SourceKind;

/// Fidelity puts this in the first line of its 1099 export.
pub const FIDELITY_TITLE: &str = "1099 Summary";
pub const ROBINHOOD_MARKER: &str = "Robinhood Markets";
pub const COINBASE_HEADER: &str = "Transaction Type,Transaction ID,Tax lot ID";
pub const COINBASE_TITLE: &str = "Gain/loss report";

pub fn detect_source(content: &str) -> SourceKind {
    let first_line = split_lines(content).next().unwrap_or("").trim();

    // None of the markers span a line break, so searching the raw text is
    // the same as searching the newline-normalized text.
    if first_line.contains(FIDELITY_TITLE) {
        SourceKind::Fidelity
    } else if content.contains(ROBINHOOD_MARKER) {
        SourceKind::Robinhood
    } else if content.contains(COINBASE_HEADER) || content.contains(COINBASE_TITLE) {
        SourceKind::Coinbase
    } else {
        SourceKind::Unrecognized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fidelity_only_on_first_line() {
        assert_eq!(
            detect_source("Form 1099 Summary 2023,,\r\n1099-B-Detail,x"),
            SourceKind::Fidelity
        );
        assert_eq!(detect_source("header\n1099 Summary"), SourceKind::Unrecognized);
    }

    #[test]
    fn test_fidelity_wins_over_robinhood() {
        let doc = "1099 Summary\nRobinhood Markets Inc\n";
        assert_eq!(detect_source(doc), SourceKind::Fidelity);
    }

    #[test]
    fn test_robinhood_anywhere() {
        let doc = "ACCOUNT,,\rPAYER,Robinhood Markets Inc,\r1099-B,";
        assert_eq!(detect_source(doc), SourceKind::Robinhood);
    }

    #[test]
    fn test_robinhood_wins_over_coinbase() {
        let doc = "x\nRobinhood Markets\nTransaction Type,Transaction ID,Tax lot ID\n";
        assert_eq!(detect_source(doc), SourceKind::Robinhood);
    }

    #[test]
    fn test_coinbase_signatures() {
        assert_eq!(
            detect_source("Transaction Type,Transaction ID,Tax lot ID,Asset name"),
            SourceKind::Coinbase
        );
        assert_eq!(
            detect_source("Coinbase Gain/loss report 2023\n"),
            SourceKind::Coinbase
        );
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(detect_source(""), SourceKind::Unrecognized);
        assert_eq!(detect_source("Date,Description,Amount"), SourceKind::Unrecognized);
    }

    #[test]
    fn test_detection_is_repeatable() {
        let doc = "Gain/loss report\n";
        assert_eq!(detect_source(doc), detect_source(doc));
    }
}
