//! Source dialects and tax-lot classification enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dialect assigned to a document by content detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    Fidelity,
    Robinhood,
    Coinbase,
    Unrecognized,
}

impl SourceKind {
    /// The broker whose extractor handles this dialect, if any.
    pub fn broker(self) -> Option<Broker> {
        match self {
            SourceKind::Fidelity => Some(Broker::Fidelity),
            SourceKind::Robinhood => Some(Broker::Robinhood),
            SourceKind::Coinbase => Some(Broker::Coinbase),
            SourceKind::Unrecognized => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self.broker() {
            Some(broker) => broker.label(),
            None => "Other",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A recognized broker. Emitted transactions carry this rather than
/// [`SourceKind`] so they can never be tagged `Unrecognized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Broker {
    Fidelity,
    Robinhood,
    Coinbase,
}

impl Broker {
    pub fn label(self) -> &'static str {
        match self {
            Broker::Fidelity => "Fidelity",
            Broker::Robinhood => "Robinhood",
            Broker::Coinbase => "Coinbase",
        }
    }
}

impl From<Broker> for SourceKind {
    fn from(broker: Broker) -> Self {
        match broker {
            Broker::Fidelity => SourceKind::Fidelity,
            Broker::Robinhood => SourceKind::Robinhood,
            Broker::Coinbase => SourceKind::Coinbase,
        }
    }
}

impl fmt::Display for Broker {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Holding period classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    /// Held one year or less
    Short,
    /// Held more than one year
    Long,
}

impl Term {
    pub fn from_is_long(is_long: bool) -> Self {
        if is_long { Term::Long } else { Term::Short }
    }

    pub fn label(self) -> &'static str {
        match self {
            Term::Short => "Short",
            Term::Long => "Long",
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Form 8949 disposal bucket.
///
/// Fidelity uses A/C/D/F, Coinbase B/E and Robinhood whatever its own
/// `form8949Code` column says, so anything outside A-F is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BoxCode {
    A,
    B,
    C,
    D,
    E,
    F,
    Other(String),
}

impl BoxCode {
    pub fn from_code(code: &str) -> Self {
        match code {
            "A" => BoxCode::A,
            "B" => BoxCode::B,
            "C" => BoxCode::C,
            "D" => BoxCode::D,
            "E" => BoxCode::E,
            "F" => BoxCode::F,
            other => BoxCode::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BoxCode::A => "A",
            BoxCode::B => "B",
            BoxCode::C => "C",
            BoxCode::D => "D",
            BoxCode::E => "E",
            BoxCode::F => "F",
            BoxCode::Other(code) => code,
        }
    }
}

impl From<String> for BoxCode {
    fn from(code: String) -> Self {
        BoxCode::from_code(&code)
    }
}

impl From<BoxCode> for String {
    fn from(code: BoxCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for BoxCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_has_no_broker() {
        assert_eq!(SourceKind::Unrecognized.broker(), None);
        assert_eq!(SourceKind::Unrecognized.to_string(), "Other");
        assert_eq!(SourceKind::Coinbase.broker(), Some(Broker::Coinbase));
    }

    #[test]
    fn test_box_code_keeps_unknown_codes() {
        assert_eq!(BoxCode::from_code("D"), BoxCode::D);
        assert_eq!(BoxCode::from_code("X").as_str(), "X");
    }

    #[test]
    fn test_box_code_serializes_as_letter() {
        let json = serde_json::to_string(&BoxCode::E).unwrap();
        assert_eq!(json, "\"E\"");
        let back: BoxCode = serde_json::from_str("\"Z\"").unwrap();
        assert_eq!(back, BoxCode::Other("Z".to_string()));
    }
}
