//! One parser per broker dialect. Each keeps its column layout in a single
//! `*_COLUMNS` table so a layout change is a one-line edit.

pub mod coinbase;
pub mod fidelity;
pub mod robinhood;

pub use coinbase::parse_coinbase_csv;
pub use fidelity::parse_fidelity_csv;
pub use robinhood::parse_robinhood_csv;

use tradesort_core::NormalizedTransaction;

/// Output of a dialect parser.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// In file scan order.
    pub transactions: Vec<NormalizedTransaction>,
    /// Candidate rows that were dropped instead of emitted.
    pub skipped_rows: usize,
}

/// Cell at `index`, or empty when the row is too short to have it.
fn cell<'a>(fields: &[&'a str], index: usize) -> &'a str {
    fields.get(index).copied().unwrap_or("")
}
