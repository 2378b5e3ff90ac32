//! Unified schedule CSV export.
//!
//! Only the description is wrapped in quotes and nothing is escaped. Every
//! other column is either a fixed-decimal number, a date, or a short label, so
//! none of them can carry a comma today. A new column that can must handle
//! quoting itself.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tradesort_core::{NormalizedTransaction, Term};

pub const EXPORT_HEADER: [&str; 10] = [
    "Description",
    "Date Acquired",
    "Date Sold",
    "Proceeds",
    "Cost Basis",
    "Wash Sale Adj",
    "Gain/Loss",
    "Term",
    "Box",
    "Source",
];

/// Which slice of the working set to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportScope {
    All,
    ShortTerm,
    LongTerm,
}

impl ExportScope {
    pub const EVERY: [ExportScope; 3] =
        [ExportScope::All, ExportScope::ShortTerm, ExportScope::LongTerm];

    pub fn includes(self, tx: &NormalizedTransaction) -> bool {
        match self {
            ExportScope::All => true,
            ExportScope::ShortTerm => tx.term() == Term::Short,
            ExportScope::LongTerm => tx.term() == Term::Long,
        }
    }

    /// Download name used when the config doesn't override it.
    pub fn default_filename(self) -> &'static str {
        match self {
            ExportScope::All => "sorted_transactions_all.csv",
            ExportScope::ShortTerm => "sorted_short_term.csv",
            ExportScope::LongTerm => "sorted_long_term.csv",
        }
    }
}

/// Serialize transactions, in the given order, into the unified schedule.
///
/// Every row, the last one included, ends with `\n`.
pub fn to_csv<'a, I>(transactions: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = &'a NormalizedTransaction>,
{
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(EXPORT_HEADER).context("writing export header")?;

    for tx in transactions {
        wtr.write_record([
            format!("\"{}\"", tx.description()),
            tx.date_acquired().to_string(),
            tx.date_sold().to_string(),
            tx.proceeds_cell(),
            tx.cost_basis_cell(),
            tx.wash_sale_cell(),
            tx.gain_loss_cell(),
            tx.term().to_string(),
            tx.box_code().to_string(),
            tx.source().to_string(),
        ])
        .with_context(|| format!("writing export row for {}", tx.description()))?;
    }

    wtr.into_inner()
        .map_err(|e| anyhow!("flushing export buffer: {}", e.error()))
}
