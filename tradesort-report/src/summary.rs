//! Portfolio-level view of the working set. Always rebuilt from the current
//! files; nothing here is cached.

use rust_decimal::Decimal;
use serde::Serialize;
use tradesort_core::{FileExtractionResult, NormalizedTransaction, Term};

/// Headline numbers shown above the transaction table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Totals {
    pub files: usize,
    pub transactions: usize,
    pub short_term: usize,
    pub long_term: usize,
    pub proceeds: Decimal,
    pub cost_basis: Decimal,
    pub gain_loss: Decimal,
}

/// Short/long partition plus totals, borrowing from the working set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateView<'a> {
    pub short_term: Vec<&'a NormalizedTransaction>,
    pub long_term: Vec<&'a NormalizedTransaction>,
    pub totals: Totals,
}

pub fn aggregate(files: &[FileExtractionResult]) -> AggregateView<'_> {
    let mut view = AggregateView {
        totals: Totals {
            files: files.len(),
            ..Default::default()
        },
        ..Default::default()
    };

    for tx in files.iter().flat_map(|f| f.transactions()) {
        match tx.term() {
            Term::Short => view.short_term.push(tx),
            Term::Long => view.long_term.push(tx),
        }
        // Totals pin at the Decimal bounds rather than overflow.
        view.totals.proceeds = view.totals.proceeds.saturating_add(tx.proceeds());
        view.totals.cost_basis = view.totals.cost_basis.saturating_add(tx.cost_basis());
        view.totals.gain_loss = view.totals.gain_loss.saturating_add(tx.gain_loss());
    }

    view.totals.short_term = view.short_term.len();
    view.totals.long_term = view.long_term.len();
    view.totals.transactions = view.totals.short_term + view.totals.long_term;
    view
}
