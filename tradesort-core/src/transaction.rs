//! Normalized tax-lot records and per-file extraction results.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amount::{format_cents, round_cents};
use crate::text::truncate_chars;
use crate::types::{BoxCode, Broker, SourceKind, Term};

/// Width of the description field on the legacy 8949 form layout.
pub const DESCRIPTION_WIDTH: usize = 35;

/// Raw file text handed to the engine by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub name: String,
    pub content: String,
}

impl RawDocument {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Money columns of a lot, before rounding.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LotFigures {
    pub proceeds: Decimal,
    pub cost_basis: Decimal,
    pub wash_sale: Decimal,
    pub gain_loss: Decimal,
}

/// One disposal in the unified schedule.
///
/// Built once by an extractor and never mutated afterwards; accessors only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTransaction {
    source: Broker,
    description: String,
    date_acquired: String,
    date_sold: String,
    proceeds: Decimal,
    cost_basis: Decimal,
    /// `None` when the reported wash sale is zero or negative.
    wash_sale_adjustment: Option<Decimal>,
    gain_loss: Decimal,
    term: Term,
    box_code: BoxCode,
}

impl NormalizedTransaction {
    /// Truncates the description and rounds every amount to cents.
    pub fn new(
        source: Broker,
        description: &str,
        date_acquired: impl Into<String>,
        date_sold: impl Into<String>,
        figures: LotFigures,
        term: Term,
        box_code: BoxCode,
    ) -> Self {
        let wash_sale_adjustment = if figures.wash_sale > Decimal::ZERO {
            Some(round_cents(figures.wash_sale))
        } else {
            None
        };

        Self {
            source,
            description: truncate_chars(description, DESCRIPTION_WIDTH),
            date_acquired: date_acquired.into(),
            date_sold: date_sold.into(),
            proceeds: round_cents(figures.proceeds),
            cost_basis: round_cents(figures.cost_basis),
            wash_sale_adjustment,
            gain_loss: round_cents(figures.gain_loss),
            term,
            box_code,
        }
    }

    pub fn source(&self) -> Broker {
        self.source
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn date_acquired(&self) -> &str {
        &self.date_acquired
    }

    pub fn date_sold(&self) -> &str {
        &self.date_sold
    }

    pub fn proceeds(&self) -> Decimal {
        self.proceeds
    }

    pub fn cost_basis(&self) -> Decimal {
        self.cost_basis
    }

    pub fn wash_sale_adjustment(&self) -> Option<Decimal> {
        self.wash_sale_adjustment
    }

    pub fn gain_loss(&self) -> Decimal {
        self.gain_loss
    }

    pub fn term(&self) -> Term {
        self.term
    }

    pub fn box_code(&self) -> &BoxCode {
        &self.box_code
    }

    pub fn proceeds_cell(&self) -> String {
        format_cents(self.proceeds)
    }

    pub fn cost_basis_cell(&self) -> String {
        format_cents(self.cost_basis)
    }

    /// Empty when there is no positive adjustment.
    pub fn wash_sale_cell(&self) -> String {
        self.wash_sale_adjustment
            .map(format_cents)
            .unwrap_or_default()
    }

    pub fn gain_loss_cell(&self) -> String {
        format_cents(self.gain_loss)
    }
}

/// Everything extracted from one submitted file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileExtractionResult {
    filename: String,
    detected_source: SourceKind,
    transactions: Vec<NormalizedTransaction>,
    count: usize,
    /// Candidate rows dropped for failing their dialect's preconditions.
    skipped_rows: usize,
}

impl FileExtractionResult {
    pub fn new(
        filename: impl Into<String>,
        detected_source: SourceKind,
        transactions: Vec<NormalizedTransaction>,
        skipped_rows: usize,
    ) -> Self {
        let count = transactions.len();
        Self {
            filename: filename.into(),
            detected_source,
            transactions,
            count,
            skipped_rows,
        }
    }

    /// Result for a file no extractor understands.
    pub fn unrecognized(filename: impl Into<String>) -> Self {
        Self::new(filename, SourceKind::Unrecognized, Vec::new(), 0)
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn detected_source(&self) -> SourceKind {
        self.detected_source
    }

    pub fn transactions(&self) -> &[NormalizedTransaction] {
        &self.transactions
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample(figures: LotFigures) -> NormalizedTransaction {
        NormalizedTransaction::new(
            Broker::Robinhood,
            "A VERY LONG SECURITY DESCRIPTION THAT KEEPS GOING",
            "01/02/2023",
            "03/04/2024",
            figures,
            Term::Long,
            BoxCode::D,
        )
    }

    #[test]
    fn test_description_truncated_to_form_width() {
        let tx = sample(LotFigures::default());
        assert_eq!(tx.description().chars().count(), DESCRIPTION_WIDTH);
        assert_eq!(tx.description(), "A VERY LONG SECURITY DESCRIPTION TH");
    }

    #[test]
    fn test_amounts_rounded_to_cents() {
        let tx = sample(LotFigures {
            proceeds: dec!(10.005),
            cost_basis: dec!(3),
            wash_sale: dec!(0),
            gain_loss: dec!(7.004),
        });
        assert_eq!(tx.proceeds_cell(), "10.01");
        assert_eq!(tx.cost_basis_cell(), "3.00");
        assert_eq!(tx.gain_loss_cell(), "7.00");
    }

    #[test]
    fn test_wash_sale_only_when_positive() {
        let zero = sample(LotFigures::default());
        assert_eq!(zero.wash_sale_adjustment(), None);
        assert_eq!(zero.wash_sale_cell(), "");

        let negative = sample(LotFigures { wash_sale: dec!(-5), ..Default::default() });
        assert_eq!(negative.wash_sale_cell(), "");

        let positive = sample(LotFigures { wash_sale: dec!(12.5), ..Default::default() });
        assert_eq!(positive.wash_sale_cell(), "12.50");
    }

    #[test]
    fn test_result_count_matches_transactions() {
        let result = FileExtractionResult::new(
            "rh.csv",
            SourceKind::Robinhood,
            vec![sample(LotFigures::default()), sample(LotFigures::default())],
            3,
        );
        assert_eq!(result.count(), 2);
        assert_eq!(result.skipped_rows(), 3);
        assert!(FileExtractionResult::unrecognized("x.csv").is_empty());
    }

    #[test]
    fn test_transaction_serializes() {
        let tx = sample(LotFigures { proceeds: dec!(1), ..Default::default() });
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["source"], "Robinhood");
        assert_eq!(json["term"], "Long");
        assert_eq!(json["box_code"], "D");
    }
}
