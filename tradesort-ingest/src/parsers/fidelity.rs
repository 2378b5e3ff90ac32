//! Fidelity 1099 CSV parser
//!
//! The export starts with a `1099 Summary` title line followed by many record
//! kinds. Only `1099-B-Detail` rows are lots:
//!   1099-B-Detail,...,<desc>,,,<acquired>,<sold>,<proceeds>,<cost>,,<wash>,<gain>,<loss>,,,<term>,<covered>
//! Dates are `M/D/YY`. Fidelity never quotes its fields.

use tracing::debug;
use tradesort_core::text::split_lines;
use tradesort_core::{
    parse_amount, parse_date, BoxCode, Broker, LotFigures, NormalizedTransaction, SourceKind, Term,
};

use super::{cell, Extraction};

const ROW_PREFIX: &str = "1099-B-Detail,";
const MIN_FIELDS: usize = 22;
/// Repeated sub-header inside the detail block.
const SUBHEADER_LABEL: &str = "1099-B-1a";

/// Column positions in a `1099-B-Detail` row.
#[derive(Debug, Clone, Copy)]
pub struct FidelityColumns {
    pub description: usize,
    pub date_acquired: usize,
    pub date_sold: usize,
    pub proceeds: usize,
    pub cost_basis: usize,
    pub wash_sale: usize,
    pub gain: usize,
    pub loss: usize,
    pub term: usize,
    pub covered: usize,
}

pub const FIDELITY_COLUMNS: FidelityColumns = FidelityColumns {
    description: 8,
    date_acquired: 11,
    date_sold: 12,
    proceeds: 13,
    cost_basis: 14,
    wash_sale: 16,
    gain: 17,
    loss: 18,
    term: 21,
    covered: 22,
};

struct DetailRow<'a> {
    description: &'a str,
    date_acquired: &'a str,
    date_sold: &'a str,
    proceeds: &'a str,
    cost_basis: &'a str,
    wash_sale: &'a str,
    gain: &'a str,
    loss: &'a str,
    term: &'a str,
    covered: &'a str,
}

impl<'a> DetailRow<'a> {
    fn read(fields: &[&'a str], cols: &FidelityColumns) -> Self {
        Self {
            description: cell(fields, cols.description).trim(),
            date_acquired: cell(fields, cols.date_acquired),
            date_sold: cell(fields, cols.date_sold),
            proceeds: cell(fields, cols.proceeds),
            cost_basis: cell(fields, cols.cost_basis),
            wash_sale: cell(fields, cols.wash_sale),
            gain: cell(fields, cols.gain),
            loss: cell(fields, cols.loss),
            term: cell(fields, cols.term).trim(),
            covered: cell(fields, cols.covered).trim(),
        }
    }

    /// `None` when the gain/loss doesn't fit in a `Decimal`.
    fn normalize(&self) -> Option<NormalizedTransaction> {
        let wash_sale = parse_amount(Some(self.wash_sale));
        let gain = parse_amount(Some(self.gain));
        let loss = parse_amount(Some(self.loss));
        let (term, box_code) = classify(self.term, self.covered);
        // Wash sale counts here and again in its own column.
        let gain_loss = gain.checked_sub(loss.abs())?.checked_add(wash_sale)?;

        Some(NormalizedTransaction::new(
            Broker::Fidelity,
            self.description,
            parse_date(self.date_acquired, SourceKind::Fidelity),
            parse_date(self.date_sold, SourceKind::Fidelity),
            LotFigures {
                proceeds: parse_amount(Some(self.proceeds)),
                cost_basis: parse_amount(Some(self.cost_basis)),
                wash_sale,
                gain_loss,
            },
            term,
            box_code,
        ))
    }
}

/// Term from the term column, box from term plus covered status.
pub fn classify(term_raw: &str, covered_raw: &str) -> (Term, BoxCode) {
    let is_long = term_raw.to_uppercase().contains("LONG");
    let covered = covered_raw.to_uppercase();
    let is_covered = covered.contains("COVERED") && !covered.contains("NON");

    let box_code = match (is_long, is_covered) {
        (true, true) => BoxCode::D,
        (true, false) => BoxCode::F,
        (false, true) => BoxCode::A,
        (false, false) => BoxCode::C,
    };
    (Term::from_is_long(is_long), box_code)
}

/// Parse a Fidelity 1099 export into normalized lots.
pub fn parse_fidelity_csv(content: &str) -> Extraction {
    let mut out = Extraction::default();

    for (idx, line) in split_lines(content).enumerate() {
        if !line.starts_with(ROW_PREFIX) {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < MIN_FIELDS {
            debug!(line = idx + 1, fields = fields.len(), "skipping short Fidelity detail row");
            out.skipped_rows += 1;
            continue;
        }

        let row = DetailRow::read(&fields, &FIDELITY_COLUMNS);
        if row.description.is_empty() || row.description.contains(SUBHEADER_LABEL) {
            debug!(line = idx + 1, "skipping Fidelity row without a security description");
            out.skipped_rows += 1;
            continue;
        }

        match row.normalize() {
            Some(tx) => out.transactions.push(tx),
            None => {
                debug!(line = idx + 1, "skipping Fidelity row with out-of-range amounts");
                out.skipped_rows += 1;
            }
        }
    }

    out
}
