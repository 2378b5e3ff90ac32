//! Robinhood 1099 CSV parser
//!
//! Expected rows (one per lot, the section header repeats the labels):
//!   1099-B,<acct>,<cusip>,<acquired>,<sold>,<desc>,<qty>,<cost>,<proceeds>,<term>,...,<wash>,...,<8949 code>
//! Dates are `YYYYMMDD`.

use tracing::debug;
use tradesort_core::text::split_lines;
use tradesort_core::{
    parse_amount, parse_date, BoxCode, Broker, LotFigures, NormalizedTransaction, SourceKind, Term,
};

use super::{cell, Extraction};

const ROW_PREFIX: &str = "1099-B,";
const MIN_FIELDS: usize = 15;
const HEADER_LABEL: &str = "DESCRIPTION";

/// Column positions in a `1099-B` row.
#[derive(Debug, Clone, Copy)]
pub struct RobinhoodColumns {
    pub date_acquired: usize,
    pub date_sold: usize,
    pub description: usize,
    pub cost_basis: usize,
    pub proceeds: usize,
    pub term: usize,
    pub wash_sale: usize,
    pub form_8949_code: usize,
}

pub const ROBINHOOD_COLUMNS: RobinhoodColumns = RobinhoodColumns {
    date_acquired: 3,
    date_sold: 4,
    description: 5,
    cost_basis: 7,
    proceeds: 8,
    term: 9,
    wash_sale: 12,
    form_8949_code: 14,
};

struct LotRow<'a> {
    date_acquired: &'a str,
    date_sold: &'a str,
    description: &'a str,
    cost_basis: &'a str,
    proceeds: &'a str,
    term: &'a str,
    wash_sale: &'a str,
    form_8949_code: &'a str,
}

impl<'a> LotRow<'a> {
    fn read(fields: &[&'a str], cols: &RobinhoodColumns) -> Self {
        Self {
            date_acquired: cell(fields, cols.date_acquired),
            date_sold: cell(fields, cols.date_sold),
            description: cell(fields, cols.description).trim(),
            cost_basis: cell(fields, cols.cost_basis),
            proceeds: cell(fields, cols.proceeds),
            term: cell(fields, cols.term).trim(),
            wash_sale: cell(fields, cols.wash_sale),
            form_8949_code: cell(fields, cols.form_8949_code).trim(),
        }
    }

    /// `None` when the gain/loss doesn't fit in a `Decimal`.
    fn normalize(&self) -> Option<NormalizedTransaction> {
        let proceeds = parse_amount(Some(self.proceeds));
        let cost_basis = parse_amount(Some(self.cost_basis));
        let wash_sale = parse_amount(Some(self.wash_sale));
        let term = Term::from_is_long(self.term.eq_ignore_ascii_case("LONG"));
        let gain_loss = proceeds.checked_sub(cost_basis)?.checked_add(wash_sale)?;

        Some(NormalizedTransaction::new(
            Broker::Robinhood,
            self.description,
            parse_date(self.date_acquired, SourceKind::Robinhood),
            parse_date(self.date_sold, SourceKind::Robinhood),
            LotFigures {
                proceeds,
                cost_basis,
                wash_sale,
                gain_loss,
            },
            term,
            box_code(self.form_8949_code, term),
        ))
    }
}

/// Robinhood's own 8949 code when present, otherwise D/A by term.
pub fn box_code(form_8949_code: &str, term: Term) -> BoxCode {
    if !form_8949_code.is_empty() {
        return BoxCode::from_code(form_8949_code);
    }
    match term {
        Term::Long => BoxCode::D,
        Term::Short => BoxCode::A,
    }
}

/// Parse a Robinhood 1099 export into normalized lots.
pub fn parse_robinhood_csv(content: &str) -> Extraction {
    let mut out = Extraction::default();

    for (idx, line) in split_lines(content).enumerate() {
        if !line.starts_with(ROW_PREFIX) {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < MIN_FIELDS {
            debug!(line = idx + 1, fields = fields.len(), "skipping short Robinhood 1099-B row");
            out.skipped_rows += 1;
            continue;
        }

        let row = LotRow::read(&fields, &ROBINHOOD_COLUMNS);
        if row.description.is_empty() || row.description == HEADER_LABEL {
            debug!(line = idx + 1, "skipping Robinhood header or blank description");
            out.skipped_rows += 1;
            continue;
        }

        match row.normalize() {
            Some(tx) => out.transactions.push(tx),
            None => {
                debug!(line = idx + 1, "skipping Robinhood row with out-of-range amounts");
                out.skipped_rows += 1;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const HEADER: &str = concat!(
        "1099-B,ACCOUNT,CUSIP,DATE ACQUIRED,DATE SOLD,DESCRIPTION,QUANTITY,COST,PROCEEDS,",
        "TERM,ORDINARY,FED WITHHELD,WASH SALE,NONCOVERED,FORM 8949 CODE"
    );

    #[test]
    fn test_parses_lots() {
        let text = format!(
            "PAYER,Robinhood Markets Inc\n{HEADER}\n\
             1099-B,123,037833100,20220110,20230615,APPLE INC,10,1500.00,1700.50,LONG,,,0.00,,D\n\
             1099-B,123,88160R101,20230101,20230301,TESLA INC,2,800.00,700.00,SHORT,,,25.00,,\n"
        );

        let out = parse_robinhood_csv(&text);
        assert_eq!(out.transactions.len(), 2);
        assert_eq!(out.skipped_rows, 1);

        let apple = &out.transactions[0];
        assert_eq!(apple.description(), "APPLE INC");
        assert_eq!(apple.date_acquired(), "01/10/2022");
        assert_eq!(apple.date_sold(), "06/15/2023");
        assert_eq!(apple.gain_loss(), dec!(200.50));
        assert_eq!(apple.term(), Term::Long);
        assert_eq!(*apple.box_code(), BoxCode::D);
        assert_eq!(apple.wash_sale_cell(), "");

        let tesla = &out.transactions[1];
        assert_eq!(tesla.term(), Term::Short);
        assert_eq!(*tesla.box_code(), BoxCode::A);
        assert_eq!(tesla.gain_loss(), dec!(-75.00));
        assert_eq!(tesla.wash_sale_cell(), "25.00");
    }

    #[test]
    fn test_term_is_exact_match() {
        let text = "1099-B,1,2,,,FUND,1,10,20,Long-term,,,,,\n";
        let out = parse_robinhood_csv(text);
        assert_eq!(out.transactions[0].term(), Term::Short);
        assert_eq!(out.transactions[0].date_acquired(), "VARIOUS");

        let text = "1099-B,1,2,,,FUND,1,10,20,long,,,,,\n";
        assert_eq!(parse_robinhood_csv(text).transactions[0].term(), Term::Long);
    }

    #[test]
    fn test_form_code_is_verbatim() {
        assert_eq!(box_code("B", Term::Long), BoxCode::B);
        assert_eq!(box_code("X", Term::Short), BoxCode::Other("X".to_string()));
        assert_eq!(box_code("", Term::Long), BoxCode::D);
    }

    #[test]
    fn test_short_rows_skipped() {
        let out = parse_robinhood_csv("1099-B,1,2,3\r1099-B,,,,,,,,,,,,,,\r");
        assert!(out.transactions.is_empty());
        assert_eq!(out.skipped_rows, 2);
    }

    #[test]
    fn test_overflowing_gain_skips_row() {
        let text = "1099-B,1,2,20230101,20230201,SPY,1,-79228162514264337593543950335,\
                    79228162514264337593543950335,SHORT,,,,,\n\
                    1099-B,1,2,20230101,20230201,QQQ,1,10,12,SHORT,,,,,\n";
        let out = parse_robinhood_csv(text);
        assert_eq!(out.transactions.len(), 1);
        assert_eq!(out.transactions[0].description(), "QQQ");
        assert_eq!(out.skipped_rows, 1);
    }
}
