//! Coinbase gain/loss report parser
//!
//! The report opens with a few title/summary lines, then a header row:
//!   Transaction Type,Transaction ID,Tax lot ID,Asset name,Amount,Date Acquired,Cost basis (USD),Date of Disposition,Proceeds (USD),Gains (Losses) (USD),Holding period (Days)
//! Asset names and amounts may be double-quoted with embedded commas.

use tracing::debug;
use tradesort_core::text::{leading_int, split_lines};
use tradesort_core::{
    parse_amount, parse_date, BoxCode, Broker, LotFigures, NormalizedTransaction, SourceKind, Term,
};

use super::{cell, Extraction};
use crate::detect::COINBASE_HEADER;

const MIN_FIELDS: usize = 11;
/// Transaction types that dispose of a lot. Buys, sends, receives etc. don't.
const DISPOSAL_TYPES: [&str; 3] = ["Sell", "Trade", "Convert"];
const LONG_TERM_DAYS: i64 = 365;

/// Column positions after the header row.
#[derive(Debug, Clone, Copy)]
pub struct CoinbaseColumns {
    pub transaction_type: usize,
    pub asset_name: usize,
    pub date_acquired: usize,
    pub cost_basis: usize,
    pub date_sold: usize,
    pub proceeds: usize,
    pub gain_loss: usize,
    pub holding_days: usize,
}

pub const COINBASE_COLUMNS: CoinbaseColumns = CoinbaseColumns {
    transaction_type: 0,
    asset_name: 3,
    date_acquired: 5,
    cost_basis: 6,
    date_sold: 7,
    proceeds: 8,
    gain_loss: 9,
    holding_days: 10,
};

struct ReportRow<'a> {
    transaction_type: &'a str,
    asset_name: &'a str,
    date_acquired: &'a str,
    cost_basis: &'a str,
    date_sold: &'a str,
    proceeds: &'a str,
    gain_loss: &'a str,
    holding_days: &'a str,
}

impl<'a> ReportRow<'a> {
    fn read(fields: &'a [String], cols: &CoinbaseColumns) -> Self {
        let fields: Vec<&'a str> = fields.iter().map(String::as_str).collect();
        Self {
            transaction_type: cell(&fields, cols.transaction_type).trim(),
            asset_name: cell(&fields, cols.asset_name).trim(),
            date_acquired: cell(&fields, cols.date_acquired),
            cost_basis: cell(&fields, cols.cost_basis),
            date_sold: cell(&fields, cols.date_sold),
            proceeds: cell(&fields, cols.proceeds),
            gain_loss: cell(&fields, cols.gain_loss),
            holding_days: cell(&fields, cols.holding_days),
        }
    }

    fn is_disposal(&self) -> bool {
        DISPOSAL_TYPES.contains(&self.transaction_type)
    }

    fn normalize(&self) -> NormalizedTransaction {
        let holding_days = leading_int(self.holding_days).unwrap_or(0);
        let term = Term::from_is_long(holding_days > LONG_TERM_DAYS);
        let box_code = match term {
            Term::Long => BoxCode::E,
            Term::Short => BoxCode::B,
        };
        let description = format!("{} ({})", self.asset_name, self.transaction_type);

        NormalizedTransaction::new(
            Broker::Coinbase,
            &description,
            parse_date(self.date_acquired, SourceKind::Coinbase),
            parse_date(self.date_sold, SourceKind::Coinbase),
            LotFigures {
                proceeds: parse_amount(Some(self.proceeds)),
                cost_basis: parse_amount(Some(self.cost_basis)),
                wash_sale: Default::default(),
                gain_loss: parse_amount(Some(self.gain_loss)),
            },
            term,
            box_code,
        )
    }
}

/// Split a report line on commas outside double quotes.
///
/// Every `"` toggles the quoted state and is dropped from the output.
pub fn split_quoted(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Parse a Coinbase gain/loss report into normalized lots.
///
/// Without the expected header row nothing is extracted.
pub fn parse_coinbase_csv(content: &str) -> Extraction {
    let mut out = Extraction::default();

    let mut lines = split_lines(content).enumerate();
    if !lines
        .by_ref()
        .any(|(_, line)| line.trim().starts_with(COINBASE_HEADER))
    {
        debug!("no Coinbase header row found");
        return out;
    }

    for (idx, line) in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields = split_quoted(line);
        if fields.len() < MIN_FIELDS {
            debug!(line = idx + 1, fields = fields.len(), "skipping short Coinbase row");
            out.skipped_rows += 1;
            continue;
        }

        let row = ReportRow::read(&fields, &COINBASE_COLUMNS);
        if !row.is_disposal() {
            debug!(
                line = idx + 1,
                kind = row.transaction_type,
                "skipping non-disposal Coinbase row"
            );
            out.skipped_rows += 1;
            continue;
        }

        out.transactions.push(row.normalize());
    }

    out
}
