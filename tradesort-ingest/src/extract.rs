//! Detection + dispatch: one raw document in, one extraction result out.

use tracing::{info, warn};
use tradesort_core::{Broker, FileExtractionResult, RawDocument};

use crate::detect::detect_source;
use crate::parsers::{parse_coinbase_csv, parse_fidelity_csv, parse_robinhood_csv, Extraction};

/// Run the parser for a known broker.
pub fn extract(content: &str, broker: Broker) -> Extraction {
    match broker {
        Broker::Fidelity => parse_fidelity_csv(content),
        Broker::Robinhood => parse_robinhood_csv(content),
        Broker::Coinbase => parse_coinbase_csv(content),
    }
}

/// Detect the dialect of `doc` and extract its lots.
///
/// Unrecognized documents never reach a parser; they come back with zero
/// transactions. The document is consumed: only the result is kept.
pub fn extract_document(doc: RawDocument) -> FileExtractionResult {
    let source = detect_source(&doc.content);

    let Some(broker) = source.broker() else {
        warn!(file = %doc.name, "unrecognized export format; nothing extracted");
        return FileExtractionResult::unrecognized(doc.name);
    };

    let extraction = extract(&doc.content, broker);
    info!(
        file = %doc.name,
        source = %source,
        transactions = extraction.transactions.len(),
        skipped = extraction.skipped_rows,
        "extracted"
    );

    FileExtractionResult::new(doc.name, source, extraction.transactions, extraction.skipped_rows)
}
