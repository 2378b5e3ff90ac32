//! tradesort-ingest: broker export detection and dialect-specific parsers.

pub mod detect;
pub mod extract;
pub mod parsers;

pub use detect::detect_source;
pub use extract::{extract, extract_document};
pub use parsers::Extraction;
