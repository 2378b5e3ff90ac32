//! tradesort-core: normalized tax-lot model plus the amount/date normalizers
//! shared by every broker dialect.

pub mod amount;
pub mod date;
pub mod text;
pub mod transaction;
pub mod types;

pub use amount::{format_cents, parse_amount, round_cents};
pub use date::{parse_date, VARIOUS};
pub use transaction::{
    FileExtractionResult, LotFigures, NormalizedTransaction, RawDocument, DESCRIPTION_WIDTH,
};
pub use types::{BoxCode, Broker, SourceKind, Term};
