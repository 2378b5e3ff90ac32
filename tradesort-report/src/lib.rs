//! tradesort-report: working set of extracted files, portfolio summary,
//! CSV export and concurrent batch loading.

pub mod batch;
pub mod export;
pub mod session;
pub mod summary;

pub use batch::{ingest_batch, load_paths, read_document};
pub use export::{to_csv, ExportScope, EXPORT_HEADER};
pub use session::Session;
pub use summary::{aggregate, AggregateView, Totals};
