//! The caller-owned working set: extracted files in the order they were added.
//!
//! Files are only appended or removed whole. The flattened transaction list
//! and the summary are derived on every call, never patched in place.

use anyhow::Result;
use tracing::debug;
use tradesort_core::{FileExtractionResult, NormalizedTransaction};

use crate::export::{to_csv, ExportScope};
use crate::summary::{aggregate, AggregateView};

#[derive(Debug, Clone, Default)]
pub struct Session {
    files: Vec<FileExtractionResult>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, result: FileExtractionResult) {
        debug!(file = result.filename(), count = result.count(), "adding file to session");
        self.files.push(result);
    }

    /// Append a completed batch, keeping its order.
    pub fn add_batch(&mut self, results: impl IntoIterator<Item = FileExtractionResult>) {
        for result in results {
            self.add_file(result);
        }
    }

    /// Drop the file at `index` (in add order) and everything it contributed.
    pub fn remove_file(&mut self, index: usize) -> Option<FileExtractionResult> {
        if index >= self.files.len() {
            return None;
        }
        let removed = self.files.remove(index);
        debug!(file = removed.filename(), "removed file from session");
        Some(removed)
    }

    /// Drop the first file with this name.
    pub fn remove_file_named(&mut self, filename: &str) -> Option<FileExtractionResult> {
        let index = self.files.iter().position(|f| f.filename() == filename)?;
        self.remove_file(index)
    }

    /// Start over with an empty working set.
    pub fn reset(&mut self) {
        self.files.clear();
    }

    pub fn files(&self) -> &[FileExtractionResult] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Every transaction: files in add order, each file in scan order.
    pub fn transactions(&self) -> Vec<&NormalizedTransaction> {
        self.files.iter().flat_map(|f| f.transactions()).collect()
    }

    pub fn select(&self, scope: ExportScope) -> Vec<&NormalizedTransaction> {
        self.files
            .iter()
            .flat_map(|f| f.transactions())
            .filter(|tx| scope.includes(tx))
            .collect()
    }

    pub fn summary(&self) -> AggregateView<'_> {
        aggregate(&self.files)
    }

    /// CSV payload for one export scope.
    pub fn export(&self, scope: ExportScope) -> Result<Vec<u8>> {
        to_csv(self.select(scope))
    }
}
