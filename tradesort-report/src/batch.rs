//! Concurrent file intake.
//!
//! Reads run concurrently but results come back in submission order, and a
//! single failed read fails the whole batch so nothing partial reaches the
//! session.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use futures_util::future::join_all;
use tracing::{debug, info};
use tradesort_core::{FileExtractionResult, RawDocument};
use tradesort_ingest::extract_document;

const BOM: char = '\u{feff}';

/// Await `fut`, giving up after `limit` when one is set.
pub async fn with_timeout<T, F>(fut: F, limit: Option<Duration>, what: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| anyhow!("{} timed out after {:?}", what, limit))?,
        None => fut.await,
    }
}

/// Read one file as text. Invalid UTF-8 is replaced rather than rejected.
pub async fn read_document(path: &Path, limit: Option<Duration>) -> Result<RawDocument> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let read = async {
        tokio::fs::read(path)
            .await
            .with_context(|| format!("reading {}", path.display()))
    };
    let bytes = with_timeout(read, limit, &format!("reading {}", path.display())).await?;

    let text = String::from_utf8_lossy(&bytes);
    let content = text.strip_prefix(BOM).unwrap_or(&text).to_string();
    debug!(file = %name, bytes = bytes.len(), "read document");

    Ok(RawDocument::new(name, content))
}

/// Wait for every read, then extract each document in submission order.
pub async fn ingest_batch<I, F>(reads: I) -> Result<Vec<FileExtractionResult>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<RawDocument>>,
{
    let docs = join_all(reads)
        .await
        .into_iter()
        .collect::<Result<Vec<_>>>()
        .context("batch aborted; no files were added")?;

    Ok(docs.into_iter().map(extract_document).collect())
}

/// Read and extract every path as one batch.
pub async fn load_paths(
    paths: &[PathBuf],
    limit: Option<Duration>,
) -> Result<Vec<FileExtractionResult>> {
    info!(files = paths.len(), "loading batch");
    let results = ingest_batch(paths.iter().map(|p| read_document(p, limit))).await?;
    let transactions: usize = results.iter().map(|r| r.count()).sum();
    info!(files = results.len(), transactions, "batch loaded");
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use tradesort_core::SourceKind;

    type PendingRead = Pin<Box<dyn Future<Output = Result<RawDocument>>>>;

    const ROBINHOOD: &str = concat!(
        "Robinhood Markets Inc\n",
        "1099-B,1,2,20230101,20230201,SPY,1,400,410,SHORT,,,,,\n"
    );

    async fn delayed(name: &'static str, content: &'static str, ms: u64) -> Result<RawDocument> {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        Ok(RawDocument::new(name, content))
    }

    #[tokio::test]
    async fn test_results_keep_submission_order() {
        let results = ingest_batch(vec![
            Box::pin(delayed("a.csv", ROBINHOOD, 30)) as PendingRead,
            Box::pin(delayed("b.csv", "not a broker", 1)),
            Box::pin(delayed("c.csv", ROBINHOOD, 10)),
        ])
        .await
        .unwrap();

        let names: Vec<_> = results.iter().map(|r| r.filename()).collect();
        assert_eq!(names, vec!["a.csv", "b.csv", "c.csv"]);
        assert_eq!(results[1].detected_source(), SourceKind::Unrecognized);
        assert_eq!(results[2].count(), 1);
    }

    #[tokio::test]
    async fn test_one_failure_fails_batch() {
        let ok: PendingRead = Box::pin(delayed("a.csv", ROBINHOOD, 1));
        let bad: PendingRead = Box::pin(async { Err(anyhow!("disk on fire")) });
        let err = ingest_batch(vec![ok, bad]).await.unwrap_err();
        assert!(format!("{err:#}").contains("disk on fire"));
    }

    #[tokio::test]
    async fn test_timeout_bounds_a_stalled_read() {
        let stalled = std::future::pending::<Result<()>>();
        let err = with_timeout(stalled, Some(Duration::from_millis(10)), "stalled read")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_read_document_strips_bom() {
        let dir = std::env::temp_dir().join(format!("tradesort-batch-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("bom.csv");
        tokio::fs::write(&path, format!("{BOM}{ROBINHOOD}")).await.unwrap();

        let doc = read_document(&path, None).await.unwrap();
        assert_eq!(doc.name, "bom.csv");
        assert!(doc.content.starts_with("Robinhood Markets"));

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let missing = PathBuf::from("/definitely/not/here.csv");
        assert!(load_paths(&[missing], None).await.is_err());
    }
}
