//! Batch pipeline: titles → article source → scanner → reports.

use tracing::debug;
use wikicite::{ArticleReport, CitationScanner};
use wikicite_api::{ArticleSource, Result};

/// Fetch `titles` in batches of `batch_size` and analyze every article found.
///
/// Reports come back batch by batch; within a batch, in the source's title
/// order. Titles the source does not know are skipped.
///
/// # Errors
///
/// Returns the first error reported by the source; earlier batches are discarded.
pub async fn scan_titles<S: ArticleSource>(
    source: &S,
    scanner: &CitationScanner,
    titles: &[String],
    batch_size: usize,
) -> Result<Vec<ArticleReport>> {
    let mut reports = Vec::with_capacity(titles.len());
    for (index, batch) in titles.chunks(batch_size.max(1)).enumerate() {
        debug!(batch = index + 1, size = batch.len(), "Analyzing batch");
        let texts = source.fetch_batch(batch).await?;
        reports.extend(
            texts
                .into_iter()
                .map(|(title, text)| ArticleReport::new(title, scanner.analyze(&text))),
        );
    }
    Ok(reports)
}
