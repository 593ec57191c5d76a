//! The article-text seam between providers and the scanner pipeline.

use std::collections::BTreeMap;
use std::future::Future;

use crate::client::WikiClient;
use crate::error::Result;

/// Supplies article wikitext by title, one batch at a time.
///
/// Titles that do not exist are omitted from the returned map; that is not
/// an error.
pub trait ArticleSource {
    /// Fetch the wikitext of `titles`, keyed by the provider's canonical title.
    fn fetch_batch(
        &self,
        titles: &[String],
    ) -> impl Future<Output = Result<BTreeMap<String, String>>> + Send;
}

impl ArticleSource for WikiClient {
    fn fetch_batch(
        &self,
        titles: &[String],
    ) -> impl Future<Output = Result<BTreeMap<String, String>>> + Send {
        self.fetch_articles(titles)
    }
}
