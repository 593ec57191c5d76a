#![allow(clippy::unwrap_used)]
//! Integration tests for `scan_titles` over an in-memory article source.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Mutex;

use wikicite::output::save_csv;
use wikicite::{CitationScanner, ScanConfig, export_records};
use wikicite_api::{ApiError, ArticleSource, Result};
use wikicite_cli::input::unique_titles;
use wikicite_cli::pipeline::scan_titles;

/// Serves fixed texts and records the batches it was asked for.
struct MemorySource {
    articles: BTreeMap<String, String>,
    batches: Mutex<Vec<Vec<String>>>,
    fail_on_batch: Option<usize>,
}

impl MemorySource {
    fn new(articles: &[(&str, &str)]) -> Self {
        Self {
            articles: articles
                .iter()
                .map(|(t, c)| ((*t).to_owned(), (*c).to_owned()))
                .collect(),
            batches: Mutex::new(Vec::new()),
            fail_on_batch: None,
        }
    }
}

impl ArticleSource for MemorySource {
    fn fetch_batch(
        &self,
        titles: &[String],
    ) -> impl Future<Output = Result<BTreeMap<String, String>>> + Send {
        let mut batches = self.batches.lock().unwrap();
        batches.push(titles.to_vec());
        let result = if self.fail_on_batch == Some(batches.len()) {
            Err(ApiError::Status { status: 503 })
        } else {
            Ok(titles
                .iter()
                .filter_map(|t| self.articles.get(t).map(|c| (t.clone(), c.clone())))
                .collect())
        };
        std::future::ready(result)
    }
}

fn titles(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

fn scanner() -> CitationScanner {
    CitationScanner::new(ScanConfig::default()).unwrap()
}

fn corpus() -> MemorySource {
    MemorySource::new(&[
        ("Complete", "{{Cite web|title=A|url=http://a}}"),
        ("No URL", "Text.<ref>{{Cite web|title=B}}</ref>"),
        ("No cites", "Plain text."),
        ("Mixed", "{{Cite web|url=u}} and {{Cite web|title=T|url=u}}"),
    ])
}

#[tokio::test]
async fn test_batches_respect_batch_size() {
    let source = corpus();
    let reports = scan_titles(
        &source,
        &scanner(),
        &titles(&["Complete", "No URL", "No cites", "Mixed", "Absent"]),
        2,
    )
    .await
    .unwrap();

    let batches = source.batches.lock().unwrap().clone();
    assert_eq!(
        batches,
        vec![
            titles(&["Complete", "No URL"]),
            titles(&["No cites", "Mixed"]),
            titles(&["Absent"]),
        ]
    );
    assert_eq!(reports.len(), 4);
}

#[tokio::test]
async fn test_absent_articles_are_skipped() {
    let source = corpus();
    let reports = scan_titles(&source, &scanner(), &titles(&["Absent", "No URL"]), 50)
        .await
        .unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].title, "No URL");
    assert_eq!(reports[0].analysis.problems[0].missing, vec!["url"]);
}

#[tokio::test]
async fn test_repeated_titles_are_fetched_once() {
    let source = corpus();
    let entered = titles(&["No URL", "Complete", "No URL"]);
    let requested = unique_titles(&entered);
    let reports = scan_titles(&source, &scanner(), &requested, 50)
        .await
        .unwrap();

    assert_eq!(requested.len(), 2);
    assert_eq!(reports.len(), requested.len());
    assert_eq!(
        source.batches.lock().unwrap().clone(),
        vec![titles(&["No URL", "Complete"])]
    );
}

#[tokio::test]
async fn test_zero_batch_size_is_treated_as_one() {
    let source = corpus();
    scan_titles(&source, &scanner(), &titles(&["Complete", "Mixed"]), 0)
        .await
        .unwrap();
    assert_eq!(source.batches.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_source_error_propagates() {
    let mut source = corpus();
    source.fail_on_batch = Some(2);
    let err = scan_titles(&source, &scanner(), &titles(&["Complete", "Mixed"]), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 503 }));
}

#[tokio::test]
async fn test_export_keeps_only_incomplete_articles() {
    let source = corpus();
    let reports = scan_titles(
        &source,
        &scanner(),
        &titles(&["Complete", "No URL", "No cites", "Mixed"]),
        50,
    )
    .await
    .unwrap();

    let records = export_records(&reports);
    let exported: Vec<&str> = records.iter().map(|r| r.article_title.as_str()).collect();
    assert_eq!(exported, vec!["Mixed", "No URL"]);

    let mixed = &records[0];
    assert_eq!(mixed.total_citations, 2);
    assert_eq!(mixed.incomplete_citations, 1);
    assert_eq!(mixed.missing_fields, "title");

    let tmp = tempfile::TempDir::new().unwrap();
    let path = save_csv(&records, tmp.path(), "citation_analysis")
        .unwrap()
        .unwrap();
    let csv = std::fs::read_to_string(path).unwrap();
    assert_eq!(
        csv.lines().next().unwrap(),
        "article_title,total_citations,incomplete_citations,missing_fields,problematic_citations"
    );
    assert!(csv.contains("No URL,1,1,url,\"Missing: url\n{{Cite web|title=B}}\""));
}
