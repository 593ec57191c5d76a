//! # wikicite
//!
//! Finds `{{Cite web}}` citations in Wikipedia wikitext that are missing
//! required fields (by default `title` and `url`).
//!
//! The **core scanner** is input-agnostic: it takes article text and returns
//! an [`AnalysisResult`]. Article text comes from the MediaWiki API
//! (`wikicite-api`) or from local files via [`scan_fs`].
//!
//! ## Quick Start
//!
//! ```rust
//! use wikicite::analyze;
//!
//! let result = analyze("{{Cite web|title=Foo}} {{Cite web|title=Bar|url=http://x}}");
//! assert_eq!(result.total_citations, 2);
//! assert_eq!(result.problems.len(), 1);
//! assert_eq!(result.problems[0].missing, vec!["url"]);
//! assert_eq!(result.problems[0].text, "{{Cite web|title=Foo}}");
//! ```

mod config;
mod error;
mod normalize;
pub mod output;
mod report;
mod scanner;
mod strategy;

pub use config::{
    DEFAULT_PIPE_ALIASES, DEFAULT_REQUIRED_FIELDS, DEFAULT_TEMPLATE, FieldMatch, FsSourceConfig,
    ScanConfig,
};
pub use error::{ScanError, ScanErrorKind};
pub use report::{
    AnalysisResult, ArticleReport, CitationInstance, ExportRecord, Problem, export_records,
};
pub use scanner::{CitationScanner, analyze};

use serde::Serialize;

use strategy::fs::{find_files, read_file_bounded, title_for};

/// Outcome of [`scan_fs`].
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct FsScanReport {
    pub scanned_files: usize,
    /// Discovery failures plus files that could not be read.
    pub failed_files: usize,
    /// One report per scanned file, titled after the file stem.
    pub articles: Vec<ArticleReport>,
    pub scan_errors: Vec<ScanError>,
}

impl FsScanReport {
    /// `true` when every file was read and no citation is incomplete.
    #[must_use]
    pub fn ok(&self) -> bool {
        self.scan_errors.is_empty() && self.articles.iter().all(|a| a.analysis.is_complete())
    }
}

/// Analyze every wikitext file under `fs_config.paths`.
///
/// Each file becomes an [`ArticleReport`] titled after its file stem. Files that
/// cannot be found or read land in `scan_errors` instead.
///
/// # Errors
///
/// Fails before reading anything if no paths are given or one of them does
/// not exist.
pub fn scan_fs(
    fs_config: &FsSourceConfig,
    scanner: &CitationScanner,
) -> anyhow::Result<FsScanReport> {
    if fs_config.paths.is_empty() {
        anyhow::bail!("No paths provided for scanning");
    }
    if let Some(missing) = fs_config.paths.iter().find(|p| !p.exists()) {
        anyhow::bail!("Path does not exist: {}", missing.display());
    }

    let (files, mut scan_errors) = find_files(fs_config);
    let discovery_failures = scan_errors.len();

    let mut articles = Vec::with_capacity(files.len());
    for path in &files {
        match read_file_bounded(path, fs_config.max_file_size) {
            Ok(text) => articles.push(ArticleReport::new(title_for(path), scanner.analyze(&text))),
            Err(e) => scan_errors.push(e),
        }
    }

    Ok(FsScanReport {
        scanned_files: articles.len(),
        failed_files: discovery_failures + (files.len() - articles.len()),
        articles,
        scan_errors,
    })
}
