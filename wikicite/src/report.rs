//! Analysis result types.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::normalize::normalize_block;

/// One occurrence of the target template within an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CitationInstance {
    /// Text between the opening pipe and the closing `}}`, as written.
    pub raw_field_block: String,
    /// `raw_field_block` without whitespace, lower-cased. Detection only.
    pub normalized_text: String,
    /// Byte offset of the opening `{{` in the alias-normalized article text.
    pub offset: usize,
}

impl CitationInstance {
    #[must_use]
    pub fn new(raw_field_block: &str, offset: usize) -> Self {
        Self {
            raw_field_block: raw_field_block.to_owned(),
            normalized_text: normalize_block(raw_field_block),
            offset,
        }
    }

    /// Re-wrap the field block into template syntax for reporting.
    #[must_use]
    pub fn reconstructed_text(&self, template_name: &str) -> String {
        format!("{{{{{template_name}|{}}}}}", self.raw_field_block)
    }
}

/// An incomplete citation: which fields are missing and what it looked like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    /// Missing field names, in required-field order.
    pub missing: Vec<String>,
    /// The reconstructed citation snippet.
    pub text: String,
    /// Where the citation starts, as [`CitationInstance::offset`].
    pub offset: usize,
}

impl Problem {
    /// Missing fields joined for display, e.g. `title, url`.
    #[must_use]
    pub fn missing_label(&self) -> String {
        self.missing.join(", ")
    }
}

/// Result of analyzing one article's text.
///
/// `missing_by_instance` and `problems` always have the same length, never
/// exceeding `total_citations`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    /// Number of target-template citations found.
    pub total_citations: usize,
    /// Missing field names for each incomplete citation, in discovery order.
    pub missing_by_instance: Vec<Vec<String>>,
    /// One entry per incomplete citation, in discovery order.
    pub problems: Vec<Problem>,
}

impl AnalysisResult {
    /// Number of citations missing at least one required field.
    #[must_use]
    pub fn incomplete_count(&self) -> usize {
        self.problems.len()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Analysis of a single named article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleReport {
    pub title: String,
    #[serde(flatten)]
    pub analysis: AnalysisResult,
}

impl ArticleReport {
    #[must_use]
    pub fn new(title: impl Into<String>, analysis: AnalysisResult) -> Self {
        Self {
            title: title.into(),
            analysis,
        }
    }
}

/// One CSV row of a batch export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord {
    pub article_title: String,
    pub total_citations: usize,
    pub incomplete_citations: usize,
    /// Distinct missing-field labels, sorted and joined with `"; "`.
    pub missing_fields: String,
    /// Every problem snippet framed with its label, separated by a blank line.
    pub problematic_citations: String,
}

impl ExportRecord {
    /// Flatten a report into an export row.
    ///
    /// Returns `None` when the article has no incomplete citations; those
    /// are never exported.
    #[must_use]
    pub fn from_report(report: &ArticleReport) -> Option<Self> {
        let analysis = &report.analysis;
        if analysis.is_complete() {
            return None;
        }

        let labels: BTreeSet<String> = analysis
            .problems
            .iter()
            .map(Problem::missing_label)
            .collect();

        let problematic = analysis
            .problems
            .iter()
            .map(|p| format!("Missing: {}\n{}", p.missing_label(), p.text))
            .collect::<Vec<_>>()
            .join("\n\n");

        Some(Self {
            article_title: report.title.clone(),
            total_citations: analysis.total_citations,
            incomplete_citations: analysis.incomplete_count(),
            missing_fields: labels.into_iter().collect::<Vec<_>>().join("; "),
            problematic_citations: problematic,
        })
    }
}

/// Keep only articles with incomplete citations, flattened for export.
#[must_use]
pub fn export_records(reports: &[ArticleReport]) -> Vec<ExportRecord> {
    reports.iter().filter_map(ExportRecord::from_report).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(missing: &[&str], text: &str) -> Problem {
        Problem {
            missing: missing.iter().map(|m| (*m).to_owned()).collect(),
            text: text.to_owned(),
            offset: 0,
        }
    }

    fn report(title: &str, total: usize, problems: Vec<Problem>) -> ArticleReport {
        ArticleReport::new(
            title,
            AnalysisResult {
                total_citations: total,
                missing_by_instance: problems.iter().map(|p| p.missing.clone()).collect(),
                problems,
            },
        )
    }

    #[test]
    fn test_reconstructed_text() {
        let inst = CitationInstance::new("title=Foo ", 0);
        assert_eq!(inst.reconstructed_text("Cite web"), "{{Cite web|title=Foo }}");
        assert_eq!(inst.normalized_text, "title=foo");
    }

    #[test]
    fn test_export_skips_complete_articles() {
        let complete = report("Done", 3, vec![]);
        assert!(ExportRecord::from_report(&complete).is_none());
    }

    #[test]
    fn test_export_deduplicates_labels() {
        let r = report(
            "Page",
            4,
            vec![
                problem(&["url"], "{{Cite web|title=A}}"),
                problem(&["title", "url"], "{{Cite web|date=2020}}"),
                problem(&["url"], "{{Cite web|title=B}}"),
            ],
        );
        let record = ExportRecord::from_report(&r).unwrap();
        assert_eq!(record.article_title, "Page");
        assert_eq!(record.total_citations, 4);
        assert_eq!(record.incomplete_citations, 3);
        assert_eq!(record.missing_fields, "title, url; url");
        assert_eq!(
            record.problematic_citations,
            "Missing: url\n{{Cite web|title=A}}\n\n\
             Missing: title, url\n{{Cite web|date=2020}}\n\n\
             Missing: url\n{{Cite web|title=B}}"
        );
    }

    #[test]
    fn test_export_records_filters() {
        let reports = vec![
            report("Clean", 1, vec![]),
            report("Dirty", 1, vec![problem(&["title"], "{{Cite web|url=x}}")]),
        ];
        let records = export_records(&reports);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].article_title, "Dirty");
    }
}
