//! Shared output formatting for analysis results.
//!
//! Plain-text, CSV and JSON writers. Colors are added by the CLI, not here.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::report::{AnalysisResult, ArticleReport, ExportRecord};

/// Default file name prefix for CSV exports.
pub const DEFAULT_CSV_PREFIX: &str = "citation_analysis";

/// Write one article's analysis as human-readable text.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_article_human(
    title: &str,
    analysis: &AnalysisResult,
    writer: &mut dyn Write,
) -> anyhow::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "Article: {title}")?;
    writeln!(writer, "Total citations: {}", analysis.total_citations)?;
    writeln!(writer, "Incomplete citations: {}", analysis.incomplete_count())?;

    if analysis.problems.is_empty() {
        writeln!(writer, "\u{2713} All citations are complete!")?;
    } else {
        writeln!(writer)?;
        writeln!(writer, "Problematic citations:")?;
        for (i, problem) in analysis.problems.iter().enumerate() {
            writeln!(writer)?;
            writeln!(writer, "{}. Missing: {}", i + 1, problem.missing_label())?;
            writeln!(writer, "{}", problem.text)?;
        }
    }
    writeln!(writer)?;
    writeln!(writer, "{}", "-".repeat(50))?;
    Ok(())
}

/// Write the totals of a run over several articles.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_summary_human(reports: &[ArticleReport], writer: &mut dyn Write) -> anyhow::Result<()> {
    let citations: usize = reports.iter().map(|r| r.analysis.total_citations).sum();
    let incomplete: usize = reports.iter().map(|r| r.analysis.incomplete_count()).sum();
    let flagged = reports.iter().filter(|r| !r.analysis.is_complete()).count();

    writeln!(writer)?;
    writeln!(writer, "{}", "=".repeat(50))?;
    writeln!(writer, "  Articles analyzed:     {}", reports.len())?;
    writeln!(writer, "  Articles with issues:  {flagged}")?;
    writeln!(writer, "  Citations found:       {citations}")?;
    writeln!(writer, "  Incomplete citations:  {incomplete}")?;
    writeln!(writer, "{}", "=".repeat(50))?;
    Ok(())
}

/// Write export records as CSV, header first.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_csv(records: &[ExportRecord], writer: &mut dyn Write) -> anyhow::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if records.is_empty() {
        csv_writer.write_record([
            "article_title",
            "total_citations",
            "incomplete_citations",
            "missing_fields",
            "problematic_citations",
        ])?;
    }
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Save export records to `<dir>/<prefix>_<YYYYmmdd_HHMMSS>.csv`.
///
/// Returns `Ok(None)` without touching the filesystem when there is nothing
/// to export.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_csv(
    records: &[ExportRecord],
    dir: &Path,
    prefix: &str,
) -> anyhow::Result<Option<PathBuf>> {
    if records.is_empty() {
        return Ok(None);
    }

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("{prefix}_{timestamp}.csv"));
    let mut file = std::fs::File::create(&path)?;
    write_csv(records, &mut file)?;
    Ok(Some(path))
}

/// Format article reports as JSON to a writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(reports: &[ArticleReport], writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(reports)?;
    writeln!(writer, "{json}")?;
    Ok(())
}
