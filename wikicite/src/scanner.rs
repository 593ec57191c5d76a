//! Citation template scanner.
//!
//! Uses a two-stage approach:
//! 1. An opening-marker regex finds where each target template starts
//! 2. A brace-depth walk finds the matching `}}`, then field presence is checked

use std::sync::LazyLock;

use anyhow::{Result, bail};
use regex::Regex;

use crate::config::{FieldMatch, ScanConfig};
use crate::normalize::{normalize_field_name, replace_pipe_aliases, top_level_segments};
use crate::report::{AnalysisResult, CitationInstance, Problem};

static DEFAULT_SCANNER: LazyLock<CitationScanner> = LazyLock::new(|| {
    match CitationScanner::new(ScanConfig::default()) {
        Ok(scanner) => scanner,
        Err(err) => panic!("Invalid default scan config: {err}"),
    }
});

/// Analyze article text with the default configuration
/// (`Cite web`, requiring `title` and `url`).
#[must_use]
pub fn analyze(article_text: &str) -> AnalysisResult {
    DEFAULT_SCANNER.analyze(article_text)
}

/// Finds target-template citations in wikitext and reports missing fields.
///
/// Total over all inputs: malformed fragments are skipped, never reported
/// as errors. Holds no mutable state, so one scanner can be shared freely.
#[derive(Debug, Clone)]
pub struct CitationScanner {
    config: ScanConfig,
    required: Vec<String>,
    opening: Regex,
}

impl CitationScanner {
    /// Build a scanner for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the template name is blank, a required field name
    /// is blank, or no required fields are configured.
    pub fn new(config: ScanConfig) -> Result<Self> {
        let opening = build_opening_regex(&config.template_name)?;

        if config.required_fields.is_empty() {
            bail!("At least one required field must be configured");
        }
        let mut required = Vec::with_capacity(config.required_fields.len());
        for field in &config.required_fields {
            let name = normalize_field_name(field);
            if name.is_empty() {
                bail!("Required field names must not be blank");
            }
            if !required.contains(&name) {
                required.push(name);
            }
        }

        Ok(Self {
            config,
            required,
            opening,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Normalized required field names, in reporting order.
    #[must_use]
    pub fn required_fields(&self) -> &[String] {
        &self.required
    }

    /// Analyze one article's wikitext.
    #[must_use]
    pub fn analyze(&self, article_text: &str) -> AnalysisResult {
        let instances = self.extract(article_text);
        let mut result = AnalysisResult {
            total_citations: instances.len(),
            ..AnalysisResult::default()
        };

        for instance in &instances {
            let missing = self.missing_fields(instance);
            if !missing.is_empty() {
                let text = instance.reconstructed_text(&self.config.template_name);
                result.missing_by_instance.push(missing.clone());
                result.problems.push(Problem {
                    missing,
                    text,
                    offset: instance.offset,
                });
            }
        }
        result
    }

    /// Extract every target-template citation, in source order.
    #[must_use]
    pub fn extract(&self, article_text: &str) -> Vec<CitationInstance> {
        let text = replace_pipe_aliases(article_text, &self.config.pipe_aliases);
        let mut instances = Vec::new();
        let mut pos = 0;

        while let Some(open) = self.opening.find_at(&text, pos) {
            let body_start = open.end();
            if let Some(len) = find_closing(&text[body_start..], self.config.max_nesting_depth) {
                instances.push(CitationInstance::new(
                    &text[body_start..body_start + len],
                    open.start(),
                ));
                pos = body_start + len + 2;
            } else {
                // Malformed: resume right after the opening marker.
                pos = body_start;
            }
        }
        instances
    }

    /// Required fields absent from a citation, in required-field order.
    #[must_use]
    pub fn missing_fields(&self, instance: &CitationInstance) -> Vec<String> {
        self.required
            .iter()
            .filter(|name| !has_field(&instance.normalized_text, name, self.config.field_match))
            .cloned()
            .collect()
    }
}

/// Build the case-insensitive opening-marker regex for a template name.
///
/// `Cite web` becomes `\{\{\s*cite[\s_]+web\s*\|`.
fn build_opening_regex(template_name: &str) -> Result<Regex> {
    let words: Vec<String> = template_name
        .split(|c: char| c.is_whitespace() || c == '_')
        .filter(|w| !w.is_empty())
        .map(regex::escape)
        .collect();
    if words.is_empty() {
        bail!("Template name must not be blank");
    }
    let pattern = format!(r"(?i)\{{\{{\s*{}\s*\|", words.join(r"[\s_]+"));
    Ok(Regex::new(&pattern)?)
}

/// Length of the field block, i.e. the index of the first `}}` at brace
/// depth zero.
///
/// Returns `None` for a stray `}` at depth zero, more than `max_depth`
/// open braces, or end of input before the closing marker.
fn find_closing(body: &str, max_depth: usize) -> Option<usize> {
    let bytes = body.as_bytes();
    let mut depth: usize = 0;

    for (idx, &byte) in bytes.iter().enumerate() {
        match byte {
            b'{' => {
                depth += 1;
                if depth > max_depth {
                    return None;
                }
            }
            b'}' if depth > 0 => depth -= 1,
            b'}' => {
                return (bytes.get(idx + 1) == Some(&b'}')).then_some(idx);
            }
            _ => {}
        }
    }
    None
}

fn has_field(normalized: &str, name: &str, mode: FieldMatch) -> bool {
    match mode {
        FieldMatch::TopLevel => top_level_segments(normalized)
            .into_iter()
            .filter_map(|segment| segment.split_once('='))
            .any(|(key, _)| key == name),
        FieldMatch::Substring => normalized.contains(&format!("{name}=")),
    }
}
