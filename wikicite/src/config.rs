//! Scanner settings, plus the options for reading wikitext from disk.
//!
//! [`ScanConfig`] decides what a complete citation is; [`FsSourceConfig`]
//! only matters to [`crate::scan_fs`].

use std::path::PathBuf;

/// Template scanned for by default.
pub const DEFAULT_TEMPLATE: &str = "Cite web";

/// Fields every citation must carry by default, in reporting order.
pub const DEFAULT_REQUIRED_FIELDS: &[&str] = &["title", "url"];

/// Templates that render as a literal `|` and may stand in for a field separator.
pub const DEFAULT_PIPE_ALIASES: &[&str] = &["{{!}}", "{{pipe}}"];

/// Controls how a required field is recognised inside a citation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum FieldMatch {
    /// Only top-level `name=` assignments count (default).
    ///
    /// `urlstatus=` or `archive-url=` never satisfy `url`, and assignments
    /// inside nested templates or wikilinks are ignored.
    #[default]
    TopLevel,
    /// Permissive: the field counts as present whenever `name=` appears
    /// anywhere in the whitespace-stripped field block.
    Substring,
}

/// What counts as a complete citation, wherever the article text comes from.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ScanConfig {
    /// Display name of the target template (default: `Cite web`).
    ///
    /// Matched case-insensitively; words may be separated by any run of
    /// whitespace or underscores. Also used when reconstructing snippets.
    pub template_name: String,
    /// Required field names, in the order missing fields are reported.
    pub required_fields: Vec<String>,
    /// Sequences replaced by a literal `|` before extraction.
    pub pipe_aliases: Vec<String>,
    /// How field presence is decided.
    pub field_match: FieldMatch,
    /// Maximum number of simultaneously open braces inside a field block
    /// (default: 16). Citations nested deeper are skipped as malformed.
    pub max_nesting_depth: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            template_name: DEFAULT_TEMPLATE.to_owned(),
            required_fields: DEFAULT_REQUIRED_FIELDS
                .iter()
                .map(|f| (*f).to_owned())
                .collect(),
            pipe_aliases: DEFAULT_PIPE_ALIASES
                .iter()
                .map(|a| (*a).to_owned())
                .collect(),
            field_match: FieldMatch::default(),
            max_nesting_depth: 16,
        }
    }
}

/// Where [`crate::scan_fs`] looks for saved wikitext.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct FsSourceConfig {
    /// Files or directories; at least one, and each must exist.
    pub paths: Vec<PathBuf>,
    /// Globs matched against the full path and the file name.
    pub exclude: Vec<String>,
    /// Larger files are skipped with [`crate::ScanErrorKind::TooLarge`] (default 10 MiB).
    pub max_file_size: u64,
    pub follow_links: bool,
    /// Directory levels below each root (default 64).
    pub max_depth: usize,
}

impl Default for FsSourceConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            exclude: Vec::new(),
            max_file_size: 10_485_760,
            follow_links: false,
            max_depth: 64,
        }
    }
}
