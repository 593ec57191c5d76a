//! Filesystem article source.
//!
//! Finds saved wikitext on disk (page dumps, `action=raw` downloads) and
//! reads it for the scanner. Symlinks are only followed when
//! `follow_links` is set, and even then must resolve inside the directory
//! being walked.

use std::io::Read;
use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

use crate::config::FsSourceConfig;
use crate::error::{ScanError, ScanErrorKind};

/// Never descended into.
pub const SKIP_DIRS: &[&str] = &["target", "node_modules", ".git"];

/// Extensions treated as wikitext.
pub const WIKITEXT_EXTENSIONS: &[&str] = &["wiki", "wikitext", "mediawiki", "txt"];

/// Files found so far plus everything that went wrong finding them.
#[derive(Default)]
struct Discovery {
    files: Vec<PathBuf>,
    errors: Vec<ScanError>,
    excludes: Vec<Pattern>,
}

impl Discovery {
    fn fail(&mut self, path: impl Into<PathBuf>, kind: ScanErrorKind, message: String) {
        self.errors.push(ScanError::new(path, kind, message));
    }

    fn excluded(&self, path: &Path) -> bool {
        let full = path.to_string_lossy();
        let name = path.file_name().map(|n| n.to_string_lossy());
        self.excludes.iter().any(|pattern| {
            pattern.matches(&full) || name.as_deref().is_some_and(|n| pattern.matches(n))
        })
    }

    fn walk(&mut self, root: &Path, config: &FsSourceConfig) {
        let canonical_root = match root.canonicalize() {
            Ok(r) => r,
            Err(e) => {
                let message = format!("Cannot resolve {}: {e}", root.display());
                self.fail(root, ScanErrorKind::Unreadable, message);
                return;
            }
        };

        let walker = WalkDir::new(root)
            .follow_links(config.follow_links)
            .max_depth(config.max_depth)
            .into_iter()
            .filter_entry(|entry| !is_skipped_dir(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let at = err.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                    let message = format!("Cannot traverse directory: {err}");
                    self.fail(at, ScanErrorKind::Walk, message);
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() || !has_wikitext_extension(path) || self.excluded(path) {
                continue;
            }
            match path.canonicalize() {
                Ok(resolved) if resolved.starts_with(&canonical_root) => {
                    self.files.push(path.to_path_buf());
                }
                Ok(resolved) => {
                    let message = format!(
                        "Resolves to {} outside {}",
                        resolved.display(),
                        canonical_root.display()
                    );
                    self.fail(path, ScanErrorKind::EscapesRoot, message);
                }
                Err(e) => {
                    let message = format!("Cannot resolve path: {e}");
                    self.fail(path, ScanErrorKind::Unreadable, message);
                }
            }
        }
    }
}

fn is_skipped_dir(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIP_DIRS.contains(&name))
}

fn has_wikitext_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| WIKITEXT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Find the wikitext files named by `config.paths`, sorted and de-duplicated.
///
/// Directories are walked for `.wiki`, `.wikitext`, `.mediawiki` and `.txt`
/// files; a path naming a file directly is taken whatever its extension.
/// Paths that do not exist are ignored. Every other problem (bad exclude
/// glob, traversal failure, symlink escaping the root) comes back in the
/// error list.
pub fn find_files(config: &FsSourceConfig) -> (Vec<PathBuf>, Vec<ScanError>) {
    let mut found = Discovery::default();

    for raw in &config.exclude {
        match Pattern::new(raw) {
            Ok(pattern) => found.excludes.push(pattern),
            Err(e) => found.fail(
                raw,
                ScanErrorKind::BadExcludePattern,
                format!("Invalid exclude glob '{raw}': {e}"),
            ),
        }
    }

    for root in &config.paths {
        if root.is_file() {
            if !found.excluded(root) {
                found.files.push(root.clone());
            }
        } else if root.is_dir() {
            found.walk(root, config);
        }
    }

    found.files.sort();
    found.files.dedup();
    (found.files, found.errors)
}

/// Read a wikitext file, refusing anything over `max_file_size` bytes.
///
/// # Errors
///
/// [`ScanErrorKind::Unreadable`], [`ScanErrorKind::TooLarge`] or
/// [`ScanErrorKind::NotUtf8`].
pub fn read_file_bounded(path: &Path, max_file_size: u64) -> Result<String, ScanError> {
    let unreadable = |e: std::io::Error| {
        ScanError::new(path, ScanErrorKind::Unreadable, format!("Cannot read file: {e}"))
    };

    // One byte past the limit is enough to tell the file is too large.
    let mut bytes = Vec::new();
    std::fs::File::open(path)
        .map_err(unreadable)?
        .take(max_file_size.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(unreadable)?;

    if bytes.len() as u64 > max_file_size {
        return Err(ScanError::new(
            path,
            ScanErrorKind::TooLarge,
            format!("Larger than the {max_file_size} byte limit"),
        ));
    }

    String::from_utf8(bytes)
        .map_err(|_| ScanError::new(path, ScanErrorKind::NotUtf8, "File is not valid UTF-8"))
}

/// Article title for a local file: its file stem, underscores as spaces
/// (the way wiki titles appear in dump file names).
#[must_use]
pub fn title_for(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().replace('_', " "))
}
