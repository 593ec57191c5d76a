//! Text normalization applied before and during citation scanning.

use std::borrow::Cow;

/// Replace every pipe alias (e.g. `{{!}}`) with a literal `|`.
///
/// Borrows the input unchanged when no alias occurs.
pub fn replace_pipe_aliases<'a>(text: &'a str, aliases: &[String]) -> Cow<'a, str> {
    let mut result = Cow::Borrowed(text);
    for alias in aliases {
        if !alias.is_empty() && result.contains(alias.as_str()) {
            result = Cow::Owned(result.replace(alias.as_str(), "|"));
        }
    }
    result
}

/// Strip all whitespace and lower-case. Used only for presence detection.
pub fn normalize_block(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Normalize a configured field name the same way field blocks are normalized,
/// so `Access date` and `accessdate` are the same requirement.
pub fn normalize_field_name(name: &str) -> String {
    normalize_block(name)
}

/// Split a field block on the `|` separators that are not inside a nested
/// template (`{...}`) or a wikilink (`[[...]]`).
///
/// Single brackets (external links, stray text) do not nest.
pub fn top_level_segments(block: &str) -> Vec<&str> {
    let bytes = block.as_bytes();
    let mut segments = Vec::new();
    let mut braces: usize = 0;
    let mut links: usize = 0;
    let mut start = 0;
    let mut idx = 0;

    while idx < bytes.len() {
        let pair = bytes.get(idx + 1) == Some(&bytes[idx]);
        match bytes[idx] {
            b'{' => braces += 1,
            b'}' => braces = braces.saturating_sub(1),
            b'[' if pair => {
                links += 1;
                idx += 1;
            }
            b']' if pair => {
                links = links.saturating_sub(1);
                idx += 1;
            }
            b'|' if braces == 0 && links == 0 => {
                segments.push(&block[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
        idx += 1;
    }
    segments.push(&block[start..]);
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aliases() -> Vec<String> {
        vec!["{{!}}".to_owned(), "{{pipe}}".to_owned()]
    }

    #[test]
    fn test_replace_both_aliases() {
        let out = replace_pipe_aliases("a{{!}}b{{pipe}}c", &aliases());
        assert_eq!(out, "a|b|c");
    }

    #[test]
    fn test_replace_borrows_when_untouched() {
        let out = replace_pipe_aliases("{{Cite web|title=x}}", &aliases());
        assert!(matches!(out, Cow::Borrowed(_)));
    }

    #[test]
    fn test_normalize_block_strips_all_whitespace() {
        assert_eq!(normalize_block(" Title =\tFoo\n| URL = x "), "title=foo|url=x");
    }

    #[test]
    fn test_normalize_field_name() {
        assert_eq!(normalize_field_name("Access date"), "accessdate");
    }

    #[test]
    fn test_segments_ignore_nested_pipes() {
        let segs = top_level_segments("title={{lang|fr|x}}|url=y|publisher=[[A|B]]");
        assert_eq!(segs, vec!["title={{lang|fr|x}}", "url=y", "publisher=[[A|B]]"]);
    }

    #[test]
    fn test_segments_unbalanced_single_brackets() {
        let segs = top_level_segments("title=a[b[c|url=x");
        assert_eq!(segs, vec!["title=a[b[c", "url=x"]);
        let segs = top_level_segments("title=a]]b|url=x");
        assert_eq!(segs, vec!["title=a]]b", "url=x"]);
    }

    #[test]
    fn test_segments_link_inside_external_link() {
        let segs = top_level_segments("title=[http://x[[A|B]]]|url=y");
        assert_eq!(segs, vec!["title=[http://x[[A|B]]]", "url=y"]);
    }

    #[test]
    fn test_segments_single_bracket_is_not_a_link() {
        let segs = top_level_segments("title=[x]|url=y");
        assert_eq!(segs, vec!["title=[x]", "url=y"]);
    }
}
