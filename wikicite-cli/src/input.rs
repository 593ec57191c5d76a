//! Reading interactive input: title lists and article limits.

use std::collections::HashSet;
use std::io::BufRead;

use anyhow::Result;

/// Default number of articles for a scan when the user just presses enter.
pub const DEFAULT_SCAN_LIMIT: usize = 100;

/// Read titles one per line until a blank line or end of input.
///
/// # Errors
///
/// Returns an error if reading fails.
pub fn read_titles(reader: &mut dyn BufRead) -> Result<Vec<String>> {
    let mut titles = Vec::new();
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let title = line.trim();
        if title.is_empty() {
            break;
        }
        titles.push(title.to_owned());
    }
    Ok(titles)
}

/// Drop repeated titles, keeping the first occurrence of each.
#[must_use]
pub fn unique_titles(titles: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(titles.len());
    titles
        .iter()
        .filter(|t| seen.insert(t.as_str()))
        .cloned()
        .collect()
}

/// Parse a requested article count, defaulting on empty input and capping at `max`.
///
/// # Errors
///
/// Returns an error if the input is not a whole number.
pub fn parse_limit(input: &str, max: usize) -> Result<usize> {
    let trimmed = input.trim();
    let limit = if trimmed.is_empty() {
        DEFAULT_SCAN_LIMIT
    } else {
        trimmed
            .parse::<usize>()
            .map_err(|_| anyhow::anyhow!("Invalid article count: {trimmed}"))?
    };
    Ok(limit.min(max))
}
