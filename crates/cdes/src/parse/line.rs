//! Genetics-string tokenizing and "Name<TAB>Genetics" line parsing.

use lazy_static::lazy_static;
use regex::Regex;

use crate::parse::name::parse_strain_name;

/// Canonical separator between parents in CDES lineage text.
pub const GENETICS_SEPARATOR: &str = "  ";

/// Parent separators in precedence order.
pub const PARENT_SEPARATORS: [&str; 3] = [GENETICS_SEPARATOR, " x ", " X "];

lazy_static! {
    /// A tab (with any surrounding whitespace) or a run of 2+ whitespace.
    static ref RE_FIELD_SEPARATOR: Regex = Regex::new(r"\s*\t\s*|\s{2,}").unwrap();
}

/// Returns the separator used to split `genetics` into parents.
///
/// Precedence is by separator kind, not by position: a string containing
/// both a double space and `" x "` always splits on the double space, so
/// `"A x B  C"` yields `["A x B", "C"]`.
pub fn find_separator(genetics: &str) -> Option<&'static str> {
    PARENT_SEPARATORS
        .into_iter()
        .find(|sep| genetics.contains(sep))
}

/// Splits a genetics string into its ordered parent names.
///
/// Tokens are trimmed and empty tokens dropped. A string with no separator
/// is a single parent; a blank string has none.
pub fn split_parents(genetics: &str) -> Vec<String> {
    let text = genetics.trim();
    if text.is_empty() {
        return Vec::new();
    }

    match find_separator(text) {
        Some(sep) => text
            .split(sep)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(String::from)
            .collect(),
        None => vec![text.to_string()],
    }
}

/// Rewrites `" x "` / `" X "` separators to the canonical double space.
/// Existing double spaces are left as they are.
pub fn normalize_separators(genetics: &str) -> String {
    genetics
        .replace(" x ", GENETICS_SEPARATOR)
        .replace(" X ", GENETICS_SEPARATOR)
}

/// One parsed "Name<TAB>Genetics" line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneticsLine {
    /// The name column exactly as written (trimmed).
    pub strain_name: String,
    pub base_name: String,
    pub pheno_number: Option<u32>,
    /// The genetics column (trimmed), absent if the line had one column.
    pub genetics: Option<String>,
    pub parents: Vec<String>,
}

impl GeneticsLine {
    pub fn parent_count(&self) -> usize {
        self.parents.len()
    }
}

/// Parses one line of breeder notation.
///
/// The name and genetics columns are separated by a tab or by two or more
/// whitespace characters; only the first separator splits columns. A blank
/// line yields `None`. A line with one column yields a record whose
/// `genetics` is absent.
pub fn parse_genetics_line(line: &str) -> Option<GeneticsLine> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut columns = RE_FIELD_SEPARATOR.splitn(trimmed, 2);
    let name = columns.next().unwrap_or_default().trim();
    let genetics = columns.next().map(str::trim).filter(|g| !g.is_empty());

    let parsed = parse_strain_name(name);
    let parents = genetics.map(split_parents).unwrap_or_default();

    Some(GeneticsLine {
        strain_name: name.to_string(),
        base_name: parsed.base_name,
        pheno_number: parsed.pheno_number,
        genetics: genetics.map(String::from),
        parents,
    })
}

/// Parses many lines, skipping blank ones. Order is preserved and one bad
/// line never affects the others.
pub fn bulk_parse_genetics<I, S>(lines: I) -> Vec<GeneticsLine>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let records: Vec<GeneticsLine> = lines
        .into_iter()
        .filter_map(|line| parse_genetics_line(line.as_ref()))
        .collect();
    tracing::debug!(records = records.len(), "bulk genetics parse complete");
    records
}

/// Parses a whole document of genetics lines.
pub fn parse_genetics_text(text: &str) -> Vec<GeneticsLine> {
    bulk_parse_genetics(text.lines())
}
