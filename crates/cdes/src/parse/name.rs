//! Phenotype-number extraction from strain names.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `<base> #<digits>` at the end, optional whitespace before `#`.
    static ref RE_HASH_NUMBER: Regex = Regex::new(r"^(.+?)\s*#([0-9]+)$").unwrap();
    /// `<base> <digits>` at the end, at least one whitespace before the digits.
    static ref RE_TRAILING_NUMBER: Regex = Regex::new(r"^(.+?)\s+([0-9]+)$").unwrap();
}

/// Breeding-generation markers that may precede a generation number, as in
/// "F 2" or "BX 3".
const GENERATION_MARKERS: [&str; 5] = ["f", "s", "b", "x", "bx"];

/// A strain name split into its base name and phenotype number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedName {
    pub base_name: String,
    pub pheno_number: Option<u32>,
}

/// Splits a phenotype number off a strain name.
///
/// - `"Tropical Teeth #2"` gives `("Tropical Teeth", 2)`
/// - `"Orange Sherbert 52"` gives `("Orange Sherbert", 52)`
/// - `"Oz Kush F2 #15"` gives `("Oz Kush F2", 15)`
/// - `"Oz Kush F2"` and `"Oz Kush F 2"` have no phenotype number: the digits
///   belong to a generation code
///
/// Never fails; unrecognized input comes back trimmed as the base name.
pub fn parse_strain_name(name: &str) -> ParsedName {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return ParsedName::default();
    }

    if let Some(parsed) = match_number(&RE_HASH_NUMBER, trimmed) {
        return parsed;
    }

    if let Some(parsed) = match_number(&RE_TRAILING_NUMBER, trimmed) {
        if !ends_with_generation_marker(&parsed.base_name) {
            return parsed;
        }
    }

    ParsedName {
        base_name: trimmed.to_string(),
        pheno_number: None,
    }
}

fn match_number(re: &Regex, name: &str) -> Option<ParsedName> {
    let caps = re.captures(name)?;
    let base = caps.get(1)?.as_str().trim();
    // Numbers too large for u32 are not phenotype selections.
    let number = caps.get(2)?.as_str().parse::<u32>().ok()?;
    if base.is_empty() {
        return None;
    }
    Some(ParsedName {
        base_name: base.to_string(),
        pheno_number: Some(number),
    })
}

fn ends_with_generation_marker(base: &str) -> bool {
    let last = base.split_whitespace().next_back().unwrap_or("");
    GENERATION_MARKERS
        .iter()
        .any(|marker| last.eq_ignore_ascii_case(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(name: &str) -> (String, Option<u32>) {
        let p = parse_strain_name(name);
        (p.base_name, p.pheno_number)
    }

    #[test]
    fn test_hash_number() {
        assert_eq!(parsed("Tropical Teeth #2"), ("Tropical Teeth".into(), Some(2)));
        assert_eq!(parsed("Wino#4"), ("Wino".into(), Some(4)));
        assert_eq!(parsed("  Gelato #33  "), ("Gelato".into(), Some(33)));
    }

    #[test]
    fn test_trailing_number() {
        assert_eq!(parsed("Orange Sherbert 52"), ("Orange Sherbert".into(), Some(52)));
        assert_eq!(parsed("Cookies 2"), ("Cookies".into(), Some(2)));
    }

    #[test]
    fn test_generation_suffix_is_not_a_phenotype() {
        assert_eq!(parsed("Oz Kush F2"), ("Oz Kush F2".into(), None));
        assert_eq!(parsed("Oz Kush F 2"), ("Oz Kush F 2".into(), None));
        assert_eq!(parsed("Blueberry bx 3"), ("Blueberry bx 3".into(), None));
        assert_eq!(parsed("Oz Kush F2 #15"), ("Oz Kush F2".into(), Some(15)));
    }

    #[test]
    fn test_no_number() {
        assert_eq!(parsed("Blue Dream"), ("Blue Dream".into(), None));
        assert_eq!(parsed(""), (String::new(), None));
        assert_eq!(parsed("   "), (String::new(), None));
        assert_eq!(parsed("#4"), ("#4".into(), None));
        assert_eq!(parsed("42"), ("42".into(), None));
    }

    #[test]
    fn test_overflowing_number() {
        assert_eq!(
            parsed("Haze #99999999999"),
            ("Haze #99999999999".into(), None)
        );
    }
}
