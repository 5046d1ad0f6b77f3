//! Site abbreviation expansion.
//!
//! Release names often start with a short site tag (`aa.21.05.04.Title.mp4`).
//! The table rewrites the first matching tag to the site's full name before
//! the generic token parse runs. Entries are tried in table order and at most
//! one is applied.

use crate::error::ConfigError;
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;
use tracing::debug;

/// One pattern and its canonical replacement.
#[derive(Debug, Clone)]
pub struct Abbreviation {
    pattern: Regex,
    replacement: String,
}

impl Abbreviation {
    /// Build an entry from a raw pattern. The pattern only counts when it
    /// matches at the start of the input.
    pub fn new(pattern: &str, replacement: &str) -> Result<Self, ConfigError> {
        let pattern = Regex::new(pattern)
            .map_err(|source| ConfigError::Abbreviation { pattern: pattern.to_string(), source })?;
        Ok(Self { pattern, replacement: replacement.to_string() })
    }

    /// Build the usual `short` tag entry: `short` followed by a separator,
    /// case-insensitive, rewritten to `"<full> "`.
    pub fn from_short(short: &str, full: &str) -> Result<Self, ConfigError> {
        let source = format!("^{}[ .-]", regex::escape(short));
        let pattern = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .map_err(|source_err| ConfigError::Abbreviation { pattern: source.clone(), source: source_err })?;
        Ok(Self { pattern, replacement: format!("{full} ") })
    }

    /// Length of the match anchored at the start of `text`, if any.
    fn anchored_match_len(&self, text: &str) -> Option<usize> {
        self.pattern.find(text).filter(|m| m.start() == 0).map(|m| m.end())
    }
}

/// Ordered abbreviation table.
#[derive(Debug, Clone, Default)]
pub struct AbbreviationTable {
    entries: Vec<Abbreviation>,
}

impl AbbreviationTable {
    pub fn new(entries: Vec<Abbreviation>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrite the leading span matched by the first matching entry.
    ///
    /// Returns the input untouched (borrowed) when nothing matches.
    pub fn expand<'a>(&self, text: &'a str) -> Cow<'a, str> {
        for entry in &self.entries {
            if let Some(end) = entry.anchored_match_len(text) {
                let expanded = format!("{}{}", entry.replacement, &text[end..]);
                debug!(from = text, to = %expanded, "expanded site abbreviation");
                return Cow::Owned(expanded);
            }
        }
        Cow::Borrowed(text)
    }
}

impl FromIterator<Abbreviation> for AbbreviationTable {
    fn from_iter<I: IntoIterator<Item = Abbreviation>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(&str, &str)]) -> AbbreviationTable {
        pairs.iter().map(|(s, f)| Abbreviation::from_short(s, f).unwrap()).collect()
    }

    #[test]
    fn rewrites_leading_tag() {
        let t = table(&[("aa", "AmateurAllure")]);
        assert_eq!(t.expand("aa.21.05.04.Title.mp4"), "AmateurAllure 21.05.04.Title.mp4");
        assert_eq!(t.expand("AA-Title.mp4"), "AmateurAllure Title.mp4");
    }

    #[test]
    fn tag_must_be_at_start_and_followed_by_separator() {
        let t = table(&[("aa", "AmateurAllure")]);
        assert!(matches!(t.expand("xaa.Title.mp4"), Cow::Borrowed(_)));
        assert_eq!(t.expand("aaron.Title.mp4"), "aaron.Title.mp4");
    }

    #[test]
    fn only_first_matching_entry_applies() {
        // Both entries match the untouched input; the second must never run,
        // not even against the rewritten text.
        let t = AbbreviationTable::new(vec![
            Abbreviation::new(r"^ab", "ab ab").unwrap(),
            Abbreviation::new(r"^ab", "WRONG").unwrap(),
        ]);
        assert_eq!(t.expand("abc.mp4"), "ab abc.mp4");
    }

    #[test]
    fn later_entry_used_when_earlier_ones_miss() {
        let t = table(&[("zz", "Zed"), ("21n", "21Naturals")]);
        assert_eq!(t.expand("21n.Title.mp4"), "21Naturals Title.mp4");
    }

    #[test]
    fn unanchored_raw_pattern_only_counts_at_start() {
        let t = AbbreviationTable::new(vec![Abbreviation::new("bb", "BigBrand").unwrap()]);
        assert_eq!(t.expand("xbb.mp4"), "xbb.mp4");
        assert_eq!(t.expand("bb.mp4"), "BigBrand.mp4");
    }

    #[test]
    fn short_tags_are_escaped() {
        let t = table(&[("a.b", "Dotted")]);
        assert_eq!(t.expand("axb Title.mp4"), "axb Title.mp4");
        assert_eq!(t.expand("a.b Title.mp4"), "Dotted Title.mp4");
    }

    #[test]
    fn empty_table_is_identity() {
        assert_eq!(AbbreviationTable::default().expand("anything.mp4"), "anything.mp4");
    }
}
