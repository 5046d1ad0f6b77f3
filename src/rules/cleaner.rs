//! Title cleanup.

use regex::Regex;

/// Normalize a raw title capture.
///
/// Each cleanup pattern removes all of its matches, one pattern at a time in
/// list order, so a pattern sees the output of the ones before it. Dots then
/// become spaces, whitespace runs collapse, and leading/trailing dashes go.
pub fn clean_name(raw: &str, cleanup: &[Regex]) -> String {
    let mut name = raw.to_string();
    for pattern in cleanup {
        name = pattern.replace_all(&name, "").into_owned();
    }

    let spaced = name.replace('.', " ");
    let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dots_become_single_spaces() {
        assert_eq!(clean_name("A.B..C", &[]), "A B C");
    }

    #[test]
    fn strips_outer_dashes() {
        assert_eq!(clean_name("-Title-", &[]), "Title");
        assert_eq!(clean_name("  spaced   out  ", &[]), "spaced out");
    }

    #[test]
    fn patterns_apply_in_order() {
        let first = Regex::new("ab").unwrap();
        let second = Regex::new("c").unwrap();

        // "acb": no "ab" yet, then "c" goes -> "ab"
        assert_eq!(clean_name("acb", &[first.clone(), second.clone()]), "ab");
        // "acb": "c" goes first, which exposes "ab" -> ""
        assert_eq!(clean_name("acb", &[second, first]), "");
    }

    #[test]
    fn removal_is_global() {
        let tag = Regex::new(r"\[XXX\]").unwrap();
        assert_eq!(clean_name("[XXX].One.[XXX].Two", &[tag]), "One Two");
    }

    #[test]
    fn may_produce_empty_title() {
        let everything = Regex::new(".*").unwrap();
        assert_eq!(clean_name("Whatever", &[everything]), "");
    }
}
