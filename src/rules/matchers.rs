//! Typed stage matchers for the extraction cascade.
//!
//! Each matcher looks at the filename stem and either returns a structured
//! result or `None`; the cascade composes them by priority.

use crate::config::CodePolicy;
use crate::record::ExternalCode;
use tracing::warn;

/// `[porndbid=<digits>]` / `[theporndbid=<digits>]`, anywhere, any case.
pub fn database_id_tag(stem: &str) -> Option<u64> {
    let caps = regex!(r"\[(?:the)?porndbid=([0-9]+)\]", case_insensitive).captures(stem)?;
    let digits = caps.get(1)?.as_str();
    match digits.parse::<u64>() {
        Ok(id) => Some(id),
        Err(err) => {
            warn!(tag = digits, error = %err, "database id tag out of range");
            None
        }
    }
}

/// First catalog-code candidate (`ABC-123`) that survives the rejection
/// rules, uppercased. A candidate that [`scene_id`] would match at the same
/// position is left to that stage.
pub fn catalog_code(stem: &str, policy: &CodePolicy) -> Option<ExternalCode> {
    regex!(r"[a-zA-Z]{2,5}-[0-9]{3,5}")
        .find_iter(stem)
        .filter(|m| !scene_id_starts_at(stem, m.start()))
        .map(|m| m.as_str())
        .find(|candidate| is_acceptable_catalog_code(candidate, policy))
        .map(ExternalCode::catalog)
}

fn is_acceptable_catalog_code(candidate: &str, policy: &CodePolicy) -> bool {
    let upper = candidate.to_uppercase();
    let Some((_, digits)) = upper.split_once('-') else {
        return false;
    };

    if policy.forbidden_prefixes.iter().any(|prefix| upper.starts_with(prefix.as_str())) {
        return false;
    }
    !policy.resolution_values.iter().any(|value| value == digits)
}

fn scene_id_pattern() -> &'static regex::Regex {
    regex!(r"\b((?:did|milf)-?[0-9]{2,4})\b", case_insensitive)
}

fn scene_id_starts_at(stem: &str, start: usize) -> bool {
    scene_id_pattern().find_iter(stem).any(|m| m.start() == start)
}

/// `did`/`milf` scene identifiers as whole words, lowercased.
pub fn scene_id(stem: &str) -> Option<ExternalCode> {
    let caps = scene_id_pattern().captures(stem)?;
    caps.get(1).map(|m| ExternalCode::scene(m.as_str()))
}

/// Expand a two-digit year into the 2000s and join the date parts.
pub fn normalize_date(year: &str, month: &str, day: &str) -> String {
    let prefix = if year.len() == 2 { "20" } else { "" };
    format!("{prefix}{year}-{month}-{day}")
}

/// `true` when the captured trans-marker group is the `TS` token.
pub fn is_trans_marker(group: &str) -> bool {
    group.trim().eq_ignore_ascii_case("TS")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CodeKind;

    fn policy() -> CodePolicy {
        CodePolicy {
            forbidden_prefixes: vec!["WEBDL".into()],
            resolution_values: ["2160", "1080", "720", "480", "360"].iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn tag_variants() {
        assert_eq!(database_id_tag("Some Scene [porndbid=1234]"), Some(1234));
        assert_eq!(database_id_tag("[ThePornDBID=99] x"), Some(99));
        assert_eq!(database_id_tag("[PORNDBID=7]"), Some(7));
        assert_eq!(database_id_tag("porndbid=1234"), None);
        assert_eq!(database_id_tag("[porndbid=]"), None);
        assert_eq!(database_id_tag("[porndbid=99999999999999999999999]"), None);
    }

    #[test]
    fn catalog_first_acceptable_candidate_wins() {
        let code = catalog_code("WEBDL-1080.abp-123.xyz-456", &policy()).unwrap();
        assert_eq!(code.code(), "ABP-123");
        assert_eq!(code.kind(), CodeKind::CatalogCode);
    }

    #[test]
    fn catalog_rejects_resolutions_and_forbidden_prefixes() {
        assert_eq!(catalog_code("Site.Name.WEBDL-720", &policy()), None);
        assert_eq!(catalog_code("Scene.HD-1080", &policy()), None);
        assert_eq!(catalog_code("Scene.webdl-555", &policy()), None);
    }

    #[test]
    fn catalog_leaves_scene_ids_alone() {
        assert_eq!(catalog_code("DID-4521", &policy()), None);
        assert_eq!(catalog_code("milf-1234", &policy()), None);
        assert_eq!(catalog_code("DID-4521.ABC-123", &policy()).unwrap().code(), "ABC-123");
    }

    #[test]
    fn scene_prefixes_the_scene_matcher_cannot_take_stay_catalog_codes() {
        assert_eq!(catalog_code("DID-12345", &policy()).unwrap().code(), "DID-12345");
        assert_eq!(catalog_code("milf-54321", &policy()).unwrap().code(), "MILF-54321");
        // No word boundary after the digits, so this is not a scene id.
        assert_eq!(scene_id("DID-1234x"), None);
        assert_eq!(catalog_code("DID-1234x", &policy()).unwrap().code(), "DID-1234");
    }

    #[test]
    fn scene_ids_are_whole_words() {
        assert_eq!(scene_id("DID-4521").unwrap().code(), "did-4521");
        assert_eq!(scene_id("clip milf77 x").unwrap().code(), "milf77");
        assert_eq!(scene_id("candid-1234"), None);
        assert_eq!(scene_id("did-12345"), None);
    }

    #[test]
    fn two_digit_years_move_to_2000s() {
        assert_eq!(normalize_date("23", "04", "05"), "2023-04-05");
        assert_eq!(normalize_date("1999", "12", "31"), "1999-12-31");
    }

    #[test]
    fn trans_marker_is_case_insensitive() {
        assert!(is_trans_marker("ts"));
        assert!(is_trans_marker(" TS "));
        assert!(!is_trans_marker("TX"));
    }
}
