//! Parser and renderer configuration.
//!
//! Configuration comes in two layers:
//!
//! - [`ParserSettings`]: plain, serde-decodable values (usually a TOML table
//!   owned by the host application).
//! - [`ParserConfig`]: the compiled, immutable form. Every pattern is compiled
//!   here, once, and then shared read-only by all parse calls.
//!
//! ```toml
//! # All keys are optional - defaults shown
//! name_parser = "{_site}{_sep}{_optional_date}{_ts}{_name}{_dot}{_ext}"
//! cleanup_patterns = ['\[?WEBDL-?\d{3,4}p?\]?', ...]
//! forbidden_code_prefixes = ["WEBDL"]
//! resolution_values = ["2160", "1080", "720", "480", "360"]
//!
//! [[site_abbreviations]]
//! short = "aa"
//! full = "AmateurAllure"
//!
//! [render]
//! missing_marker = "~~"
//! bad_format_marker = "!!"
//! max_title_length = 180
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::engine::{DEFAULT_NAME_TEMPLATE, TokenPattern};
use crate::error::ConfigError;
use crate::rules::{Abbreviation, AbbreviationTable};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Raw, serializable parser settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserSettings {
    /// Name template for the generic token parse.
    pub name_parser: String,
    /// Removal patterns applied to the captured title, in order. Case-insensitive.
    pub cleanup_patterns: Vec<String>,
    /// Abbreviation table, first match wins.
    pub site_abbreviations: Vec<AbbreviationEntry>,
    /// Catalog-code candidates starting with one of these (uppercase) are rejected.
    pub forbidden_code_prefixes: Vec<String>,
    /// Catalog-code candidates whose digits equal one of these are rejected.
    pub resolution_values: Vec<String>,
    pub render: RenderOptions,
}

/// One `short -> full` abbreviation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AbbreviationEntry {
    pub short: String,
    pub full: String,
}

/// Renderer defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderOptions {
    /// Substituted for absent field values. May be empty.
    pub missing_marker: String,
    /// Substituted when a format spec fails. Empty makes the failure an error.
    pub bad_format_marker: String,
    /// Hard cap, in characters, on the rendered title.
    pub max_title_length: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { missing_marker: "~~".to_string(), bad_format_marker: "!!".to_string(), max_title_length: 180 }
    }
}

const DEFAULT_CLEANUP_PATTERNS: &[&str] = &[
    r"^\s*Full\s*Video\s*-\s*",
    r"\[?WEBDL-?\d{3,4}p?\]?",
    r"\[?WEBRIP\]?",
    r"\[WEB\]",
    r"\[?PORN\]?",
    r"\[?XXX\]?",
    r"\[?\d{3,4}p\]?",
    r"\[?4K\]?",
    r"\[?HEVC\]?",
    r"\[?[xh]\.?26[45]\]?",
];

const DEFAULT_ABBREVIATIONS: &[(&str, &str)] = &[
    ("18og", "18OnlyGirls"),
    ("18yo", "18YearsOld"),
    ("1kf", "1000Facials"),
    ("21ea", "21EroticAnal"),
    ("21fa", "21FootArt"),
    ("21n", "21Naturals"),
    ("2cst", "2ChicksSameTime"),
    ("a1o1", "Asian1on1"),
    ("aa", "AmateurAllure"),
    ("ad", "AmericanDaydreams"),
];

const DEFAULT_FORBIDDEN_PREFIXES: &[&str] = &["WEBDL"];
const DEFAULT_RESOLUTIONS: &[&str] = &["2160", "1080", "720", "480", "360"];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            name_parser: DEFAULT_NAME_TEMPLATE.to_string(),
            cleanup_patterns: owned(DEFAULT_CLEANUP_PATTERNS),
            site_abbreviations: DEFAULT_ABBREVIATIONS
                .iter()
                .map(|(short, full)| AbbreviationEntry { short: short.to_string(), full: full.to_string() })
                .collect(),
            forbidden_code_prefixes: owned(DEFAULT_FORBIDDEN_PREFIXES),
            resolution_values: owned(DEFAULT_RESOLUTIONS),
            render: RenderOptions::default(),
        }
    }
}

impl ParserSettings {
    /// Decode settings from a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Compile every pattern and freeze the result.
    pub fn compile(&self) -> Result<ParserConfig, ConfigError> {
        let token_pattern = TokenPattern::compile(&self.name_parser)?;

        let cleanup = self
            .cleanup_patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| ConfigError::Cleanup { pattern: pattern.clone(), source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let abbreviations = self
            .site_abbreviations
            .iter()
            .map(|entry| Abbreviation::from_short(&entry.short, &entry.full))
            .collect::<Result<AbbreviationTable, _>>()?;

        let code_policy = CodePolicy {
            forbidden_prefixes: self.forbidden_code_prefixes.iter().map(|p| p.to_uppercase()).collect(),
            resolution_values: self.resolution_values.clone(),
        };

        Ok(ParserConfig { token_pattern, cleanup, abbreviations, code_policy, render: self.render.clone() })
    }
}

/// Rejection rules for catalog-code candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodePolicy {
    pub(crate) forbidden_prefixes: Vec<String>,
    pub(crate) resolution_values: Vec<String>,
}

/// Compiled, read-only configuration shared by every parse call.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    pub(crate) token_pattern: TokenPattern,
    pub(crate) cleanup: Vec<Regex>,
    pub(crate) abbreviations: AbbreviationTable,
    pub(crate) code_policy: CodePolicy,
    pub(crate) render: RenderOptions,
}

impl ParserConfig {
    pub fn token_pattern(&self) -> &TokenPattern {
        &self.token_pattern
    }

    pub fn cleanup_patterns(&self) -> &[Regex] {
        &self.cleanup
    }

    pub fn abbreviations(&self) -> &AbbreviationTable {
        &self.abbreviations
    }

    pub fn render_options(&self) -> &RenderOptions {
        &self.render
    }
}
