//! Error types.
//!
//! Filename parsing never fails, so only configuration compilation and
//! template rendering have error enums.

use thiserror::Error;

/// Raised while compiling [`ParserSettings`](crate::ParserSettings) into a
/// [`ParserConfig`](crate::ParserConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unknown placeholder `{{{0}}}` in name template")]
    UnknownPlaceholder(String),

    #[error("placeholder `{0}` captures a group that is already captured earlier in the name template")]
    DuplicateGroup(&'static str),

    #[error("unbalanced `{brace}` at byte {offset} in name template")]
    UnbalancedBrace { brace: char, offset: usize },

    #[error("name template does not compile: {0}")]
    TokenPattern(#[from] fancy_regex::Error),

    #[error("invalid cleanup pattern `{pattern}`: {source}")]
    Cleanup {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid abbreviation pattern `{pattern}`: {source}")]
    Abbreviation {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Hard failures of the template renderer.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("field `{name}` is not a supported template field")]
    UnsupportedField { name: String },

    #[error("cannot apply format spec to `{field}`: {source}")]
    Format {
        field: &'static str,
        #[source]
        source: FormatError,
    },

    #[error("malformed template: {0}")]
    Syntax(String),
}

/// Raised while applying a format spec to one resolved value.
///
/// The renderer swaps these for the bad-format marker unless the marker is
/// configured empty.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("invalid repetition count `{0}`")]
    InvalidCount(String),

    #[error("unknown format code `{code}` for a {kind} value")]
    UnknownCode { code: char, kind: &'static str },

    #[error("{option} not allowed in a {kind} format spec")]
    NotAllowed { option: &'static str, kind: &'static str },

    #[error("invalid format spec `{0}`")]
    InvalidSpec(String),

    #[error("unknown filter `{0}`")]
    UnknownFilter(String),

    #[error("filter `{filter}`: {reason}")]
    FilterArgs { filter: String, reason: String },

    #[error("filter `{filter}` cannot be applied to a {kind}")]
    FilterInput { filter: String, kind: &'static str },
}
