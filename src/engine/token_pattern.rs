//! Composite token pattern compilation.
//!
//! A name template such as `{_site}{_sep}{_optional_date}{_ts}{_name}{_dot}{_ext}`
//! is expanded into one regular expression with named groups `site`, `year`,
//! `month`, `day`, `trans`, `name` (and `ext`, which the cascade ignores).
//!
//! The title sub-pattern needs a negative lookahead so the title cannot swallow
//! a trailing date, which the `regex` crate cannot express. The composite
//! pattern is therefore compiled with `fancy_regex`; every other pattern in the
//! crate stays on `regex`.
//!
//! ## Template syntax
//!
//! - `{placeholder}` expands to a fixed sub-pattern (see [`Placeholder`]).
//! - `{{` and `}}` are literal braces.
//! - Any other text is copied verbatim and is regex syntax.
//!
//! ## Invariants
//!
//! - Compiled once per configuration; [`TokenPattern::captures`] never compiles.
//! - A capture-bearing placeholder appears at most once, and the two date
//!   variants are mutually exclusive (they share group names).

use crate::error::ConfigError;
use tracing::warn;

/// The default name template.
pub const DEFAULT_NAME_TEMPLATE: &str = "{_site}{_sep}{_optional_date}{_ts}{_name}{_dot}{_ext}";

const SEPARATOR: &str = r"[.\- ]+";
const SITE: &str = r"(?P<site>.*?)";
const DATE: &str = r"(?P<year>[0-9]{2}(?:[0-9]{2})?)[.\- ]+(?P<month>[0-9]{2})[.\- ]+(?P<day>[0-9]{2})";
const OPTIONAL_DATE: &str =
    r"(?:(?P<year>[0-9]{2}(?:[0-9]{2})?)[.\- ]+(?P<month>[0-9]{2})[.\- ]+(?P<day>[0-9]{2})[.\- ]+)?";
const TRANS_MARKER: &str = r"(?:(?P<trans>[Tt][Ss])[.\- ]+)?";
const TITLE: &str = r"(?P<name>(?:.(?![0-9]{2,4}[.\- ][0-9]{2}[.\- ][0-9]{2}))*)";
const DOT: &str = r"\.";
const EXTENSION: &str = r"(?P<ext>[a-zA-Z0-9]{3,4})$";

/// One template placeholder and the sub-pattern it expands to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Site,
    Separator,
    Date,
    OptionalDate,
    TransMarker,
    Title,
    Dot,
    Extension,
}

impl Placeholder {
    /// Resolve a placeholder by its legacy (`_ts`) or descriptive (`trans-marker`) name.
    pub fn from_name(name: &str) -> Option<Self> {
        let placeholder = match name {
            "_site" | "site" => Self::Site,
            "_sep" | "separator" => Self::Separator,
            "_date" | "date" => Self::Date,
            "_optional_date" | "optional-date" => Self::OptionalDate,
            "_ts" | "trans-marker" => Self::TransMarker,
            "_name" | "title" => Self::Title,
            "_dot" | "dot" => Self::Dot,
            "_ext" | "extension" => Self::Extension,
            _ => return None,
        };
        Some(placeholder)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::Separator => "separator",
            Self::Date => "date",
            Self::OptionalDate => "optional-date",
            Self::TransMarker => "trans-marker",
            Self::Title => "title",
            Self::Dot => "dot",
            Self::Extension => "extension",
        }
    }

    pub fn sub_pattern(self) -> &'static str {
        match self {
            Self::Site => SITE,
            Self::Separator => SEPARATOR,
            Self::Date => DATE,
            Self::OptionalDate => OPTIONAL_DATE,
            Self::TransMarker => TRANS_MARKER,
            Self::Title => TITLE,
            Self::Dot => DOT,
            Self::Extension => EXTENSION,
        }
    }

    /// Placeholders sharing a group key cannot both appear in one template.
    fn group_key(self) -> Option<&'static str> {
        match self {
            Self::Site => Some("site"),
            Self::Date | Self::OptionalDate => Some("date"),
            Self::TransMarker => Some("trans"),
            Self::Title => Some("name"),
            Self::Extension => Some("ext"),
            Self::Separator | Self::Dot => None,
        }
    }
}

/// Captured groups of one successful composite-pattern match.
///
/// Empty groups are reported as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenCaptures<'t> {
    pub site: Option<&'t str>,
    pub year: Option<&'t str>,
    pub month: Option<&'t str>,
    pub day: Option<&'t str>,
    pub trans: Option<&'t str>,
    pub name: Option<&'t str>,
}

/// The compiled composite pattern for one name template.
#[derive(Debug, Clone)]
pub struct TokenPattern {
    template: String,
    placeholders: Vec<Placeholder>,
    regex: fancy_regex::Regex,
}

impl TokenPattern {
    /// Expand `template` and compile it.
    pub fn compile(template: &str) -> Result<Self, ConfigError> {
        let (source, placeholders) = expand(template)?;
        let regex = fancy_regex::Regex::new(&source)?;
        Ok(Self { template: template.to_string(), placeholders, regex })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Placeholders in template order.
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// The expanded regular expression.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Search `haystack` for the composite pattern.
    ///
    /// A backtrack-limit abort is logged and reported as no match.
    pub fn captures<'t>(&self, haystack: &'t str) -> Option<TokenCaptures<'t>> {
        let caps = match self.regex.captures(haystack) {
            Ok(Some(caps)) => caps,
            Ok(None) => return None,
            Err(err) => {
                warn!(error = %err, input = haystack, "token pattern aborted");
                return None;
            }
        };

        let group = |name: &str| caps.name(name).map(|m| m.as_str()).filter(|s| !s.is_empty());

        Some(TokenCaptures {
            site: group("site"),
            year: group("year"),
            month: group("month"),
            day: group("day"),
            trans: group("trans"),
            name: group("name"),
        })
    }
}

fn expand(template: &str) -> Result<(String, Vec<Placeholder>), ConfigError> {
    let mut source = String::with_capacity(template.len() * 8);
    let mut placeholders: Vec<Placeholder> = Vec::new();
    let mut chars = template.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        match ch {
            '{' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                source.push('{');
            }
            '}' if matches!(chars.peek(), Some((_, '}'))) => {
                chars.next();
                source.push('}');
            }
            '}' => return Err(ConfigError::UnbalancedBrace { brace: '}', offset }),
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, '{')) | None => return Err(ConfigError::UnbalancedBrace { brace: '{', offset }),
                        Some((_, c)) => name.push(c),
                    }
                }

                let placeholder =
                    Placeholder::from_name(name.trim()).ok_or_else(|| ConfigError::UnknownPlaceholder(name.clone()))?;

                if let Some(key) = placeholder.group_key() {
                    if placeholders.iter().any(|p| p.group_key() == Some(key)) {
                        return Err(ConfigError::DuplicateGroup(placeholder.name()));
                    }
                }

                source.push_str(placeholder.sub_pattern());
                placeholders.push(placeholder);
            }
            _ => source.push(ch),
        }
    }

    Ok((source, placeholders))
}
