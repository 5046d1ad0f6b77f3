//! The structured record produced by the extraction cascade.

use serde::Serialize;
use std::fmt;

/// Which identifier convention an [`ExternalCode`] follows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeKind {
    #[default]
    None,
    /// Letters, a dash, digits (`ABC-123`). Stored uppercase.
    CatalogCode,
    /// `did`/`milf` prefixed scene identifiers. Stored lowercase.
    SceneId,
}

/// An external identifier found in a filename, always paired with its kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ExternalCode {
    code: String,
    kind: CodeKind,
}

impl ExternalCode {
    pub(crate) fn catalog(raw: &str) -> Self {
        Self { code: raw.to_uppercase(), kind: CodeKind::CatalogCode }
    }

    pub(crate) fn scene(raw: &str) -> Self {
        Self { code: raw.to_lowercase(), kind: CodeKind::SceneId }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn kind(&self) -> CodeKind {
        self.kind
    }
}

/// Identity metadata extracted from one filename.
///
/// Built fresh by every parse call. When `database_id` is set, the tag fast
/// path ran and no other extracted field is populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedRecord {
    pub site: Option<String>,
    /// Normalized `YYYY-MM-DD`.
    pub date: Option<String>,
    pub trans: bool,
    pub title: Option<String>,
    /// Lowercased path suffix without the dot. Never taken from a regex group.
    pub extension: String,
    /// The input exactly as given.
    pub source_file_name: String,
    pub external_code: Option<ExternalCode>,
    pub database_id: Option<u64>,
}

impl ExtractedRecord {
    pub(crate) fn new(source_file_name: &str, extension: String) -> Self {
        Self { source_file_name: source_file_name.to_string(), extension, ..Self::default() }
    }

    pub fn code_kind(&self) -> CodeKind {
        self.external_code.as_ref().map_or(CodeKind::None, ExternalCode::kind)
    }

    pub fn external_code_str(&self) -> Option<&str> {
        self.external_code.as_ref().map(ExternalCode::code)
    }
}

impl fmt::Display for ExtractedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn opt(v: Option<&str>) -> &str {
            v.unwrap_or("-")
        }

        writeln!(f, "site: {}", opt(self.site.as_deref()))?;
        writeln!(f, "date: {}", opt(self.date.as_deref()))?;
        writeln!(f, "trans: {}", self.trans)?;
        writeln!(f, "title: {}", opt(self.title.as_deref()))?;
        writeln!(f, "extension: {}", self.extension)?;
        writeln!(f, "source file name: {}", self.source_file_name)?;
        writeln!(f, "external code: {} ({:?})", opt(self.external_code_str()), self.code_kind())?;
        match self.database_id {
            Some(id) => write!(f, "database id: {id}"),
            None => write!(f, "database id: -"),
        }
    }
}
