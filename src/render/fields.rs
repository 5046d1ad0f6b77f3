//! The closed set of template fields and the values they resolve to.

use std::fmt;

/// A template field the renderer knows about. Anything else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Date,
    Description,
    /// The title. Receives sanitization and truncation before formatting.
    Name,
    Site,
    FullSite,
    Parent,
    FullParent,
    Network,
    FullNetwork,
    Performers,
    AllPerformers,
    PerformerSites,
    AllPerformerSites,
    Act,
    Ext,
    Trans,
    SourceFileName,
    SourceFileStem,
    Uuid,
    Id,
    Vr,
    Type,
    Year,
    Resolution,
    VideoCodec,
    AudioCodec,
    ExternalId,
    Fps,
}

impl Field {
    pub const ALL: [Field; 28] = [
        Field::Date,
        Field::Description,
        Field::Name,
        Field::Site,
        Field::FullSite,
        Field::Parent,
        Field::FullParent,
        Field::Network,
        Field::FullNetwork,
        Field::Performers,
        Field::AllPerformers,
        Field::PerformerSites,
        Field::AllPerformerSites,
        Field::Act,
        Field::Ext,
        Field::Trans,
        Field::SourceFileName,
        Field::SourceFileStem,
        Field::Uuid,
        Field::Id,
        Field::Vr,
        Field::Type,
        Field::Year,
        Field::Resolution,
        Field::VideoCodec,
        Field::AudioCodec,
        Field::ExternalId,
        Field::Fps,
    ];

    /// Look a field up by its template name. `title` and `extension` are
    /// accepted as aliases of `name` and `ext`.
    pub fn from_name(name: &str) -> Option<Field> {
        match name {
            "title" => return Some(Field::Name),
            "extension" => return Some(Field::Ext),
            _ => {}
        }
        Field::ALL.into_iter().find(|field| field.as_str() == name)
    }

    /// Canonical template name.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Description => "description",
            Field::Name => "name",
            Field::Site => "site",
            Field::FullSite => "full_site",
            Field::Parent => "parent",
            Field::FullParent => "full_parent",
            Field::Network => "network",
            Field::FullNetwork => "full_network",
            Field::Performers => "performers",
            Field::AllPerformers => "all_performers",
            Field::PerformerSites => "performer-sites",
            Field::AllPerformerSites => "all_performer-sites",
            Field::Act => "act",
            Field::Ext => "ext",
            Field::Trans => "trans",
            Field::SourceFileName => "source_file_name",
            Field::SourceFileStem => "source_file_stem",
            Field::Uuid => "uuid",
            Field::Id => "_id",
            Field::Vr => "vr",
            Field::Type => "type",
            Field::Year => "year",
            Field::Resolution => "resolution",
            Field::VideoCodec => "video_codec",
            Field::AudioCodec => "audio_codec",
            Field::ExternalId => "external_id",
            Field::Fps => "fps",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Flag(bool),
    List(Vec<String>),
}

impl Value {
    /// Empty text, `false`, and empty lists count as absent.
    pub fn is_absent(&self) -> bool {
        match self {
            Value::Text(s) => s.is_empty(),
            Value::Flag(b) => !b,
            Value::List(items) => items.is_empty(),
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Flag(_) => "flag",
            Value::List(_) => "list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Flag(true) => f.write_str("True"),
            Value::Flag(false) => f.write_str("False"),
            Value::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Flag(b)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}
