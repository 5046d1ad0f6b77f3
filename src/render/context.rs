//! Render contexts: the resolved field -> value table a template renders against.
//!
//! A context is normally built from an [`ExtractedRecord`] and then overlaid
//! with whatever an external metadata lookup returned. The lookup itself is
//! opaque here; [`MetadataLookup`] is the seam.

use super::fields::{Field, Value};
use crate::record::ExtractedRecord;
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Field values available to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    values: HashMap<Field, Value>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `field`, replacing any earlier value.
    pub fn insert(&mut self, field: Field, value: impl Into<Value>) {
        self.values.insert(field, value.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, field: Field, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn get(&self, field: Field) -> Option<&Value> {
        self.values.get(&field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Seed a context from what the filename alone told us.
    pub fn from_record(record: &ExtractedRecord) -> Self {
        let mut ctx = Self::new();
        ctx.set_opt(Field::Site, record.site.clone());
        ctx.set_opt(Field::Date, record.date.clone());
        ctx.set_opt(Field::Year, record.date.as_deref().and_then(year_of));
        ctx.set_opt(Field::Name, record.title.clone());
        ctx.insert(Field::Ext, record.extension.clone());
        ctx.insert(Field::Trans, record.trans);
        ctx.insert(Field::SourceFileName, record.source_file_name.clone());
        ctx.set_opt(
            Field::SourceFileStem,
            Path::new(&record.source_file_name).file_stem().and_then(|s| s.to_str()).map(str::to_string),
        );
        ctx.set_opt(Field::ExternalId, record.external_code_str().map(str::to_string));
        ctx.set_opt(Field::Id, record.database_id.map(|id| id.to_string()));
        ctx
    }

    /// Build the full context for `record`, consulting `lookup` for enrichment.
    pub fn resolve(record: &ExtractedRecord, lookup: &impl MetadataLookup) -> Self {
        let mut ctx = Self::from_record(record);
        if let Some(data) = lookup.lookup(record) {
            ctx.merge(data);
        }
        ctx
    }

    /// Overlay enrichment data. Present values win over what is already set.
    pub fn merge(&mut self, data: EnrichmentData) {
        if let Some(date) = data.date {
            self.set_opt(Field::Year, year_of(&date));
            self.insert(Field::Date, date);
        }
        self.set_compact_pair(Field::Site, Field::FullSite, data.site);
        self.set_compact_pair(Field::Parent, Field::FullParent, data.parent);
        self.set_compact_pair(Field::Network, Field::FullNetwork, data.network);

        if !data.performers.is_empty() {
            let featured: Vec<String> = data
                .performers
                .iter()
                .filter(|p| p.role.as_deref().is_none_or(|role| role.eq_ignore_ascii_case("female")))
                .map(|p| p.name.clone())
                .collect();
            self.insert(Field::Performers, featured);
            self.insert(Field::AllPerformers, data.performers.into_iter().map(|p| p.name).collect::<Vec<_>>());
        }

        self.set_opt(Field::Id, data.id);
        self.set_opt(Field::Uuid, data.uuid);
        self.set_opt(Field::Name, data.name);
        self.set_opt(Field::Description, data.description);
        self.set_opt(Field::Type, data.scene_type);
        self.set_opt(Field::Resolution, data.resolution);
        self.set_opt(Field::VideoCodec, data.video_codec);
        self.set_opt(Field::AudioCodec, data.audio_codec);
        self.set_opt(Field::Fps, data.fps);
        self.set_opt(Field::Act, data.act);
        if let Some(vr) = data.vr {
            self.insert(Field::Vr, vr);
        }
    }

    fn set_opt(&mut self, field: Field, value: Option<String>) {
        if let Some(value) = value {
            self.insert(field, value);
        }
    }

    /// `compact` gets the value with spaces removed, `full` keeps it as is.
    fn set_compact_pair(&mut self, compact: Field, full: Field, value: Option<String>) {
        if let Some(value) = value {
            self.insert(compact, value.replace(' ', ""));
            self.insert(full, value);
        }
    }
}

fn year_of(date: &str) -> Option<String> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok().map(|d| d.year().to_string())
}

/// One credited performer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Performer {
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// What an external metadata lookup knows about a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EnrichmentData {
    #[serde(alias = "_id")]
    pub id: Option<String>,
    pub uuid: Option<String>,
    #[serde(alias = "title")]
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub site: Option<String>,
    pub parent: Option<String>,
    pub network: Option<String>,
    pub performers: Vec<Performer>,
    #[serde(rename = "type")]
    pub scene_type: Option<String>,
    pub resolution: Option<String>,
    pub video_codec: Option<String>,
    pub audio_codec: Option<String>,
    pub fps: Option<String>,
    /// Rendered verbatim (for example `"vr"`) when present.
    pub vr: Option<String>,
    pub act: Option<String>,
}

/// Boundary to whatever resolves a record against a metadata database.
pub trait MetadataLookup {
    fn lookup(&self, record: &ExtractedRecord) -> Option<EnrichmentData>;
}

impl<F> MetadataLookup for F
where
    F: Fn(&ExtractedRecord) -> Option<EnrichmentData>,
{
    fn lookup(&self, record: &ExtractedRecord) -> Option<EnrichmentData> {
        self(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ExternalCode;

    fn record() -> ExtractedRecord {
        ExtractedRecord {
            site: Some("BrandNew".into()),
            date: Some("2023-01-15".into()),
            trans: false,
            title: Some("Some Title".into()),
            extension: "mp4".into(),
            source_file_name: "/in/BrandNew.23.01.15.Some.Title.mp4".into(),
            external_code: Some(ExternalCode::catalog("abc-123")),
            database_id: None,
        }
    }

    #[test]
    fn record_fields_map_to_template_fields() {
        let ctx = RenderContext::from_record(&record());

        assert_eq!(ctx.get(Field::Site), Some(&Value::from("BrandNew")));
        assert_eq!(ctx.get(Field::Year), Some(&Value::from("2023")));
        assert_eq!(ctx.get(Field::Name), Some(&Value::from("Some Title")));
        assert_eq!(ctx.get(Field::Ext), Some(&Value::from("mp4")));
        assert_eq!(ctx.get(Field::Trans), Some(&Value::Flag(false)));
        assert_eq!(ctx.get(Field::SourceFileStem), Some(&Value::from("BrandNew.23.01.15.Some.Title")));
        assert_eq!(ctx.get(Field::ExternalId), Some(&Value::from("ABC-123")));
        assert_eq!(ctx.get(Field::Id), None);
        assert_eq!(ctx.get(Field::Performers), None);
    }

    #[test]
    fn enrichment_overrides_and_splits_compact_names() {
        let mut ctx = RenderContext::from_record(&record());
        ctx.merge(EnrichmentData {
            site: Some("Brand New".into()),
            name: Some("Real Title".into()),
            date: Some("2021-07-04".into()),
            performers: vec![
                Performer { name: "Ann".into(), role: Some("Female".into()) },
                Performer { name: "Bob".into(), role: Some("Male".into()) },
                Performer { name: "Cy".into(), role: None },
            ],
            ..EnrichmentData::default()
        });

        assert_eq!(ctx.get(Field::Site), Some(&Value::from("BrandNew")));
        assert_eq!(ctx.get(Field::FullSite), Some(&Value::from("Brand New")));
        assert_eq!(ctx.get(Field::Name), Some(&Value::from("Real Title")));
        assert_eq!(ctx.get(Field::Year), Some(&Value::from("2021")));
        assert_eq!(ctx.get(Field::Performers), Some(&Value::List(vec!["Ann".into(), "Cy".into()])));
        assert_eq!(ctx.get(Field::AllPerformers), Some(&Value::List(vec!["Ann".into(), "Bob".into(), "Cy".into()])));
        assert_eq!(ctx.get(Field::Ext), Some(&Value::from("mp4")));
    }

    #[test]
    fn resolve_consults_the_lookup() {
        let lookup = |r: &ExtractedRecord| {
            r.external_code.as_ref().map(|_| EnrichmentData { uuid: Some("scenes/42".into()), ..Default::default() })
        };
        let ctx = RenderContext::resolve(&record(), &lookup);
        assert_eq!(ctx.get(Field::Uuid), Some(&Value::from("scenes/42")));

        let miss = |_: &ExtractedRecord| -> Option<EnrichmentData> { None };
        let ctx = RenderContext::resolve(&record(), &miss);
        assert_eq!(ctx.get(Field::Uuid), None);
    }

    #[test]
    fn enrichment_decodes_from_json() {
        let data: EnrichmentData = serde_json::from_str(
            r#"{
                "_id": "abc",
                "title": "From Json",
                "type": "Scene",
                "performers": [{"name": "Ann", "role": "Female"}, {"name": "Dee"}]
            }"#,
        )
        .unwrap();

        assert_eq!(data.id.as_deref(), Some("abc"));
        assert_eq!(data.name.as_deref(), Some("From Json"));
        assert_eq!(data.scene_type.as_deref(), Some("Scene"));
        assert_eq!(data.performers[1].role, None);
    }

    #[test]
    fn bad_dates_yield_no_year() {
        assert_eq!(year_of("2023-13-40"), None);
        assert_eq!(year_of("1999-02-03"), Some("1999".into()));
    }
}
