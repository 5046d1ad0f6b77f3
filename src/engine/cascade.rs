//! The extraction cascade.
//!
//! A fixed-priority chain of typed matchers over one filename:
//!
//! ```text
//! (0) extension          -> path suffix, lowercased        (always, authoritative)
//! (1) database-id tag    -> [porndbid=N]                   (terminal fast path)
//! (2) catalog code       -> ABC-123                        ─┐ first success
//! (3) scene id           -> did-1234                       ─┘ wins
//! (4) token pattern      -> site / date / trans / title    (always, unless (1) hit)
//! ```
//!
//! No stage fails. A stage that does not match leaves its fields at their
//! defaults and the chain moves on.

use super::metrics::{CascadeMetrics, CascadeRun, Stage};
use crate::config::ParserConfig;
use crate::record::ExtractedRecord;
use crate::rules::{clean_name, matchers};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Fields filled by the generic token stage.
#[derive(Debug, Default)]
struct TokenFields {
    site: Option<String>,
    date: Option<String>,
    trans: bool,
    title: Option<String>,
}

/// Runs the cascade with one compiled configuration.
///
/// Cheap to construct; holds only a shared reference.
#[derive(Debug, Clone, Copy)]
pub struct Cascade<'a> {
    config: &'a ParserConfig,
}

impl<'a> Cascade<'a> {
    pub fn new(config: &'a ParserConfig) -> Self {
        Self { config }
    }

    /// Parse `filename` into a record.
    pub fn run(&self, filename: &str) -> ExtractedRecord {
        self.run_with_metrics(filename).record
    }

    /// Parse `filename`, keeping per-stage timings.
    pub fn run_with_metrics(&self, filename: &str) -> CascadeRun {
        let started = Instant::now();
        let mut metrics = CascadeMetrics::default();
        let path = Path::new(filename);

        let extension = metrics.timed(Stage::Extension, || Some(path_extension(path))).unwrap_or_default();
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
        let mut record = ExtractedRecord::new(filename, extension);

        if let Some(id) = metrics.timed(Stage::DatabaseIdTag, || matchers::database_id_tag(stem)) {
            info!(database_id = id, "found database id tag");
            record.database_id = Some(id);
            metrics.total = started.elapsed();
            return CascadeRun { record, expanded: None, metrics };
        }

        let policy = &self.config.code_policy;
        record.external_code = metrics
            .timed(Stage::CatalogCode, || matchers::catalog_code(stem, policy))
            .or_else(|| metrics.timed(Stage::SceneId, || matchers::scene_id(stem)));

        if let Some(code) = &record.external_code {
            info!(code = code.code(), kind = ?code.kind(), "found external code");
        }

        let expanded = self.config.abbreviations.expand(filename);
        match metrics.timed(Stage::TokenPattern, || self.token_fields(&expanded)) {
            Some(fields) => {
                record.site = fields.site;
                record.date = fields.date;
                record.trans = fields.trans;
                record.title = fields.title;
            }
            None => debug!(filename, "could not parse site/date/title from filename"),
        }

        metrics.total = started.elapsed();
        CascadeRun { record, expanded: Some(expanded.into_owned()), metrics }
    }

    fn token_fields(&self, text: &str) -> Option<TokenFields> {
        let caps = self.config.token_pattern.captures(text)?;

        let date = match (caps.year, caps.month, caps.day) {
            (Some(year), Some(month), Some(day)) => Some(matchers::normalize_date(year, month, day)),
            _ => None,
        };
        // A title the cleaner empties stays `Some("")`.
        let title = caps.name.map(|raw| clean_name(raw, &self.config.cleanup));

        Some(TokenFields {
            site: caps.site.map(str::to_string),
            date,
            trans: caps.trans.is_some_and(matchers::is_trans_marker),
            title,
        })
    }
}

/// Lowercased suffix of the last path segment, without the dot.
fn path_extension(path: &Path) -> String {
    path.extension().and_then(|ext| ext.to_str()).map(str::to_lowercase).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_comes_from_the_last_segment() {
        assert_eq!(path_extension(Path::new("/media/in/Site.Title.MP4")), "mp4");
        assert_eq!(path_extension(Path::new("archive.tar.GZ")), "gz");
        assert_eq!(path_extension(Path::new("no_suffix")), "");
        assert_eq!(path_extension(Path::new(".hidden")), "");
    }
}
