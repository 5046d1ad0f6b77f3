use crate::config::{ParserConfig, ParserSettings, RenderOptions};
use crate::engine::{Cascade, StageMetrics, StageSet};
use crate::error::RenderError;
use crate::record::ExtractedRecord;
use crate::render::{CompiledTemplate, RenderContext};
use once_cell::sync::Lazy;
use std::time::Duration;

static DEFAULT_CONFIG: Lazy<ParserConfig> =
    Lazy::new(|| ParserSettings::default().compile().expect("built-in parser settings compile"));

/// The compiled built-in configuration.
pub fn default_config() -> &'static ParserConfig {
    &DEFAULT_CONFIG
}

/// Additional details returned by [`parse_verbose_with`].
///
/// Meant for debugging and performance inspection; the plain [`parse_with`]
/// path does not keep these.
#[derive(Debug, Clone)]
pub struct ParseDetails {
    /// Total elapsed time.
    pub total: Duration,
    /// Stages that ran, in execution order.
    pub stages: Vec<StageMetrics>,
    /// Stages that produced a result.
    pub matched: StageSet,
    /// Input after abbreviation expansion. `None` when the database-id tag
    /// short-circuited before the token stage.
    pub expanded: Option<String>,
}

/// Result from [`parse_verbose_with`].
#[derive(Debug, Clone)]
pub struct ParseResultVerbose {
    pub record: ExtractedRecord,
    pub details: ParseDetails,
}

/// Parse `filename` with the built-in configuration.
///
/// # Example
/// ```
/// use scene_namer::parse;
///
/// let record = parse("EvilAngel - 2022-01-03 - Carmela Clutch Fabulous Anal 3-Way!.mp4");
/// assert_eq!(record.site.as_deref(), Some("EvilAngel"));
/// assert_eq!(record.date.as_deref(), Some("2022-01-03"));
/// assert_eq!(record.extension, "mp4");
/// ```
pub fn parse(filename: &str) -> ExtractedRecord {
    parse_with(filename, default_config())
}

/// Parse `filename` with a caller-supplied configuration.
///
/// Never fails: anything that cannot be extracted is left at its default.
pub fn parse_with(filename: &str, config: &ParserConfig) -> ExtractedRecord {
    Cascade::new(config).run(filename)
}

/// Parse `filename` and return per-stage debug details alongside the record.
pub fn parse_verbose_with(filename: &str, config: &ParserConfig) -> ParseResultVerbose {
    let run = Cascade::new(config).run_with_metrics(filename);

    let details = ParseDetails {
        total: run.metrics.total,
        stages: run.metrics.stages,
        matched: run.metrics.matched,
        expanded: run.expanded,
    };

    ParseResultVerbose { record: run.record, details }
}

/// Render `template` against `ctx` with the default markers and title length.
pub fn render(template: &str, ctx: &RenderContext) -> Result<String, RenderError> {
    render_with(template, ctx, &RenderOptions::default())
}

/// Render `template` against `ctx` with explicit options.
///
/// Parses the template on every call; hold a [`CompiledTemplate`] to render
/// many contexts with one template.
pub fn render_with(template: &str, ctx: &RenderContext, options: &RenderOptions) -> Result<String, RenderError> {
    CompiledTemplate::parse(template)?.render(ctx, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Stage;
    use crate::record::CodeKind;
    use crate::render::Field;

    #[test]
    fn parse_fills_generic_fields() {
        let record = parse("BrandNew.23.01.15.Some.Title.XXX.1080p.mp4");

        assert_eq!(record.site.as_deref(), Some("BrandNew"));
        assert_eq!(record.date.as_deref(), Some("2023-01-15"));
        assert_eq!(record.extension, "mp4");
        assert_eq!(record.source_file_name, "BrandNew.23.01.15.Some.Title.XXX.1080p.mp4");
        assert!(!record.trans);
        assert!(record.database_id.is_none());
    }

    #[test]
    fn parse_verbose_includes_stage_trace() {
        let res = parse_verbose_with("Site.22.03.04.Title.ABC-123.mp4", default_config());

        assert_eq!(res.record.code_kind(), CodeKind::CatalogCode);
        assert!(res.details.matched.contains(StageSet::CATALOG_CODE | StageSet::TOKEN_PATTERN));
        assert!(!res.details.stages.iter().any(|s| s.stage == Stage::SceneId));
        assert!(res.details.stages.iter().all(|s| s.duration <= res.details.total));
        assert_eq!(res.details.expanded.as_deref(), Some("Site.22.03.04.Title.ABC-123.mp4"));
    }

    #[test]
    fn parse_verbose_tag_fast_path_skips_token_stage() {
        let res = parse_verbose_with("Whatever [theporndbid=777].mkv", default_config());

        assert_eq!(res.record.database_id, Some(777));
        assert_eq!(res.details.expanded, None);
        assert!(!res.details.matched.contains(StageSet::TOKEN_PATTERN));
        assert_eq!(res.details.stages.last().map(|s| s.stage), Some(Stage::DatabaseIdTag));
    }

    #[test]
    fn render_from_parsed_record() {
        let record = parse("BrandNew.23.01.15.Some.Title.mp4");
        let ctx = RenderContext::from_record(&record);

        let out = render("{site} - {date} - {name} [{performers}].{ext}", &ctx).unwrap();
        assert_eq!(out, "BrandNew - 2023-01-15 - Some Title [~~].mp4");
    }

    #[test]
    fn render_with_custom_markers() {
        let ctx = RenderContext::new().with(Field::Site, "S");
        let options = RenderOptions { missing_marker: "?".into(), bad_format_marker: "#".into(), max_title_length: 10 };

        assert_eq!(render_with("{site}{network}{site:d}", &ctx, &options).unwrap(), "S?#");
        assert!(render("{bogus}", &ctx).is_err());
    }
}
