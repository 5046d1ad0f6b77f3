//! Extract structured scene metadata from media filenames and render
//! canonical output names from templates.
//!
//! Two independent halves:
//!
//! - the extraction cascade ([`parse`], [`parse_with`], [`Cascade`]) turns a
//!   filename into an [`ExtractedRecord`];
//! - the template renderer ([`render`], [`CompiledTemplate`]) expands a name
//!   template against a [`RenderContext`].
//!
//! Both are configured through one [`ParserSettings`] value compiled into a
//! read-only [`ParserConfig`].

extern crate self as scene_namer;

#[macro_use]
mod macros;
mod api;
mod config;
mod engine;
mod error;
mod record;
mod render;
mod rules;

pub use api::{ParseDetails, ParseResultVerbose, default_config, parse, parse_verbose_with, parse_with, render, render_with};
pub use config::{AbbreviationEntry, CodePolicy, ParserConfig, ParserSettings, RenderOptions};
pub use engine::{
    Cascade, CascadeMetrics, CascadeRun, DEFAULT_NAME_TEMPLATE, Placeholder, Stage, StageMetrics, StageSet, TokenCaptures,
    TokenPattern,
};
pub use error::{ConfigError, FormatError, RenderError};
pub use record::{CodeKind, ExternalCode, ExtractedRecord};
pub use render::{CompiledTemplate, EnrichmentData, Field, MetadataLookup, Performer, RenderContext, Value};
pub use rules::{Abbreviation, AbbreviationTable, clean_name};
