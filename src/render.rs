//! Template renderer.
//!
//! Expands a template such as `{site} - {date} - {name:|split|first}.{ext}`
//! against a [`RenderContext`]. Independent of the extraction engine: the
//! usual flow builds the context from an [`ExtractedRecord`](crate::ExtractedRecord),
//! optionally merges lookup results, then renders.
//!
//! ```text
//! template ── CompiledTemplate::parse ──┐          (template.rs)
//!                                       │  allow-list check (fields.rs)
//! RenderContext ──── render ────────────┤          (context.rs)
//!                   - missing marker    │
//!                   - title sanitize    │
//!                   - format spec ──────┴── decorations / filters / std spec
//!                                            (format_spec.rs, filters.rs)
//! ```

#[path = "render/context.rs"]
mod context;
#[path = "render/fields.rs"]
mod fields;
#[path = "render/filters.rs"]
mod filters;
#[path = "render/format_spec.rs"]
mod format_spec;
#[path = "render/template.rs"]
mod template;

pub use context::{EnrichmentData, MetadataLookup, Performer, RenderContext};
pub use fields::{Field, Value};
pub use template::CompiledTemplate;
