//! Filename extraction engine.
//!
//! The engine turns one filename into an [`ExtractedRecord`](crate::ExtractedRecord).
//! It is split into focused submodules under `src/engine/`.
//!
//! ## How the parts work together
//!
//! ```text
//! name template ──┐
//!                 │  TokenPattern::compile          (token_pattern.rs)
//!                 └──────────────┬─────────────      once per ParserConfig
//!                                │
//! filename ── Cascade::run ──────┤                  (cascade.rs)
//!               - extension      │
//!               - database-id tag (terminal)
//!               - catalog code / scene id (first success)
//!               - abbreviation expansion + token pattern
//!                                │
//!                                v
//!                         ExtractedRecord (+ CascadeMetrics, metrics.rs)
//! ```
//!
//! The matchers themselves (tag, catalog code, scene id), the title cleaner,
//! and the abbreviation table live under `src/rules/`.
//!
//! ## Responsibilities by module
//!
//! - `token_pattern.rs`: expands a placeholder template into one composite
//!   pattern with named groups, and reads its captures.
//! - `cascade.rs`: orders the stages, applies short-circuit rules, and fills
//!   the record.
//! - `metrics.rs`: optional per-stage timing/debug data.
//!
//! ## Adding a stage
//!
//! Add a typed matcher under `src/rules/matchers.rs` returning `Option<_>`,
//! a [`Stage`] variant plus its `StageSet` bit, and call it through
//! `CascadeMetrics::timed` at the right priority in `Cascade::run_with_metrics`.

#[path = "engine/cascade.rs"]
mod cascade;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/token_pattern.rs"]
mod token_pattern;

pub use cascade::Cascade;
pub use metrics::{CascadeMetrics, CascadeRun, Stage, StageMetrics, StageSet};
pub use token_pattern::{DEFAULT_NAME_TEMPLATE, Placeholder, TokenCaptures, TokenPattern};
