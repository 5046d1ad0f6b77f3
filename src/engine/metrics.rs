//! Cascade run metrics.
//!
//! Small structs used to observe a cascade run:
//!
//! - `Cascade::run` for normal operation.
//! - `Cascade::run_with_metrics` when the caller wants per-stage timings and
//!   to see which stages produced fields.
//!
//! Stages that never ran (because an earlier stage short-circuited, or because
//! the catalog stage already found a code) have no [`StageMetrics`] entry.

use crate::ExtractedRecord;
use std::time::{Duration, Instant};

/// Cascade stages in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Extension,
    DatabaseIdTag,
    CatalogCode,
    SceneId,
    TokenPattern,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Extension => "extension",
            Stage::DatabaseIdTag => "database-id-tag",
            Stage::CatalogCode => "catalog-code",
            Stage::SceneId => "scene-id",
            Stage::TokenPattern => "token-pattern",
        }
    }

    fn bit(self) -> StageSet {
        match self {
            Stage::Extension => StageSet::EXTENSION,
            Stage::DatabaseIdTag => StageSet::DATABASE_ID_TAG,
            Stage::CatalogCode => StageSet::CATALOG_CODE,
            Stage::SceneId => StageSet::SCENE_ID,
            Stage::TokenPattern => StageSet::TOKEN_PATTERN,
        }
    }
}

bitflags::bitflags! {
    /// Which stages produced a result during one run.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StageSet: u8 {
        const EXTENSION       = 1 << 0;
        const DATABASE_ID_TAG = 1 << 1;
        const CATALOG_CODE    = 1 << 2;
        const SCENE_ID        = 1 << 3;
        const TOKEN_PATTERN   = 1 << 4;
    }
}

impl Default for StageSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// Timing for a single stage.
#[derive(Debug, Clone)]
pub struct StageMetrics {
    pub stage: Stage,
    pub duration: Duration,
    /// Whether the stage produced a result.
    pub matched: bool,
}

#[derive(Debug, Default, Clone)]
pub struct CascadeMetrics {
    /// Total elapsed time for `Cascade::run_with_metrics`.
    pub total: Duration,
    /// Stages that ran, in execution order.
    pub stages: Vec<StageMetrics>,
    pub matched: StageSet,
}

impl CascadeMetrics {
    /// Run one stage, recording its duration and whether it matched.
    pub(crate) fn timed<T>(&mut self, stage: Stage, f: impl FnOnce() -> Option<T>) -> Option<T> {
        let started = Instant::now();
        let out = f();
        let matched = out.is_some();
        self.stages.push(StageMetrics { stage, duration: started.elapsed(), matched });
        if matched {
            self.matched |= stage.bit();
        }
        out
    }

    pub fn ran(&self, stage: Stage) -> bool {
        self.stages.iter().any(|s| s.stage == stage)
    }
}

/// Cascade output bundled with timing information.
#[derive(Debug, Clone)]
pub struct CascadeRun {
    pub record: ExtractedRecord,
    /// Input after abbreviation expansion, when the generic stage ran.
    pub expanded: Option<String>,
    pub metrics: CascadeMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timed_records_match_state() {
        let mut metrics = CascadeMetrics::default();
        assert_eq!(metrics.timed(Stage::CatalogCode, || Some(1)), Some(1));
        assert_eq!(metrics.timed(Stage::SceneId, || None::<u8>), None);

        assert_eq!(metrics.stages.len(), 2);
        assert!(metrics.stages[0].matched);
        assert!(!metrics.stages[1].matched);
        assert_eq!(metrics.matched, StageSet::CATALOG_CODE);
        assert!(metrics.ran(Stage::SceneId));
        assert!(!metrics.ran(Stage::TokenPattern));
    }
}
