//! Configuration types for the analysis pipeline.

use serde::{Deserialize, Serialize};

/// What to do with a predecessor name that matches no task in the catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedPolicy {
    /// Record a warning on the dependency graph and drop the edge.
    #[default]
    Warn,
    /// Abort the analysis with `AnalysisError::UnresolvedDependency`.
    Error,
}

/// How to pick a predecessor when several tasks share the referenced name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityPolicy {
    /// The earliest catalog entry carrying the name.
    #[default]
    FirstInCatalog,
    /// A candidate in the dependent's own phase path, else the earliest catalog entry.
    PreferSamePhase,
}

/// Configuration for a single analysis run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Unresolved predecessor names: warn and drop, or fail.
    pub unresolved_policy: UnresolvedPolicy,
    /// Tie-break for predecessor names shared by several tasks.
    pub ambiguity_policy: AmbiguityPolicy,
    /// Total reserve magnitudes at or below this are treated as zero.
    pub critical_tolerance: f64,
    /// Verbosity level: 0=silent, 1=summary, 2=steps, 3=debug.
    pub verbosity: u8,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            unresolved_policy: UnresolvedPolicy::Warn,
            ambiguity_policy: AmbiguityPolicy::FirstInCatalog,
            critical_tolerance: 1e-9,
            verbosity: 0,
        }
    }
}

impl AnalysisConfig {
    /// Config that fails on unresolved references instead of warning.
    pub fn strict() -> Self {
        Self {
            unresolved_policy: UnresolvedPolicy::Error,
            ..Self::default()
        }
    }

    /// Whether a total reserve counts as zero under this config.
    #[inline]
    pub fn is_zero_reserve(&self, reserve: f64) -> bool {
        reserve.abs() <= self.critical_tolerance
    }
}
