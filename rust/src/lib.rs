//! Critical Path Method analysis for hierarchical project plans.
//!
//! Tasks are grouped in phases and subphases and reference their
//! predecessors by display name. The engine flattens them into a catalog,
//! resolves names to IDs once, orders the graph topologically, runs forward
//! and backward passes, and derives reserves and the critical path.

pub mod analysis;
pub mod backward_pass;
pub mod catalog;
mod config;
mod error;
pub mod forward_pass;
mod interner;
pub mod logging;
mod models;
pub mod pipeline;
#[cfg(feature = "python")]
mod python;
pub mod resolver;
pub mod sequencer;

pub use analysis::{analyze, ScheduleAnalysis, TaskSchedule};
pub use backward_pass::{backward_pass, BackwardPass, LateTimes};
pub use catalog::{build_catalog, Catalog};
pub use config::{AmbiguityPolicy, AnalysisConfig, UnresolvedPolicy};
pub use error::AnalysisError;
pub use forward_pass::{forward_pass, EarlyTimes, ForwardPass};
pub use interner::TaskId;
pub use models::{
    DurationValue, PhaseDefinition, ProjectDefinition, ProjectStructure, SubphaseDefinition, Task,
    TaskDefinition,
};
pub use pipeline::Pipeline;
pub use resolver::{resolve_dependencies, DependencyGraph, ResolutionWarning};
pub use sequencer::{sequence, TopologicalOrder};

/// Run the full analysis on a project definition.
///
/// All-or-nothing: any error aborts the run and no partial schedule is
/// returned. Unresolved predecessor names are reported in
/// `ScheduleAnalysis::warnings` unless the config makes them fatal.
///
/// # Errors
/// * `MalformedInput` for empty names or unusable durations
/// * `UnresolvedDependency` for unknown predecessor names in strict mode
/// * `CyclicDependency` if the dependency graph has a cycle
pub fn analyze_project(
    project: &ProjectDefinition,
    config: &AnalysisConfig,
) -> Result<ScheduleAnalysis, AnalysisError> {
    let catalog = build_catalog(project)?;
    crate::log_summary!(
        config.verbosity,
        "[catalog] {}: {} tasks",
        catalog.project_name,
        catalog.len()
    );

    Pipeline::new(&catalog, config)?
        .sequence()?
        .forward()?
        .backward()?
        .analyze()
}
