//! Error types for the analysis pipeline.

use thiserror::Error;

/// Errors that can abort an analysis run.
///
/// A run that returns any of these produces no schedule at all.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// The project definition cannot be turned into a task catalog.
    #[error("Malformed input at {context}: {reason}")]
    MalformedInput { context: String, reason: String },

    /// A predecessor name matches no task (strict mode only).
    #[error("Task {task} depends on unknown task name {reference:?}")]
    UnresolvedDependency { task: String, reference: String },

    /// The dependency graph is not acyclic.
    #[error("Circular dependency detected: {}", .cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    /// A stage was run without the output of its prerequisite stage.
    #[error("Pipeline stage {stage} run out of order: {detail}")]
    PrecedenceViolation { stage: &'static str, detail: String },
}

impl AnalysisError {
    pub(crate) fn malformed(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            context: context.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn out_of_order(stage: &'static str, detail: impl Into<String>) -> Self {
        Self::PrecedenceViolation {
            stage,
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_lists_tasks() {
        let err = AnalysisError::CyclicDependency {
            cycle: vec!["Dev/A".to_string(), "Dev/B".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Circular dependency detected: Dev/A -> Dev/B"
        );
    }

    #[test]
    fn test_malformed_message() {
        let err = AnalysisError::malformed("Dev/Build", "duration is negative");
        assert_eq!(
            err.to_string(),
            "Malformed input at Dev/Build: duration is negative"
        );
    }
}
