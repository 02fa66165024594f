//! Forward pass: earliest start and finish times.

use crate::catalog::Catalog;
use crate::error::AnalysisError;
use crate::interner::TaskId;
use crate::log_debug;
use crate::resolver::DependencyGraph;
use crate::sequencer::TopologicalOrder;

/// Earliest times for one task.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EarlyTimes {
    pub earliest_start: f64,
    pub earliest_finish: f64,
    /// Longest predecessor chain length in edges, used for diagram layout.
    pub level: usize,
}

/// Result of the forward pass, indexed by task ID.
#[derive(Clone, Debug, PartialEq)]
pub struct ForwardPass {
    timings: Vec<EarlyTimes>,
    project_finish: f64,
}

impl ForwardPass {
    #[inline]
    pub fn get(&self, id: TaskId) -> Option<&EarlyTimes> {
        self.timings.get(id as usize)
    }

    pub fn timings(&self) -> &[EarlyTimes] {
        &self.timings
    }

    /// Max earliest finish over all tasks (0 for an empty project).
    pub fn project_finish(&self) -> f64 {
        self.project_finish
    }

    pub fn len(&self) -> usize {
        self.timings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timings.is_empty()
    }
}

/// Compute ES/EF for every task in topological order.
///
/// ES is the max EF of the task's predecessors (0 without any), EF = ES +
/// duration. Fails with `PrecedenceViolation` if the order does not cover the
/// catalog or reaches a task before one of its predecessors, and with
/// `MalformedInput` if a chain of durations sums past `f64::MAX`.
pub fn forward_pass(
    catalog: &Catalog,
    graph: &DependencyGraph,
    order: &TopologicalOrder,
    verbosity: u8,
) -> Result<ForwardPass, AnalysisError> {
    let n = catalog.len();
    if graph.task_count() != n || order.len() != n {
        return Err(AnalysisError::out_of_order(
            "forward_pass",
            format!(
                "catalog has {} tasks, graph {}, order {}",
                n,
                graph.task_count(),
                order.len()
            ),
        ));
    }

    let mut timings = vec![EarlyTimes::default(); n];
    let mut finalized = vec![false; n];
    let mut project_finish = 0.0_f64;

    for id in order.iter() {
        let idx = id as usize;
        let duration = catalog.task(id).map(|t| t.duration).unwrap_or(0.0);

        let mut earliest_start = 0.0_f64;
        let mut level: usize = 0;
        for &pred in graph.predecessors(id) {
            if !finalized[pred as usize] {
                return Err(AnalysisError::out_of_order(
                    "forward_pass",
                    format!(
                        "{} reached before its predecessor {}",
                        catalog.key_of(id),
                        catalog.key_of(pred)
                    ),
                ));
            }
            let pred_timing = &timings[pred as usize];
            earliest_start = earliest_start.max(pred_timing.earliest_finish);
            level = level.max(pred_timing.level + 1);
        }

        let earliest_finish = earliest_start + duration;
        if !earliest_finish.is_finite() {
            return Err(AnalysisError::malformed(
                catalog.key_of(id),
                format!("earliest finish {} overflows", earliest_finish),
            ));
        }
        project_finish = project_finish.max(earliest_finish);
        timings[idx] = EarlyTimes {
            earliest_start,
            earliest_finish,
            level,
        };
        finalized[idx] = true;

        log_debug!(
            verbosity,
            "[forward] {}: ES={} EF={}",
            catalog.key_of(id),
            earliest_start,
            earliest_finish
        );
    }

    Ok(ForwardPass {
        timings,
        project_finish,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_catalog;
    use crate::config::AnalysisConfig;
    use crate::models::{PhaseDefinition, ProjectDefinition, ProjectStructure, TaskDefinition};
    use crate::resolver::resolve_dependencies;
    use crate::sequencer::sequence;

    fn run(tasks: Vec<TaskDefinition>) -> ForwardPass {
        let project = ProjectDefinition {
            name: "Test".to_string(),
            manager: String::new(),
            structure: ProjectStructure {
                phases: vec![PhaseDefinition {
                    name: "P".to_string(),
                    tasks: Some(tasks),
                    subphases: None,
                }],
            },
        };
        let catalog = build_catalog(&project).unwrap();
        let graph = resolve_dependencies(&catalog, &AnalysisConfig::default()).unwrap();
        let order = sequence(&catalog, &graph).unwrap();
        forward_pass(&catalog, &graph, &order, 0).unwrap()
    }

    #[test]
    fn test_fan_out() {
        let result = run(vec![
            TaskDefinition::new("A", 5.0, &[]),
            TaskDefinition::new("B", 3.0, &["A"]),
            TaskDefinition::new("C", 2.0, &["A"]),
        ]);

        let a = result.get(0).unwrap();
        let b = result.get(1).unwrap();
        let c = result.get(2).unwrap();
        assert_eq!((a.earliest_start, a.earliest_finish), (0.0, 5.0));
        assert_eq!((b.earliest_start, b.earliest_finish), (5.0, 8.0));
        assert_eq!((c.earliest_start, c.earliest_finish), (5.0, 7.0));
        assert_eq!(result.project_finish(), 8.0);
    }

    #[test]
    fn test_start_is_max_of_predecessors() {
        let result = run(vec![
            TaskDefinition::new("a", 2.0, &[]),
            TaskDefinition::new("b", 5.0, &[]),
            TaskDefinition::new("join", 1.0, &["a", "b"]),
        ]);
        let join = result.get(2).unwrap();
        assert_eq!(join.earliest_start, 5.0);
        assert_eq!(join.earliest_finish, 6.0);
    }

    #[test]
    fn test_fractional_durations_not_rounded() {
        let result = run(vec![
            TaskDefinition::new("a", 0.5, &[]),
            TaskDefinition::new("b", 0.25, &["a"]),
        ]);
        let b = result.get(1).unwrap();
        assert!((b.earliest_start - 0.5).abs() < 1e-12);
        assert!((b.earliest_finish - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_milestone_has_equal_start_and_finish() {
        let result = run(vec![
            TaskDefinition::new("work", 4.0, &[]),
            TaskDefinition::new("done", 0.0, &["work"]),
        ]);
        let done = result.get(1).unwrap();
        assert_eq!(done.earliest_start, done.earliest_finish);
        assert_eq!(done.earliest_start, 4.0);
    }

    #[test]
    fn test_levels() {
        let result = run(vec![
            TaskDefinition::new("a", 1.0, &[]),
            TaskDefinition::new("b", 1.0, &["a"]),
            TaskDefinition::new("c", 1.0, &["a", "b"]),
            TaskDefinition::new("d", 1.0, &[]),
        ]);
        let levels: Vec<usize> = result.timings().iter().map(|t| t.level).collect();
        assert_eq!(levels, vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_order_violating_dependencies_rejected() {
        let project = ProjectDefinition {
            name: "Test".to_string(),
            manager: String::new(),
            structure: ProjectStructure {
                phases: vec![PhaseDefinition {
                    name: "P".to_string(),
                    tasks: Some(vec![
                        TaskDefinition::new("a", 1.0, &[]),
                        TaskDefinition::new("b", 1.0, &["a"]),
                    ]),
                    subphases: None,
                }],
            },
        };
        let catalog = build_catalog(&project).unwrap();
        let graph = resolve_dependencies(&catalog, &AnalysisConfig::default()).unwrap();

        let reversed = TopologicalOrder::from_unchecked(vec![1, 0]);
        let err = forward_pass(&catalog, &graph, &reversed, 0).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::PrecedenceViolation { stage: "forward_pass", .. }
        ));

        let short = TopologicalOrder::from_unchecked(vec![0]);
        assert!(forward_pass(&catalog, &graph, &short, 0).is_err());
    }

    #[test]
    fn test_overflowing_chain_rejected() {
        let project = ProjectDefinition {
            name: "Test".to_string(),
            manager: String::new(),
            structure: ProjectStructure {
                phases: vec![PhaseDefinition {
                    name: "P".to_string(),
                    tasks: Some(vec![
                        TaskDefinition::new("a", 1e308, &[]),
                        TaskDefinition::new("b", 1e308, &["a"]),
                    ]),
                    subphases: None,
                }],
            },
        };
        let catalog = build_catalog(&project).unwrap();
        let graph = resolve_dependencies(&catalog, &AnalysisConfig::default()).unwrap();
        let order = sequence(&catalog, &graph).unwrap();

        let err = forward_pass(&catalog, &graph, &order, 0).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::MalformedInput { ref context, .. } if context == "P/b"
        ));
    }

    #[test]
    fn test_empty_project_finishes_at_zero() {
        let result = run(vec![]);
        assert!(result.is_empty());
        assert_eq!(result.project_finish(), 0.0);
    }
}
