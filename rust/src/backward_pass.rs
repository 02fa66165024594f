//! Backward pass: latest start and finish times.
//!
//! Walks the topological order in reverse, seeded from the project finish
//! time (max earliest finish). A task's latest finish is the minimum latest
//! start of its immediate successors. Tasks without successors are sinks and
//! finish at the project finish time, including dead ends whose earliest
//! finish is below it.

use crate::catalog::Catalog;
use crate::error::AnalysisError;
use crate::forward_pass::ForwardPass;
use crate::interner::TaskId;
use crate::resolver::DependencyGraph;
use crate::sequencer::TopologicalOrder;
use crate::{log_debug, log_steps};

/// Latest times for one task.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LateTimes {
    pub latest_start: f64,
    pub latest_finish: f64,
}

/// Result of the backward pass, indexed by task ID.
#[derive(Clone, Debug, PartialEq)]
pub struct BackwardPass {
    timings: Vec<LateTimes>,
    project_finish: f64,
}

impl BackwardPass {
    #[inline]
    pub fn get(&self, id: TaskId) -> Option<&LateTimes> {
        self.timings.get(id as usize)
    }

    pub fn timings(&self) -> &[LateTimes] {
        &self.timings
    }

    /// The finish time the pass was seeded from.
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

/// Compute LS/LF for every task in reverse topological order.
///
/// Fails with `PrecedenceViolation` if the forward pass or order do not
/// belong to this catalog, or a task is reached before all its successors.
pub fn backward_pass(
    catalog: &Catalog,
    graph: &DependencyGraph,
    order: &TopologicalOrder,
    forward: &ForwardPass,
    verbosity: u8,
) -> Result<BackwardPass, AnalysisError> {
    let n = catalog.len();
    if graph.task_count() != n || order.len() != n || forward.len() != n {
        return Err(AnalysisError::out_of_order(
            "backward_pass",
            format!(
                "catalog has {} tasks, graph {}, order {}, forward pass {}",
                n,
                graph.task_count(),
                order.len(),
                forward.len()
            ),
        ));
    }

    let project_finish = forward.project_finish();
    let mut timings = vec![
        LateTimes {
            latest_start: project_finish,
            latest_finish: project_finish,
        };
        n
    ];
    let mut finalized = vec![false; n];

    for id in order.iter().rev() {
        let idx = id as usize;
        let duration = catalog.task(id).map(|t| t.duration).unwrap_or(0.0);
        let successors = graph.successors(id);

        let latest_finish = if successors.is_empty() {
            let earliest_finish = forward.get(id).map(|t| t.earliest_finish).unwrap_or(0.0);
            if earliest_finish < project_finish {
                log_steps!(
                    verbosity,
                    "[backward] {} has no successors, treating as sink at {}",
                    catalog.key_of(id),
                    project_finish
                );
            }
            project_finish
        } else {
            let mut min_start = f64::INFINITY;
            for &succ in successors {
                if !finalized[succ as usize] {
                    return Err(AnalysisError::out_of_order(
                        "backward_pass",
                        format!(
                            "{} reached before its successor {}",
                            catalog.key_of(id),
                            catalog.key_of(succ)
                        ),
                    ));
                }
                min_start = min_start.min(timings[succ as usize].latest_start);
            }
            min_start
        };

        timings[idx] = LateTimes {
            latest_start: latest_finish - duration,
            latest_finish,
        };
        finalized[idx] = true;

        log_debug!(
            verbosity,
            "[backward] {}: LS={} LF={}",
            catalog.key_of(id),
            latest_finish - duration,
            latest_finish
        );
    }

    Ok(BackwardPass {
        timings,
        project_finish,
    })
}
