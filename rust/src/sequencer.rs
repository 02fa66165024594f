//! Topological sequencing with cycle detection.
//!
//! Depth-first walk over predecessor links with three marks per task
//! (unvisited, in progress, done). A task is emitted once all of its
//! predecessors are emitted, so postorder is a valid topological order.
//! Reaching a task that is still in progress means a back-edge: the graph
//! has a cycle and the walk stops immediately.

use crate::catalog::Catalog;
use crate::error::AnalysisError;
use crate::interner::TaskId;
use crate::resolver::DependencyGraph;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Task IDs ordered so that every predecessor precedes its dependents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopologicalOrder {
    order: Vec<TaskId>,
}

impl TopologicalOrder {
    /// Wrap an arbitrary ID sequence, bypassing the sequencer.
    #[cfg(test)]
    pub(crate) fn from_unchecked(order: Vec<TaskId>) -> Self {
        Self { order }
    }

    pub fn as_slice(&self) -> &[TaskId] {
        &self.order
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = TaskId> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Order all catalog tasks topologically.
///
/// Roots are visited in catalog order and predecessors in declaration order,
/// so the result is deterministic for a given catalog. Fails with
/// `CyclicDependency` naming the tasks on the first cycle found.
pub fn sequence(
    catalog: &Catalog,
    graph: &DependencyGraph,
) -> Result<TopologicalOrder, AnalysisError> {
    let n = catalog.len();
    if graph.task_count() != n {
        return Err(AnalysisError::out_of_order(
            "sequence",
            format!(
                "dependency graph covers {} tasks, catalog has {}",
                graph.task_count(),
                n
            ),
        ));
    }

    let mut marks = vec![Mark::Unvisited; n];
    let mut order: Vec<TaskId> = Vec::with_capacity(n);
    // (task, index of next predecessor to visit)
    let mut stack: Vec<(TaskId, usize)> = Vec::new();

    for root in 0..n as TaskId {
        if marks[root as usize] != Mark::Unvisited {
            continue;
        }
        marks[root as usize] = Mark::InProgress;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let (task, next) = *frame;
            let preds = graph.predecessors(task);

            if next == preds.len() {
                stack.pop();
                marks[task as usize] = Mark::Done;
                order.push(task);
                continue;
            }
            frame.1 += 1;

            let pred = preds[next];
            match marks[pred as usize] {
                Mark::Done => {}
                Mark::Unvisited => {
                    marks[pred as usize] = Mark::InProgress;
                    stack.push((pred, 0));
                }
                Mark::InProgress => {
                    return Err(AnalysisError::CyclicDependency {
                        cycle: cycle_from_stack(catalog, &stack, pred),
                    });
                }
            }
        }
    }

    Ok(TopologicalOrder { order })
}

/// Extract the cycle closed by a back-edge to `entry`.
///
/// The stack holds the current predecessor walk, so everything from `entry`
/// to the top lies on the cycle. Reported in dependency order: each task is
/// followed by the one that depends on it.
fn cycle_from_stack(catalog: &Catalog, stack: &[(TaskId, usize)], entry: TaskId) -> Vec<String> {
    let start = stack
        .iter()
        .position(|&(task, _)| task == entry)
        .unwrap_or(0);
    stack[start..]
        .iter()
        .rev()
        .map(|&(task, _)| catalog.key_of(task).to_string())
        .collect()
}
