//! Reserve and critical path analysis, and the result shape handed to
//! renderers and report generators.

use serde::Serialize;

use crate::backward_pass::BackwardPass;
use crate::catalog::Catalog;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::forward_pass::ForwardPass;
use crate::interner::TaskId;
use crate::log_summary;
use crate::resolver::{DependencyGraph, ResolutionWarning};

/// Computed schedule for one task.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TaskSchedule {
    pub id: String,
    pub name: String,
    pub phase_path: Vec<String>,
    pub duration: f64,
    pub assignees: Vec<String>,
    /// Identifiers of resolved direct predecessors.
    pub predecessors: Vec<String>,
    /// Identifiers of direct successors.
    pub successors: Vec<String>,
    /// Longest predecessor chain length, for column placement in diagrams.
    pub level: usize,
    pub earliest_start: f64,
    pub earliest_finish: f64,
    pub latest_start: f64,
    pub latest_finish: f64,
    /// LF - EF.
    pub total_reserve: f64,
    /// Min successor ES - EF, or the total reserve for tasks without successors.
    pub free_reserve: f64,
    pub is_critical: bool,
}

/// Complete, read-only result of one analysis run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScheduleAnalysis {
    pub project_name: String,
    pub project_manager: String,
    /// Max earliest finish over all tasks.
    pub project_duration: f64,
    /// All tasks in catalog order.
    pub tasks: Vec<TaskSchedule>,
    /// Identifiers of all zero-reserve tasks, in catalog order.
    pub critical_path: Vec<String>,
    /// Name references that did not resolve to exactly one task.
    pub warnings: Vec<ResolutionWarning>,
}

impl ScheduleAnalysis {
    /// Look up a task's schedule by identifier.
    pub fn task(&self, id: &str) -> Option<&TaskSchedule> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks on the critical path, in catalog order.
    pub fn critical_tasks(&self) -> impl Iterator<Item = &TaskSchedule> {
        self.tasks.iter().filter(|t| t.is_critical)
    }

    pub fn is_critical(&self, id: &str) -> bool {
        self.task(id).is_some_and(|t| t.is_critical)
    }
}

/// Derive reserves and the critical path from both passes.
pub fn analyze(
    catalog: &Catalog,
    graph: &DependencyGraph,
    forward: &ForwardPass,
    backward: &BackwardPass,
    config: &AnalysisConfig,
) -> Result<ScheduleAnalysis, AnalysisError> {
    let n = catalog.len();
    if graph.task_count() != n || forward.len() != n || backward.len() != n {
        return Err(AnalysisError::out_of_order(
            "analyze",
            format!(
                "catalog has {} tasks, graph {}, forward pass {}, backward pass {}",
                n,
                graph.task_count(),
                forward.len(),
                backward.len()
            ),
        ));
    }
    if forward.project_finish() != backward.project_finish() {
        return Err(AnalysisError::out_of_order(
            "analyze",
            "backward pass was not seeded from this forward pass",
        ));
    }

    let early = forward.timings();
    let late = backward.timings();
    let keys = |ids: &[TaskId]| -> Vec<String> {
        ids.iter().map(|&id| catalog.key_of(id).to_string()).collect()
    };

    let mut tasks = Vec::with_capacity(n);
    let mut critical_path = Vec::new();

    for task in catalog.tasks() {
        let idx = task.id as usize;
        let (e, l) = (&early[idx], &late[idx]);
        let successors = graph.successors(task.id);

        let total_reserve = l.latest_finish - e.earliest_finish;
        let free_reserve = successors
            .iter()
            .map(|&s| early[s as usize].earliest_start)
            .reduce(f64::min)
            .map(|min_start| min_start - e.earliest_finish)
            .unwrap_or(total_reserve);
        let is_critical = config.is_zero_reserve(total_reserve);

        if is_critical {
            critical_path.push(task.key.clone());
        }

        tasks.push(TaskSchedule {
            id: task.key.clone(),
            name: task.name.clone(),
            phase_path: task.phase_path.clone(),
            duration: task.duration,
            assignees: task.assignees.clone(),
            predecessors: keys(graph.predecessors(task.id)),
            successors: keys(successors),
            level: e.level,
            earliest_start: e.earliest_start,
            earliest_finish: e.earliest_finish,
            latest_start: l.latest_start,
            latest_finish: l.latest_finish,
            total_reserve,
            free_reserve,
            is_critical,
        });
    }

    let project_duration = forward.project_finish();
    log_summary!(
        config.verbosity,
        "[analyze] project duration {}, {} of {} tasks critical",
        project_duration,
        critical_path.len(),
        n
    );

    Ok(ScheduleAnalysis {
        project_name: catalog.project_name.clone(),
        project_manager: catalog.project_manager.clone(),
        project_duration,
        tasks,
        critical_path,
        warnings: graph.warnings.clone(),
    })
}
