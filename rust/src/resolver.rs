//! Dependency resolution: turns predecessor names into direct ID references.
//!
//! Names are matched against the whole catalog, not just the dependent's own
//! phase, so a "Testing" task can depend on a "Development" task. Resolution
//! happens exactly once; later stages only walk the adjacency lists.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::config::{AmbiguityPolicy, AnalysisConfig, UnresolvedPolicy};
use crate::error::AnalysisError;
use crate::interner::TaskId;
use crate::models::Task;
use crate::{log_steps, log_summary};

/// Observable outcome of a name reference that did not map cleanly to one task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ResolutionWarning {
    /// No task carries the name; the edge was dropped.
    Unresolved { task: String, reference: String },
    /// Several tasks carry the name; `chosen` was picked.
    Ambiguous {
        task: String,
        reference: String,
        chosen: String,
        candidates: Vec<String>,
    },
}

/// Predecessor and successor adjacency lists indexed by task ID.
#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    predecessors: Vec<Vec<TaskId>>,
    successors: Vec<Vec<TaskId>>,
    edge_count: usize,
    pub warnings: Vec<ResolutionWarning>,
}

impl DependencyGraph {
    /// Direct predecessors of a task, in declaration order.
    #[inline]
    pub fn predecessors(&self, id: TaskId) -> &[TaskId] {
        self.predecessors
            .get(id as usize)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Direct successors of a task, in catalog order of the dependents.
    #[inline]
    pub fn successors(&self, id: TaskId) -> &[TaskId] {
        self.successors
            .get(id as usize)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Number of tasks the graph was built for.
    pub fn task_count(&self) -> usize {
        self.predecessors.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// All edges as (predecessor, successor) pairs.
    pub fn edges(&self) -> impl Iterator<Item = (TaskId, TaskId)> + '_ {
        self.predecessors
            .iter()
            .enumerate()
            .flat_map(|(succ, preds)| preds.iter().map(move |&pred| (pred, succ as TaskId)))
    }

    fn add_edge(&mut self, pred: TaskId, succ: TaskId) {
        let preds = &mut self.predecessors[succ as usize];
        if preds.contains(&pred) {
            return;
        }
        preds.push(pred);
        self.successors[pred as usize].push(succ);
        self.edge_count += 1;
    }
}

/// Resolve every task's predecessor names to task IDs.
///
/// A task referencing a name it carries itself resolves to another task of
/// that name when one exists; only a name unique to the task yields a
/// self-edge, which the sequencer reports as a cycle. Repeated references to
/// the same predecessor collapse to one edge.
pub fn resolve_dependencies(
    catalog: &Catalog,
    config: &AnalysisConfig,
) -> Result<DependencyGraph, AnalysisError> {
    let n = catalog.len();
    let mut graph = DependencyGraph {
        predecessors: vec![Vec::new(); n],
        successors: vec![Vec::new(); n],
        edge_count: 0,
        warnings: Vec::new(),
    };

    for task in catalog.tasks() {
        for reference in &task.depends_on {
            let named = catalog.ids_named(reference);
            let others: Vec<TaskId> = named.iter().copied().filter(|&c| c != task.id).collect();

            let pred = match (others.as_slice(), named.is_empty()) {
                ([], true) => {
                    match config.unresolved_policy {
                        UnresolvedPolicy::Error => {
                            return Err(AnalysisError::UnresolvedDependency {
                                task: task.key.clone(),
                                reference: reference.clone(),
                            });
                        }
                        UnresolvedPolicy::Warn => {
                            log_summary!(
                                config.verbosity,
                                "[resolve] {} depends on unknown task {:?}, dropping edge",
                                task.key,
                                reference
                            );
                            graph.warnings.push(ResolutionWarning::Unresolved {
                                task: task.key.clone(),
                                reference: reference.clone(),
                            });
                        }
                    }
                    continue;
                }
                // Only the task itself carries the name
                ([], false) => task.id,
                ([single], _) => *single,
                (candidates, _) => {
                    let chosen =
                        choose_candidate(catalog, task, candidates, config.ambiguity_policy);
                    log_steps!(
                        config.verbosity,
                        "[resolve] {} -> {:?} is ambiguous ({} candidates), chose {}",
                        task.key,
                        reference,
                        candidates.len(),
                        catalog.key_of(chosen)
                    );
                    graph.warnings.push(ResolutionWarning::Ambiguous {
                        task: task.key.clone(),
                        reference: reference.clone(),
                        chosen: catalog.key_of(chosen).to_string(),
                        candidates: candidates
                            .iter()
                            .map(|&c| catalog.key_of(c).to_string())
                            .collect(),
                    });
                    chosen
                }
            };

            log_steps!(
                config.verbosity,
                "[resolve] {} depends on {}",
                task.key,
                catalog.key_of(pred)
            );
            graph.add_edge(pred, task.id);
        }
    }

    log_summary!(
        config.verbosity,
        "[resolve] {} tasks, {} edges, {} warnings",
        n,
        graph.edge_count,
        graph.warnings.len()
    );

    Ok(graph)
}

/// Pick one of several same-named candidates (all distinct from `task`).
fn choose_candidate(
    catalog: &Catalog,
    task: &Task,
    candidates: &[TaskId],
    policy: AmbiguityPolicy,
) -> TaskId {
    let first = candidates[0];
    match policy {
        AmbiguityPolicy::FirstInCatalog => first,
        AmbiguityPolicy::PreferSamePhase => candidates
            .iter()
            .copied()
            .find(|&c| {
                catalog
                    .task(c)
                    .is_some_and(|t| t.phase_path == task.phase_path)
            })
            .unwrap_or(first),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_catalog;
    use crate::models::{PhaseDefinition, ProjectDefinition, ProjectStructure, TaskDefinition};

    fn make_catalog(phases: Vec<(&str, Vec<TaskDefinition>)>) -> Catalog {
        let project = ProjectDefinition {
            name: "Test".to_string(),
            manager: String::new(),
            structure: ProjectStructure {
                phases: phases
                    .into_iter()
                    .map(|(name, tasks)| PhaseDefinition {
                        name: name.to_string(),
                        tasks: Some(tasks),
                        subphases: None,
                    })
                    .collect(),
            },
        };
        build_catalog(&project).unwrap()
    }

    #[test]
    fn test_simple_edges() {
        let catalog = make_catalog(vec![(
            "P",
            vec![
                TaskDefinition::new("A", 5.0, &[]),
                TaskDefinition::new("B", 3.0, &["A"]),
                TaskDefinition::new("C", 2.0, &["A"]),
            ],
        )]);
        let graph = resolve_dependencies(&catalog, &AnalysisConfig::default()).unwrap();

        assert_eq!(graph.task_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.predecessors(0).is_empty());
        assert_eq!(graph.predecessors(1), &[0]);
        assert_eq!(graph.predecessors(2), &[0]);
        assert_eq!(graph.successors(0), &[1, 2]);
        assert!(graph.successors(1).is_empty());
        assert!(graph.warnings.is_empty());

        let edges: Vec<(TaskId, TaskId)> = graph.edges().collect();
        assert_eq!(edges, vec![(0, 1), (0, 2)]);
    }

    #[test]
    fn test_cross_phase_reference() {
        let catalog = make_catalog(vec![
            ("Development", vec![TaskDefinition::new("Build", 4.0, &[])]),
            ("Testing", vec![TaskDefinition::new("Verify", 2.0, &["Build"])]),
        ]);
        let graph = resolve_dependencies(&catalog, &AnalysisConfig::default()).unwrap();
        assert_eq!(graph.predecessors(1), &[0]);
    }

    #[test]
    fn test_same_name_reference_resolves_to_other_task() {
        // Testing/Integration depends on Development/Integration
        let catalog = make_catalog(vec![
            ("Development", vec![TaskDefinition::new("Integration", 4.0, &[])]),
            (
                "Testing",
                vec![TaskDefinition::new("Integration", 2.0, &["Integration"])],
            ),
        ]);
        let graph = resolve_dependencies(&catalog, &AnalysisConfig::default()).unwrap();
        assert_eq!(graph.predecessors(1), &[0]);
        assert!(graph.predecessors(0).is_empty());
        assert!(graph.warnings.is_empty());
    }

    #[test]
    fn test_unique_self_reference_is_self_edge() {
        let catalog = make_catalog(vec![("P", vec![TaskDefinition::new("A", 1.0, &["A"])])]);
        let graph = resolve_dependencies(&catalog, &AnalysisConfig::default()).unwrap();
        assert_eq!(graph.predecessors(0), &[0]);
    }

    #[test]
    fn test_unresolved_warns_and_drops() {
        let catalog = make_catalog(vec![(
            "P",
            vec![
                TaskDefinition::new("A", 1.0, &[]),
                TaskDefinition::new("B", 1.0, &["A", "Ghost"]),
            ],
        )]);
        let graph = resolve_dependencies(&catalog, &AnalysisConfig::default()).unwrap();

        assert_eq!(graph.predecessors(1), &[0]);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(
            graph.warnings,
            vec![ResolutionWarning::Unresolved {
                task: "P/B".to_string(),
                reference: "Ghost".to_string(),
            }]
        );
    }

    #[test]
    fn test_unresolved_strict_errors() {
        let catalog = make_catalog(vec![("P", vec![TaskDefinition::new("B", 1.0, &["Ghost"])])]);
        let err = resolve_dependencies(&catalog, &AnalysisConfig::strict()).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::UnresolvedDependency {
                task: "P/B".to_string(),
                reference: "Ghost".to_string(),
            }
        );
    }

    #[test]
    fn test_ambiguous_first_in_catalog() {
        let catalog = make_catalog(vec![
            ("Frontend", vec![TaskDefinition::new("Review", 1.0, &[])]),
            (
                "Backend",
                vec![
                    TaskDefinition::new("Review", 2.0, &[]),
                    TaskDefinition::new("Release", 1.0, &["Review"]),
                ],
            ),
        ]);
        let graph = resolve_dependencies(&catalog, &AnalysisConfig::default()).unwrap();

        assert_eq!(graph.predecessors(2), &[0]);
        assert_eq!(
            graph.warnings,
            vec![ResolutionWarning::Ambiguous {
                task: "Backend/Release".to_string(),
                reference: "Review".to_string(),
                chosen: "Frontend/Review".to_string(),
                candidates: vec!["Frontend/Review".to_string(), "Backend/Review".to_string()],
            }]
        );
    }

    #[test]
    fn test_ambiguous_prefer_same_phase() {
        let catalog = make_catalog(vec![
            ("Frontend", vec![TaskDefinition::new("Review", 1.0, &[])]),
            (
                "Backend",
                vec![
                    TaskDefinition::new("Review", 2.0, &[]),
                    TaskDefinition::new("Release", 1.0, &["Review"]),
                ],
            ),
            ("Ops", vec![TaskDefinition::new("Deploy", 1.0, &["Review"])]),
        ]);
        let config = AnalysisConfig {
            ambiguity_policy: AmbiguityPolicy::PreferSamePhase,
            ..AnalysisConfig::default()
        };
        let graph = resolve_dependencies(&catalog, &config).unwrap();

        assert_eq!(graph.predecessors(2), &[1]);
        // No candidate in Ops, falls back to first in catalog
        assert_eq!(graph.predecessors(3), &[0]);
        assert_eq!(graph.warnings.len(), 2);
    }

    #[test]
    fn test_duplicate_references_collapse() {
        let catalog = make_catalog(vec![(
            "P",
            vec![
                TaskDefinition::new("A", 1.0, &[]),
                TaskDefinition::new("B", 1.0, &["A", "A"]),
            ],
        )]);
        let graph = resolve_dependencies(&catalog, &AnalysisConfig::default()).unwrap();
        assert_eq!(graph.predecessors(1), &[0]);
        assert_eq!(graph.successors(0), &[1]);
        assert_eq!(graph.edge_count(), 1);
    }
}
