//! Task catalog: flattens the phase/subphase hierarchy into uniquely
//! identified task records.

use rustc_hash::FxHashMap;

use crate::error::AnalysisError;
use crate::interner::{TaskId, TaskIdInterner};
use crate::models::{ProjectDefinition, Task, TaskDefinition};

/// Separator between phase path segments and the task name in identifiers.
pub const KEY_SEPARATOR: &str = "/";

/// Immutable snapshot of all tasks in a project, in definition order.
#[derive(Clone, Debug)]
pub struct Catalog {
    pub project_name: String,
    pub project_manager: String,
    tasks: Vec<Task>,
    interner: TaskIdInterner,
    /// Display name -> task IDs carrying that name, in catalog order.
    by_name: FxHashMap<String, Vec<TaskId>>,
}

impl Catalog {
    /// Tasks in catalog order; `tasks()[id]` is the task with that ID.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[inline]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(id as usize)
    }

    /// Look up a task by its identifier string.
    pub fn find(&self, key: &str) -> Option<&Task> {
        self.interner.get(key).and_then(|id| self.task(id))
    }

    /// All tasks carrying a display name, in catalog order.
    pub fn ids_named(&self, name: &str) -> &[TaskId] {
        self.by_name.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Identifier string for a task ID (empty if unknown).
    pub fn key_of(&self, id: TaskId) -> &str {
        self.interner.resolve(id).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Build the identifier for a task from its phase path and name.
pub fn task_key(phase_path: &[String], name: &str) -> String {
    let mut key = phase_path.join(KEY_SEPARATOR);
    key.push_str(KEY_SEPARATOR);
    key.push_str(name);
    key
}

/// Normalize a project definition into a flat task catalog.
///
/// Phase tasks come before the tasks of that phase's subphases. Fails with
/// `MalformedInput` on empty names, names containing `KEY_SEPARATOR`,
/// unusable durations, or two tasks that would share an identifier.
pub fn build_catalog(project: &ProjectDefinition) -> Result<Catalog, AnalysisError> {
    let mut builder = CatalogBuilder::default();

    for (index, phase) in project.structure.phases.iter().enumerate() {
        if phase.name.trim().is_empty() {
            return Err(AnalysisError::malformed(
                format!("phase #{}", index + 1),
                "phase name is empty",
            ));
        }
        check_separator(&phase.name, "phase")?;
        let phase_path = vec![phase.name.clone()];

        if let Some(tasks) = &phase.tasks {
            builder.add_tasks(&phase_path, tasks)?;
        }

        for (sub_index, subphase) in phase.subphases.iter().flatten().enumerate() {
            if subphase.name.trim().is_empty() {
                return Err(AnalysisError::malformed(
                    format!("{} subphase #{}", phase.name, sub_index + 1),
                    "subphase name is empty",
                ));
            }
            check_separator(&subphase.name, "subphase")?;
            let sub_path = vec![phase.name.clone(), subphase.name.clone()];
            builder.add_tasks(&sub_path, &subphase.tasks)?;
        }
    }

    Ok(Catalog {
        project_name: project.name.clone(),
        project_manager: project.manager.clone(),
        tasks: builder.tasks,
        interner: builder.interner,
        by_name: builder.by_name,
    })
}

/// Names containing the separator would make identifiers ambiguous.
fn check_separator(name: &str, kind: &str) -> Result<(), AnalysisError> {
    if name.contains(KEY_SEPARATOR) {
        return Err(AnalysisError::malformed(
            name,
            format!("{} name must not contain {:?}", kind, KEY_SEPARATOR),
        ));
    }
    Ok(())
}

#[derive(Default)]
struct CatalogBuilder {
    tasks: Vec<Task>,
    interner: TaskIdInterner,
    by_name: FxHashMap<String, Vec<TaskId>>,
}

impl CatalogBuilder {
    fn add_tasks(
        &mut self,
        phase_path: &[String],
        tasks: &[TaskDefinition],
    ) -> Result<(), AnalysisError> {
        for (index, def) in tasks.iter().enumerate() {
            let context = phase_path.join(KEY_SEPARATOR);
            if def.name.trim().is_empty() {
                return Err(AnalysisError::malformed(
                    format!("{} task #{}", context, index + 1),
                    "task name is empty",
                ));
            }
            check_separator(&def.name, "task")?;

            let key = task_key(phase_path, &def.name);
            let duration = match &def.duration {
                Some(raw) => raw
                    .parse()
                    .map_err(|reason| AnalysisError::malformed(&key, reason))?,
                None => return Err(AnalysisError::malformed(&key, "duration is missing")),
            };

            let id = self.interner.intern_unique(&key).ok_or_else(|| {
                AnalysisError::malformed(&key, "task name appears twice in the same phase")
            })?;

            self.by_name.entry(def.name.clone()).or_default().push(id);
            self.tasks.push(Task {
                id,
                key,
                name: def.name.clone(),
                duration,
                phase_path: phase_path.to_vec(),
                assignees: def.assignees.clone(),
                depends_on: def.depends_on.clone(),
            });
        }
        Ok(())
    }
}
