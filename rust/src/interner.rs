//! Identifier interning for the task catalog.
//!
//! A `phase/subphase/name` identifier maps to its position in the catalog,
//! so the resolver, sequencer and both passes index plain vectors by
//! `TaskId`. IDs are handed out once per identifier; a repeat is refused.

use rustc_hash::FxHashMap;

/// Dense task ID, equal to the task's catalog position.
pub type TaskId = u32;

/// Maps task identifier strings to dense integer IDs and back.
#[derive(Debug, Clone)]
pub struct TaskIdInterner {
    to_int: FxHashMap<String, TaskId>,
    from_int: Vec<String>,
}

impl TaskIdInterner {
    /// Create a new interner with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_int: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            from_int: Vec::with_capacity(capacity),
        }
    }

    /// Intern a fresh identifier.
    ///
    /// Returns `None` if the identifier was already interned; catalog
    /// identifiers must be unique within a run.
    pub fn intern_unique(&mut self, s: &str) -> Option<TaskId> {
        if self.to_int.contains_key(s) {
            return None;
        }
        let id = self.from_int.len() as TaskId;
        self.from_int.push(s.to_string());
        self.to_int.insert(s.to_string(), id);
        Some(id)
    }

    /// Get the integer ID for an identifier, if it exists.
    #[inline]
    pub fn get(&self, s: &str) -> Option<TaskId> {
        self.to_int.get(s).copied()
    }

    /// Get the identifier for an integer ID.
    #[inline]
    pub fn resolve(&self, id: TaskId) -> Option<&str> {
        self.from_int.get(id as usize).map(|s| s.as_str())
    }
}

impl Default for TaskIdInterner {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}
