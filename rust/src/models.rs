//! Core data types: the project definition consumed by the catalog and the
//! flat task records it produces.

use serde::{Deserialize, Serialize};

use crate::interner::TaskId;

/// A project as described by its definition file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDefinition {
    #[serde(rename = "project_name", default)]
    pub name: String,
    #[serde(rename = "project_manager", default)]
    pub manager: String,
    #[serde(rename = "project_structure", default)]
    pub structure: ProjectStructure,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectStructure {
    #[serde(default)]
    pub phases: Vec<PhaseDefinition>,
}

/// A top-level phase holding tasks, subphases, or both.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseDefinition {
    #[serde(rename = "phase_name")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<TaskDefinition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subphases: Option<Vec<SubphaseDefinition>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SubphaseDefinition {
    #[serde(rename = "subphase_name")]
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<TaskDefinition>,
}

/// Raw duration as written in the definition: a number or a numeric string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Number(f64),
    Text(String),
}

impl DurationValue {
    /// Parse into a finite, non-negative duration.
    pub fn parse(&self) -> Result<f64, String> {
        let value = match self {
            DurationValue::Number(n) => *n,
            DurationValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("duration {:?} is not a number", s))?,
        };
        if !value.is_finite() {
            return Err(format!("duration {} is not finite", value));
        }
        if value < 0.0 {
            return Err(format!("duration {} is negative", value));
        }
        Ok(value)
    }
}

impl From<f64> for DurationValue {
    fn from(value: f64) -> Self {
        DurationValue::Number(value)
    }
}

/// A task record inside a phase or subphase.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDefinition {
    #[serde(rename = "task_name")]
    pub name: String,
    #[serde(default)]
    pub duration: Option<DurationValue>,
    #[serde(rename = "assigned_to", default)]
    pub assignees: Vec<String>,
    #[serde(default)]
    pub depends_on: Vec<String>,
}

impl TaskDefinition {
    pub fn new(name: &str, duration: f64, depends_on: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            duration: Some(DurationValue::Number(duration)),
            assignees: Vec::new(),
            depends_on: depends_on.iter().map(|d| d.to_string()).collect(),
        }
    }
}

/// A normalized task in the catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct Task {
    /// Dense integer ID, equal to the task's position in the catalog.
    pub id: TaskId,
    /// Unique identifier built from phase path and name.
    pub key: String,
    pub name: String,
    pub duration: f64,
    pub phase_path: Vec<String>,
    pub assignees: Vec<String>,
    /// Predecessor names as declared; resolved once by the resolver.
    pub depends_on: Vec<String>,
}
