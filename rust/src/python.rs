//! Python bindings (feature `python`).

use pyo3::prelude::*;

use crate::config::{AnalysisConfig, UnresolvedPolicy};
use crate::models::ProjectDefinition;

/// Run the full critical path analysis on a project definition.
///
/// # Arguments
/// * `project_json` - Project definition as a JSON document
/// * `verbosity` - Logging level: 0=silent, 1=summary, 2=steps, 3=debug
/// * `strict_dependencies` - Fail on predecessor names that match no task
///
/// # Returns
/// * The schedule analysis serialized as JSON
///
/// # Raises
/// * ValueError if the JSON is invalid, the input is malformed, or the
///   dependency graph has a cycle
#[pyfunction]
#[pyo3(signature = (project_json, verbosity=0, strict_dependencies=false))]
fn analyze_project_json(
    project_json: &str,
    verbosity: u8,
    strict_dependencies: bool,
) -> PyResult<String> {
    let project: ProjectDefinition = serde_json::from_str(project_json)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;

    let config = AnalysisConfig {
        unresolved_policy: if strict_dependencies {
            UnresolvedPolicy::Error
        } else {
            UnresolvedPolicy::Warn
        },
        verbosity,
        ..AnalysisConfig::default()
    };

    let analysis = crate::analyze_project(&project, &config)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;

    serde_json::to_string(&analysis)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
}

/// The cpm_rust Python module.
#[pymodule]
fn cpm_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(analyze_project_json, m)?)?;
    Ok(())
}
