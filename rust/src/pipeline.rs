//! Typestate driver for the analysis stages.
//!
//! `Built -> Sequenced -> ForwardComputed -> BackwardComputed -> Analyzed`.
//! Each transition consumes the previous stage, so running a stage before
//! its prerequisite does not compile.

use crate::analysis::{analyze, ScheduleAnalysis};
use crate::backward_pass::{backward_pass, BackwardPass};
use crate::catalog::Catalog;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::forward_pass::{forward_pass, ForwardPass};
use crate::resolver::{resolve_dependencies, DependencyGraph};
use crate::sequencer::{sequence, TopologicalOrder};

/// Catalog built and dependencies resolved.
pub struct Built {
    graph: DependencyGraph,
}

pub struct Sequenced {
    graph: DependencyGraph,
    order: TopologicalOrder,
}

pub struct ForwardComputed {
    graph: DependencyGraph,
    order: TopologicalOrder,
    forward: ForwardPass,
}

pub struct BackwardComputed {
    graph: DependencyGraph,
    forward: ForwardPass,
    backward: BackwardPass,
}

/// One analysis run over a borrowed catalog.
pub struct Pipeline<'a, S> {
    catalog: &'a Catalog,
    config: &'a AnalysisConfig,
    stage: S,
}

impl<'a, S> Pipeline<'a, S> {
    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }
}

impl<'a> Pipeline<'a, Built> {
    /// Resolve the catalog's dependency names.
    pub fn new(catalog: &'a Catalog, config: &'a AnalysisConfig) -> Result<Self, AnalysisError> {
        let graph = resolve_dependencies(catalog, config)?;
        Ok(Self {
            catalog,
            config,
            stage: Built { graph },
        })
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.stage.graph
    }

    pub fn sequence(self) -> Result<Pipeline<'a, Sequenced>, AnalysisError> {
        let order = sequence(self.catalog, &self.stage.graph)?;
        Ok(Pipeline {
            catalog: self.catalog,
            config: self.config,
            stage: Sequenced {
                graph: self.stage.graph,
                order,
            },
        })
    }
}

impl<'a> Pipeline<'a, Sequenced> {
    pub fn order(&self) -> &TopologicalOrder {
        &self.stage.order
    }

    pub fn forward(self) -> Result<Pipeline<'a, ForwardComputed>, AnalysisError> {
        let forward = forward_pass(
            self.catalog,
            &self.stage.graph,
            &self.stage.order,
            self.config.verbosity,
        )?;
        Ok(Pipeline {
            catalog: self.catalog,
            config: self.config,
            stage: ForwardComputed {
                graph: self.stage.graph,
                order: self.stage.order,
                forward,
            },
        })
    }
}

impl<'a> Pipeline<'a, ForwardComputed> {
    pub fn forward_result(&self) -> &ForwardPass {
        &self.stage.forward
    }

    pub fn backward(self) -> Result<Pipeline<'a, BackwardComputed>, AnalysisError> {
        let backward = backward_pass(
            self.catalog,
            &self.stage.graph,
            &self.stage.order,
            &self.stage.forward,
            self.config.verbosity,
        )?;
        Ok(Pipeline {
            catalog: self.catalog,
            config: self.config,
            stage: BackwardComputed {
                graph: self.stage.graph,
                forward: self.stage.forward,
                backward,
            },
        })
    }
}

impl<'a> Pipeline<'a, BackwardComputed> {
    pub fn backward_result(&self) -> &BackwardPass {
        &self.stage.backward
    }

    /// Final stage: reserves and critical path.
    pub fn analyze(self) -> Result<ScheduleAnalysis, AnalysisError> {
        analyze(
            self.catalog,
            &self.stage.graph,
            &self.stage.forward,
            &self.stage.backward,
            self.config,
        )
    }
}
