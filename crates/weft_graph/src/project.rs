//! Editor project files: a top-level design plus its sub-circuit dependencies.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::GraphError;
use crate::graph::Graph;

/// Dependency type name to the dependency's own project, in file order.
pub type Dependencies = IndexMap<String, Project>;

/// A circuit design and the sub-circuits it references.
///
/// Dependencies are projects themselves, so a sub-circuit may carry its own
/// dependency map.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Project {
    /// The design.
    #[serde(default)]
    pub design: Design,
    /// Sub-circuits referenced by generic blocks, keyed by type name.
    #[serde(default)]
    pub dependencies: Dependencies,
}

/// The design part of a project.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Design {
    /// Board the design was drawn for, if recorded by the editor.
    #[serde(default)]
    pub board: Option<String>,
    /// The circuit graph.
    #[serde(default)]
    pub graph: Graph,
}

impl Project {
    /// Creates a dependency-free project around a graph.
    pub fn from_graph(graph: Graph) -> Self {
        Self {
            design: Design { board: None, graph },
            dependencies: Dependencies::new(),
        }
    }

    /// Parses an editor project from JSON text.
    pub fn from_json(text: &str) -> Result<Self, GraphError> {
        serde_json::from_str(text).map_err(|e| GraphError::Parse(e.to_string()))
    }

    /// Returns the top-level graph.
    pub fn graph(&self) -> &Graph {
        &self.design.graph
    }
}

/// Reads and parses an editor project file.
pub fn load_project(path: &Path) -> Result<Project, GraphError> {
    let text = std::fs::read_to_string(path)?;
    Project::from_json(&text)
}
