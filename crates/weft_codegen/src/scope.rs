//! Lookup of sub-circuit types through nested dependency maps.

use weft_graph::{Dependencies, Project};

use crate::error::{CodegenError, CodegenResult};

/// A chain of dependency maps, innermost first.
///
/// A sub-circuit's generic blocks resolve through its own dependency map and
/// then through the maps of every enclosing design, so both nested and
/// flattened project files compile.
#[derive(Clone, Copy)]
pub struct DependencyScope<'a> {
    deps: &'a Dependencies,
    parent: Option<&'a DependencyScope<'a>>,
}

impl<'a> DependencyScope<'a> {
    /// Creates the scope of a top-level design.
    pub fn root(deps: &'a Dependencies) -> Self {
        Self { deps, parent: None }
    }

    /// Creates the scope of a sub-circuit nested in this one.
    pub fn nested<'b>(&'b self, deps: &'b Dependencies) -> DependencyScope<'b>
    where
        'a: 'b,
    {
        DependencyScope {
            deps,
            parent: Some(self),
        }
    }

    /// Finds a sub-circuit by type name.
    pub fn lookup(&self, type_name: &str) -> Option<&'a Project> {
        match self.deps.get(type_name) {
            Some(project) => Some(project),
            None => self.parent.and_then(|p| p.lookup(type_name)),
        }
    }

    /// Finds the sub-circuit a generic block instantiates, failing if it is absent.
    pub fn require(&self, block: &str, type_name: &str) -> CodegenResult<&'a Project> {
        self.lookup(type_name)
            .ok_or_else(|| CodegenError::MissingDependency {
                block: block.to_string(),
                type_name: type_name.to_string(),
            })
    }
}
