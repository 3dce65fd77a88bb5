//! Code generation error types.
//!
//! Malformed or partial graphs degrade to partial output rather than errors.
//! The variants here cover the cases where emitting text would produce a
//! design that references modules which do not exist or never terminate.

/// Errors that can occur while compiling a circuit graph.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    /// A generic block references a sub-circuit type missing from every
    /// dependency map in scope.
    #[error("block '{block}' instantiates unknown sub-circuit type '{type_name}'")]
    MissingDependency {
        /// Id of the generic block.
        block: String,
        /// The unresolved dependency type name.
        type_name: String,
    },

    /// A sub-circuit's dependency map contains the sub-circuit itself.
    #[error("sub-circuit type '{0}' depends on itself")]
    DependencyCycle(String),
}

/// Result alias for fallible code generation.
pub type CodegenResult<T> = Result<T, CodegenError>;

/// A target name that is not one of the known artifacts.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown target '{0}' (expected verilog, pcf, testbench or gtkwave)")]
pub struct UnknownTarget(pub String);
