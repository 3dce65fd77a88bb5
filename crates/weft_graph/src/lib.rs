//! The circuit graph: blocks, wires, and reusable sub-circuit dependencies.
//!
//! This crate defines the data model the visual editor hands to the compiler
//! ([`Project`], [`Graph`], [`Block`], [`Wire`]) and parses it from the
//! editor's JSON project format.

#![warn(missing_docs)]

pub mod block;
mod de;
pub mod error;
pub mod graph;
pub mod project;
pub mod wire;

pub use block::{
    Block, BlockKind, CodeBlock, CodeParam, CodePort, CodePorts, ConstantBlock, DefaultDescriptor,
    Pin, PortBlock, PRIMITIVE_PREFIX,
};
pub use error::GraphError;
pub use graph::Graph;
pub use project::{load_project, Dependencies, Design, Project};
pub use wire::{Endpoint, Wire, PARAM_FEED_PORT};
