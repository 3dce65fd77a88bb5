//! The circuit graph container and its queries.

use serde::Deserialize;

use crate::block::Block;
use crate::wire::Wire;

/// A set of blocks and the wires between them.
///
/// Block order and wire order are significant: generated names and the
/// order of emitted declarations follow them, so compiling the same graph
/// twice yields identical text.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Graph {
    /// The blocks, in editor order.
    #[serde(default)]
    pub blocks: Vec<Block>,
    /// The wires, in editor order. A wire's position is its index in the
    /// generated signal names (`w<idx>`, `p<idx>`).
    #[serde(default)]
    pub wires: Vec<Wire>,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a block by id.
    pub fn block(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Returns `true` if some wire targets the given port.
    pub fn is_driven(&self, block: &str, port: &str) -> bool {
        self.wires
            .iter()
            .any(|w| w.target.block == block && w.target.port == port)
    }

    /// Returns `true` if the graph has neither blocks nor wires.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty() && self.wires.is_empty()
    }
}
