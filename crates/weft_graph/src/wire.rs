//! Wires: directed connections between block ports.

use serde::Deserialize;

/// Source port name marking a wire that carries a constant into a parameter.
pub const PARAM_FEED_PORT: &str = "constant-out";

/// One end of a wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct Endpoint {
    /// Id of the block at this end.
    pub block: String,
    /// Port name on that block.
    #[serde(default)]
    pub port: String,
}

impl Endpoint {
    /// Creates an endpoint.
    pub fn new(block: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            block: block.into(),
            port: port.into(),
        }
    }
}

/// A directed connection from one block's port to another's.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Wire {
    /// The driving end.
    pub source: Endpoint,
    /// The driven end.
    pub target: Endpoint,
    /// Bus width in bits; absent for single-bit wires.
    #[serde(default)]
    pub size: Option<u32>,
}

impl Wire {
    /// Creates a single-bit wire.
    pub fn new(source: Endpoint, target: Endpoint) -> Self {
        Self {
            source,
            target,
            size: None,
        }
    }

    /// Sets the bus width.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Returns `true` if this wire feeds a parameter rather than a signal.
    pub fn is_param_feed(&self) -> bool {
        self.source.port == PARAM_FEED_PORT
    }

    /// Returns the bus width, treating `0` as single-bit.
    pub fn bus_width(&self) -> Option<u32> {
        self.size.filter(|&s| s > 0)
    }
}
