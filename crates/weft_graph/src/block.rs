//! Blocks: the nodes of a circuit graph.
//!
//! On disk a block is `{ "id", "type", "data" }` where `type` is a string and
//! the shape of `data` depends on it. In memory the type is a [`BlockKind`]
//! sum type, so every consumer matches exhaustively instead of comparing
//! type strings.

use serde::Deserialize;

use crate::de::{non_empty, string_or_number};
use crate::error::GraphError;

/// Namespace reserved for the editor's built-in block types.
pub const PRIMITIVE_PREFIX: &str = "basic.";

/// One node of a circuit graph.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawBlock")]
pub struct Block {
    /// Identifier, unique within its graph.
    pub id: String,
    /// The block's type and type-specific payload.
    pub kind: BlockKind,
}

/// The type of a block together with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    /// A module input port.
    Input(PortBlock),
    /// A module output port.
    Output(PortBlock),
    /// A compile-time constant, feeding parameters of other blocks.
    Constant(ConstantBlock),
    /// Inline HDL source with declared ports and parameters.
    Code(CodeBlock),
    /// Documentation only; ignored by every generator.
    Info,
    /// An instance of a reusable sub-circuit, keyed by its dependency type name.
    Generic(String),
}

impl Block {
    /// Creates a block.
    pub fn new(id: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    /// Returns the payload if this is an `Input` block.
    pub fn as_input(&self) -> Option<&PortBlock> {
        match &self.kind {
            BlockKind::Input(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the payload if this is an `Output` block.
    pub fn as_output(&self) -> Option<&PortBlock> {
        match &self.kind {
            BlockKind::Output(data) => Some(data),
            _ => None,
        }
    }

    /// Returns `true` for blocks that become module instances when compiled
    /// (inline code and generic sub-circuits).
    pub fn is_instance(&self) -> bool {
        matches!(self.kind, BlockKind::Code(_) | BlockKind::Generic(_))
    }
}

/// Payload of `Input` and `Output` blocks.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PortBlock {
    /// Display name shown in the editor.
    #[serde(default, deserialize_with = "non_empty")]
    pub name: Option<String>,
    /// Bit range such as `[3:0]`, for multi-bit ports.
    #[serde(default, deserialize_with = "non_empty")]
    pub range: Option<String>,
    /// Physical pin bindings, one per bit.
    #[serde(default)]
    pub pins: Vec<Pin>,
    /// Simulation-only port with no physical pin.
    #[serde(default, rename = "virtual")]
    pub is_virtual: bool,
    /// Board default this port offers to unconnected consumers.
    #[serde(default)]
    pub default: Option<DefaultDescriptor>,
}

impl PortBlock {
    /// Creates a single-bit port bound to one physical pin.
    pub fn on_pin(name: impl Into<String>, pin: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            pins: vec![Pin::new("0", pin)],
            ..Self::default()
        }
    }

    /// Returns the value of the only pin, or `None` for multi-pin or unpinned ports.
    pub fn sole_pin(&self) -> Option<&str> {
        match self.pins.as_slice() {
            [pin] => Some(pin.value.as_str()),
            _ => None,
        }
    }
}

/// One physical pin binding of a port.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Pin {
    /// Bit index within the port.
    #[serde(deserialize_with = "string_or_number")]
    pub index: String,
    /// Physical pin name on the board.
    #[serde(default, deserialize_with = "string_or_number")]
    pub value: String,
}

impl Pin {
    /// Creates a pin binding.
    pub fn new(index: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            value: value.into(),
        }
    }
}

/// A default binding: which board pin feeds a port left unconnected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DefaultDescriptor {
    /// Name of the default source port (e.g. `clk`).
    pub port: String,
    /// Physical pin of the default source.
    #[serde(deserialize_with = "string_or_number")]
    pub pin: String,
    /// Whether the default must be applied (the port is unconnected).
    #[serde(default)]
    pub apply: bool,
}

/// Payload of `Constant` blocks.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConstantBlock {
    /// Display name, used for testbench parameter names.
    #[serde(default, deserialize_with = "non_empty")]
    pub name: Option<String>,
    /// Literal value, emitted verbatim.
    #[serde(default, deserialize_with = "string_or_number")]
    pub value: String,
    /// Local constants are never promoted to module parameters.
    #[serde(default)]
    pub local: bool,
}

/// Payload of inline `Code` blocks.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CodeBlock {
    /// Raw module body text.
    #[serde(default)]
    pub code: String,
    /// Declared module parameters.
    #[serde(default)]
    pub params: Vec<CodeParam>,
    /// Declared module ports.
    #[serde(default)]
    pub ports: CodePorts,
}

/// A declared parameter of a code block.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CodeParam {
    /// Parameter name, used verbatim.
    pub name: String,
    /// Default value; `0` when absent.
    #[serde(default, deserialize_with = "non_empty")]
    pub value: Option<String>,
}

/// Declared port lists of a code block.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CodePorts {
    /// Input ports, in declaration order.
    #[serde(default, rename = "in")]
    pub inputs: Vec<CodePort>,
    /// Output ports, in declaration order.
    #[serde(default, rename = "out")]
    pub outputs: Vec<CodePort>,
}

/// A declared port of a code block.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CodePort {
    /// Port name, used verbatim.
    pub name: String,
    /// Bit range such as `[7:0]`.
    #[serde(default, deserialize_with = "non_empty")]
    pub range: Option<String>,
    /// Default binding for this input when left unconnected.
    #[serde(default)]
    pub default: Option<DefaultDescriptor>,
}

impl CodePort {
    /// Creates a plain single-bit port.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            range: None,
            default: None,
        }
    }
}

/// The on-disk shape of a block before its payload is interpreted.
#[derive(Deserialize)]
struct RawBlock {
    id: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    data: serde_json::Value,
}

impl TryFrom<RawBlock> for Block {
    type Error = GraphError;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        let RawBlock { id, type_name, data } = raw;
        let primitive = type_name.strip_prefix(PRIMITIVE_PREFIX).map(str::to_owned);
        let kind = match primitive.as_deref() {
            None => BlockKind::Generic(type_name),
            Some("input") => BlockKind::Input(payload(&id, data)?),
            Some("output") => BlockKind::Output(payload(&id, data)?),
            Some("constant") => BlockKind::Constant(payload(&id, data)?),
            Some("code") => BlockKind::Code(payload(&id, data)?),
            Some("info") => BlockKind::Info,
            Some(_) => return Err(GraphError::UnknownPrimitive { id, type_name }),
        };
        Ok(Block { id, kind })
    }
}

/// Interprets a block's `data` value, treating a missing payload as empty.
fn payload<T>(id: &str, data: serde_json::Value) -> Result<T, GraphError>
where
    T: for<'de> Deserialize<'de>,
{
    let data = if data.is_null() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        data
    };
    serde_json::from_value(data).map_err(|e| GraphError::InvalidBlockData {
        id: id.to_string(),
        reason: e.to_string(),
    })
}
