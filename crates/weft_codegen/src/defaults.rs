//! Board-default initialization of the top-level graph.
//!
//! Two discoveries feed it. Code and generic blocks may declare input ports
//! with a default binding to a board pin (a clock, a reset button); any such
//! port left unconnected is wired to an `Input` block on that pin. Board
//! output pins that no `Output` block claims are driven to their fixed level
//! through one aggregate output port.
//!
//! Resolution returns a new graph and never touches the caller's, so applying
//! it to an already-resolved graph is a no-op.

use std::borrow::Cow;
use std::collections::HashSet;

use serde::Serialize;
use weft_config::{BoardRules, OutputRule};
use weft_graph::{Block, BlockKind, Endpoint, Graph, PortBlock, Wire};

use crate::error::CodegenResult;
use crate::scope::DependencyScope;
use crate::CompileOptions;

/// Output port of a synthesized default input block.
const SOURCE_PORT: &str = "out";

/// An input port that wants a board default when left unconnected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitPort {
    /// Block owning the port.
    pub block: String,
    /// Port on that block.
    pub port: String,
    /// Name of the default input signal.
    pub name: String,
    /// Physical pin of the default input.
    pub pin: String,
}

/// How one [`InitPort`] was satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefaultBinding {
    /// The port that was bound.
    pub port: InitPort,
    /// Id of the `Input` block now driving it.
    pub source: String,
    /// `true` if the source block was added by resolution.
    pub synthesized: bool,
}

/// A graph with its default inputs wired up.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedGraph {
    /// The resolved graph.
    pub graph: Graph,
    /// Bindings applied, in discovery order.
    pub bindings: Vec<DefaultBinding>,
}

/// Lists the default-bound input ports of code blocks and generic blocks.
///
/// Generic blocks are inspected one level deep: the `Input` blocks of their
/// sub-circuit that carry an applied default.
pub fn find_init_ports(graph: &Graph, scope: &DependencyScope<'_>) -> CodegenResult<Vec<InitPort>> {
    let mut ports = Vec::new();
    for block in &graph.blocks {
        match &block.kind {
            BlockKind::Code(code) => {
                for port in &code.ports.inputs {
                    if let Some(default) = port.default.as_ref().filter(|d| d.apply) {
                        ports.push(InitPort {
                            block: block.id.clone(),
                            port: port.name.clone(),
                            name: default.port.clone(),
                            pin: default.pin.clone(),
                        });
                    }
                }
            }
            BlockKind::Generic(type_name) => {
                let dep = scope.require(&block.id, type_name)?;
                for sub in &dep.graph().blocks {
                    let default = sub
                        .as_input()
                        .and_then(|data| data.default.as_ref())
                        .filter(|d| d.apply);
                    if let Some(default) = default {
                        ports.push(InitPort {
                            block: block.id.clone(),
                            port: sub.id.clone(),
                            name: default.port.clone(),
                            pin: default.pin.clone(),
                        });
                    }
                }
            }
            _ => {}
        }
    }
    Ok(ports)
}

/// Lists the board output rules whose pin no `Output` block uses.
///
/// Virtual outputs claim no pin.
pub fn find_init_pins(graph: &Graph, rules: &BoardRules) -> Vec<OutputRule> {
    let used: HashSet<&str> = graph
        .blocks
        .iter()
        .filter_map(|b| b.as_output())
        .filter(|data| !data.is_virtual)
        .flat_map(|data| data.pins.iter().map(|p| p.value.as_str()))
        .collect();
    rules
        .output
        .iter()
        .filter(|rule| !used.contains(rule.pin.as_str()))
        .cloned()
        .collect()
}

/// Returns `true` if `block` is a plain single-bit physical input on `pin`.
pub fn is_pin_source(block: &Block, pin: &str) -> bool {
    block
        .as_input()
        .is_some_and(|data| data.range.is_none() && !data.is_virtual && data.sole_pin() == Some(pin))
}

/// Finds the first `Input` block that can act as the default source for `pin`.
pub fn pin_source<'g>(graph: &'g Graph, pin: &str) -> Option<&'g Block> {
    let mut candidates = graph.blocks.iter().filter(|b| is_pin_source(b, pin));
    let first = candidates.next()?;
    let dropped: Vec<&str> = candidates.map(|b| b.id.as_str()).collect();
    if !dropped.is_empty() {
        log::warn!(
            "pin {pin} is claimed by several inputs; using '{}', ignoring {dropped:?}",
            first.id
        );
    }
    Some(first)
}

/// Wires every unconnected [`InitPort`] to an input on its default pin.
///
/// An existing input on the pin is reused; otherwise an `Input` block named
/// after the default is added. Ports that some wire already drives are left
/// alone.
pub fn apply_default_bindings(graph: &Graph, ports: &[InitPort]) -> ResolvedGraph {
    let mut graph = graph.clone();
    let mut bindings = Vec::new();

    for port in ports {
        if graph.is_driven(&port.block, &port.port) {
            log::debug!("{}.{} is already connected", port.block, port.port);
            continue;
        }

        let (source, synthesized) = match pin_source(&graph, &port.pin) {
            Some(block) => (block.id.clone(), false),
            None => {
                let id = unique_block_id(&graph, &port.name);
                graph.blocks.push(Block::new(
                    id.clone(),
                    BlockKind::Input(PortBlock::on_pin(port.name.clone(), port.pin.clone())),
                ));
                (id, true)
            }
        };
        log::debug!(
            "{}.{} <- '{source}' on pin {} ({})",
            port.block,
            port.port,
            port.pin,
            if synthesized { "added" } else { "reused" }
        );

        graph.wires.push(Wire::new(
            Endpoint::new(source.clone(), SOURCE_PORT),
            Endpoint::new(port.block.clone(), port.port.clone()),
        ));
        bindings.push(DefaultBinding {
            port: port.clone(),
            source,
            synthesized,
        });
    }

    ResolvedGraph { graph, bindings }
}

fn unique_block_id(graph: &Graph, name: &str) -> String {
    let mut id = name.to_string();
    let mut n = 1;
    while graph.block(&id).is_some() {
        id = format!("{name}_{n}");
        n += 1;
    }
    id
}

/// Returns the top-level graph to compile: resolved when board rules are
/// enabled, borrowed unchanged otherwise.
pub fn prepare_top<'g>(
    graph: &'g Graph,
    options: &CompileOptions,
    scope: &DependencyScope<'_>,
) -> CodegenResult<Cow<'g, Graph>> {
    if !options.board_rules {
        return Ok(Cow::Borrowed(graph));
    }
    let ports = match &options.init_ports {
        Some(ports) => ports.clone(),
        None => find_init_ports(graph, scope)?,
    };
    if ports.is_empty() {
        return Ok(Cow::Borrowed(graph));
    }
    Ok(Cow::Owned(apply_default_bindings(graph, &ports).graph))
}

/// Returns the unused board output pins, unless board rules are disabled.
pub fn top_init_pins(graph: &Graph, options: &CompileOptions, rules: &BoardRules) -> Vec<OutputRule> {
    if !options.board_rules {
        return Vec::new();
    }
    match &options.init_pins {
        Some(pins) => pins.clone(),
        None => find_init_pins(graph, rules),
    }
}
