//! Instantiation statements for code blocks and generic sub-circuits.

use std::collections::HashSet;

use weft_common::digest_id;
use weft_graph::{Block, BlockKind, Graph};

use crate::error::CodegenResult;
use crate::scope::DependencyScope;

/// Name of the module synthesized for an inline code block inside `parent`.
pub fn code_module_name(parent: &str, block_id: &str) -> String {
    format!("{parent}_{}", digest_id(block_id))
}

/// Renders one instantiation per code or generic block of `graph`, in block order.
///
/// `parent` is the name of the module being rendered. Generic blocks must
/// resolve through `scope`.
pub fn instances(parent: &str, graph: &Graph, scope: &DependencyScope<'_>) -> CodegenResult<Vec<String>> {
    let mut out = Vec::new();
    for block in graph.blocks.iter().filter(|b| b.is_instance()) {
        if let Some(text) = instance(parent, block, graph, scope)? {
            out.push(text);
        }
    }
    Ok(out)
}

fn instance(
    parent: &str,
    block: &Block,
    graph: &Graph,
    scope: &DependencyScope<'_>,
) -> CodegenResult<Option<String>> {
    // Code block port names are user-written Verilog identifiers.
    let (module, verbatim) = match &block.kind {
        BlockKind::Code(_) => (code_module_name(parent, &block.id), true),
        BlockKind::Generic(type_name) => {
            scope.require(&block.id, type_name)?;
            (digest_id(type_name), false)
        }
        _ => return Ok(None),
    };
    let port_name = |port: &str| {
        if verbatim {
            port.to_string()
        } else {
            digest_id(port)
        }
    };

    let params: Vec<String> = graph
        .wires
        .iter()
        .enumerate()
        .filter(|(_, w)| w.target.block == block.id && w.is_param_feed())
        .map(|(idx, w)| format!(" .{}(p{idx})", port_name(&w.target.port)))
        .collect();

    let mut bound = HashSet::new();
    let mut ports = Vec::new();
    for (idx, wire) in graph.wires.iter().enumerate() {
        let mut connect = |port: &str| {
            if !port.is_empty() && bound.insert(port.to_string()) {
                ports.push(format!(" .{}(w{idx})", port_name(port)));
            }
        };
        if wire.source.block == block.id {
            connect(&wire.source.port);
        }
        if wire.target.block == block.id && !wire.is_param_feed() {
            connect(&wire.target.port);
        }
    }

    let mut text = module;
    if !params.is_empty() {
        text.push_str(" #(\n");
        text.push_str(&params.join(",\n"));
        text.push_str("\n)");
    }
    text.push(' ');
    text.push_str(&digest_id(&block.id));
    if ports.is_empty() {
        text.push_str(" ()");
    } else {
        text.push_str(" (\n");
        text.push_str(&ports.join(",\n"));
        text.push_str("\n)");
    }
    text.push(';');
    Ok(Some(text))
}
