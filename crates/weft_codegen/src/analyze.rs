//! Derives a module's parameters, ports and body from a circuit graph.
//!
//! Every wire is named after its position in the wire sequence: `w<idx>` for
//! signals and `p<idx>` for parameter feeds. Emission order is fixed
//! (local constants, declarations, port assignments, fan-out aliases,
//! instances), so the same graph always renders to the same text.

use std::collections::HashMap;

use weft_common::digest_id;
use weft_graph::{BlockKind, Endpoint, Graph};

use crate::error::CodegenResult;
use crate::instance::instances;
use crate::module::{Param, PortDecl, PortList};
use crate::scope::DependencyScope;

/// Non-local constants become module parameters, named by digested id.
pub fn module_params(graph: &Graph) -> Vec<Param> {
    graph
        .blocks
        .iter()
        .filter_map(|b| match &b.kind {
            BlockKind::Constant(c) if !c.local => {
                Some(Param::new(digest_id(&b.id), Some(c.value.clone())))
            }
            _ => None,
        })
        .collect()
}

/// `Input` and `Output` blocks become ports, named by digested id.
pub fn module_ports(graph: &Graph) -> PortList {
    let mut ports = PortList::default();
    for block in &graph.blocks {
        match &block.kind {
            BlockKind::Input(data) => ports
                .inputs
                .push(PortDecl::new(digest_id(&block.id), data.range.clone())),
            BlockKind::Output(data) => ports
                .outputs
                .push(PortDecl::new(digest_id(&block.id), data.range.clone())),
            _ => {}
        }
    }
    ports
}

/// For each wire, the index of the earliest signal wire sharing its source.
///
/// Parameter-feed wires map to themselves.
pub fn fan_out_roots(graph: &Graph) -> Vec<usize> {
    let mut first: HashMap<&Endpoint, usize> = HashMap::new();
    graph
        .wires
        .iter()
        .enumerate()
        .map(|(idx, wire)| {
            if wire.is_param_feed() {
                idx
            } else {
                *first.entry(&wire.source).or_insert(idx)
            }
        })
        .collect()
}

/// Builds the body lines of the module `name` rendered from `graph`.
pub fn module_body(
    name: &str,
    graph: &Graph,
    scope: &DependencyScope<'_>,
) -> CodegenResult<Vec<String>> {
    let mut locals = Vec::new();
    let mut decls = Vec::new();

    for block in &graph.blocks {
        if let BlockKind::Constant(c) = &block.kind {
            if c.local {
                locals.push(format!("localparam {} = {};", digest_id(&block.id), c.value));
            }
        }
    }

    for (idx, wire) in graph.wires.iter().enumerate() {
        if wire.is_param_feed() {
            locals.push(format!("localparam p{idx} = {};", digest_id(&wire.source.block)));
        } else {
            decls.push(match wire.bus_width() {
                Some(width) => format!("wire [0:{}] w{idx};", width - 1),
                None => format!("wire w{idx};"),
            });
        }
    }

    let roots = fan_out_roots(graph);

    let mut assigns = Vec::new();
    for (idx, wire) in graph.wires.iter().enumerate() {
        for block in &graph.blocks {
            match &block.kind {
                BlockKind::Input(_) if wire.source.block == block.id && roots[idx] == idx => {
                    assigns.push(format!("assign w{idx} = {};", digest_id(&block.id)));
                }
                BlockKind::Output(_) if wire.target.block == block.id => {
                    let signal = if wire.is_param_feed() { 'p' } else { 'w' };
                    assigns.push(format!("assign {} = {signal}{idx};", digest_id(&block.id)));
                }
                _ => {}
            }
        }
    }

    let aliases = roots
        .iter()
        .enumerate()
        .filter(|(idx, root)| *idx != **root)
        .map(|(idx, root)| format!("assign w{idx} = w{root};"));

    let mut body = locals;
    body.extend(decls);
    body.extend(assigns);
    body.extend(aliases);
    body.extend(instances(name, graph, scope)?);
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;
    use weft_graph::{Block, ConstantBlock, Dependencies, PortBlock, Wire};

    fn input(id: &str, pin: &str) -> Block {
        Block::new(id, BlockKind::Input(PortBlock::on_pin(id, pin)))
    }

    fn output(id: &str, pin: &str) -> Block {
        Block::new(id, BlockKind::Output(PortBlock::on_pin(id, pin)))
    }

    fn constant(id: &str, value: &str, local: bool) -> Block {
        Block::new(
            id,
            BlockKind::Constant(ConstantBlock {
                name: None,
                value: value.into(),
                local,
            }),
        )
    }

    fn wire(from: (&str, &str), to: (&str, &str)) -> Wire {
        Wire::new(Endpoint::new(from.0, from.1), Endpoint::new(to.0, to.1))
    }

    fn body(graph: &Graph) -> Vec<String> {
        let deps = Dependencies::new();
        module_body("main", graph, &DependencyScope::root(&deps)).unwrap()
    }

    #[test]
    fn input_to_output() {
        let g = Graph {
            blocks: vec![input("a", "2"), output("b", "3")],
            wires: vec![wire(("a", "out"), ("b", "in"))],
        };
        assert_eq!(
            body(&g),
            vec!["wire w0;", "assign w0 = va;", "assign vb = w0;"]
        );
        let ports = module_ports(&g);
        assert_eq!(ports.inputs, vec![PortDecl::new("va", None)]);
        assert_eq!(ports.outputs, vec![PortDecl::new("vb", None)]);
    }

    #[test]
    fn sized_wire_declaration() {
        let g = Graph {
            blocks: vec![],
            wires: vec![wire(("x", "q"), ("y", "d")).with_size(4)],
        };
        assert_eq!(body(&g), vec!["wire [0:3] w0;"]);
    }

    #[test]
    fn params_skip_local_constants() {
        let g = Graph {
            blocks: vec![constant("k", "5", false), constant("l", "7", true)],
            wires: vec![],
        };
        assert_eq!(module_params(&g), vec![Param::new("vk", Some("5".into()))]);
        assert_eq!(body(&g), vec!["localparam vl = 7;"]);
    }

    #[test]
    fn param_feed_to_output() {
        let g = Graph {
            blocks: vec![constant("k", "1", false), output("o", "4")],
            wires: vec![wire(("k", "constant-out"), ("o", "in"))],
        };
        assert_eq!(body(&g), vec!["localparam p0 = vk;", "assign vo = p0;"]);
    }

    #[test]
    fn fan_out_aliases_earliest_wire() {
        let g = Graph {
            blocks: vec![input("a", "1"), output("x", "2"), output("y", "3"), output("z", "4")],
            wires: vec![
                wire(("a", "out"), ("x", "in")),
                wire(("a", "out"), ("y", "in")),
                wire(("a", "out"), ("z", "in")),
            ],
        };
        let lines = body(&g);
        assert_eq!(lines.iter().filter(|l| l.starts_with("assign w0 = va")).count(), 1);
        assert!(!lines.iter().any(|l| l.starts_with("assign w1 = va")));
        assert!(lines.contains(&"assign w1 = w0;".to_string()));
        assert!(lines.contains(&"assign w2 = w0;".to_string()));
        assert!(!lines.contains(&"assign w2 = w1;".to_string()));
    }

    #[test]
    fn roots_ignore_param_feeds() {
        let g = Graph {
            blocks: vec![],
            wires: vec![
                wire(("k", "constant-out"), ("g", "a")),
                wire(("k", "constant-out"), ("g", "b")),
            ],
        };
        assert_eq!(fan_out_roots(&g), vec![0, 1]);
    }

    fn arb_wires() -> impl Strategy<Value = Vec<Wire>> {
        let source = (0u8..4, prop::bool::weighted(0.2));
        prop::collection::vec((source, 0u8..6), 0..12).prop_map(|specs| {
            specs
                .into_iter()
                .map(|((src, feed), dst)| {
                    let port = if feed { "constant-out" } else { "out" };
                    wire(
                        (format!("s{src}").as_str(), port),
                        (format!("t{dst}").as_str(), "in"),
                    )
                })
                .collect()
        })
    }

    proptest! {
        /// Wires are declared per wire, not per source. Each one has exactly one
        /// driver, and fan-out groups map onto one root per distinct source.
        #[test]
        fn one_driver_per_wire_and_one_root_per_source(wires in arb_wires()) {
            let mut blocks: Vec<Block> = (0..4).map(|i| input(&format!("s{i}"), "1")).collect();
            blocks.extend((0..6).map(|i| output(&format!("t{i}"), "2")));
            let g = Graph { blocks, wires };
            let lines = body(&g);

            let signal_wires: Vec<usize> = g
                .wires
                .iter()
                .enumerate()
                .filter(|(_, w)| !w.is_param_feed())
                .map(|(i, _)| i)
                .collect();
            let decls: Vec<&String> = lines.iter().filter(|l| l.starts_with("wire ")).collect();
            prop_assert_eq!(decls.len(), signal_wires.len());
            let unique: HashSet<&&String> = decls.iter().collect();
            prop_assert_eq!(unique.len(), decls.len());

            for idx in signal_wires {
                let lhs = format!("assign w{idx} = ");
                let drivers = lines.iter().filter(|l| l.starts_with(&lhs)).count();
                prop_assert_eq!(drivers, 1);
            }

            let sources: HashSet<&Endpoint> = g
                .wires
                .iter()
                .filter(|w| !w.is_param_feed())
                .map(|w| &w.source)
                .collect();
            let roots = fan_out_roots(&g);
            let distinct_roots: HashSet<usize> = roots
                .iter()
                .enumerate()
                .filter(|(i, _)| !g.wires[*i].is_param_feed())
                .map(|(_, r)| *r)
                .collect();
            prop_assert_eq!(distinct_roots.len(), sources.len());
        }
    }
}
