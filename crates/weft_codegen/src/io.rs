//! Top-level I/O metadata shared by the testbench and waveform emitters.

use serde::Serialize;
use weft_common::digest_id;
use weft_config::BoardRules;
use weft_graph::{BlockKind, Graph, PortBlock, Project};

use crate::defaults::{prepare_top, top_init_pins};
use crate::error::CodegenResult;
use crate::scope::DependencyScope;
use crate::verilog::{init_range, INIT_PORT};
use crate::CompileOptions;

/// One top-level port as seen from a testbench.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IoSignal {
    /// Digested block id, the port name on the top module.
    pub id: String,
    /// Testbench signal name.
    pub name: String,
    /// Bit range, if any.
    pub range: Option<String>,
}

/// Top-level inputs and outputs, in block order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MainIo {
    /// Input ports.
    pub inputs: Vec<IoSignal>,
    /// Output ports.
    pub outputs: Vec<IoSignal>,
}

/// One top-level module parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MainParam {
    /// Digested block id, the parameter name on the top module.
    pub id: String,
    /// Testbench local parameter name.
    pub name: String,
    /// Value.
    pub value: String,
}

/// Collects the top-level ports.
///
/// Display names have spaces replaced by underscores. Unnamed ports fall
/// back to `input_<n>` / `output_<n>`, numbered from zero per direction.
pub fn main_io(graph: &Graph) -> MainIo {
    let mut io = MainIo::default();
    for block in &graph.blocks {
        match &block.kind {
            BlockKind::Input(data) => {
                let n = io.inputs.len();
                io.inputs.push(signal(&block.id, data, "input", n));
            }
            BlockKind::Output(data) => {
                let n = io.outputs.len();
                io.outputs.push(signal(&block.id, data, "output", n));
            }
            _ => {}
        }
    }
    io
}

/// Collects the ports of the compiled top module.
///
/// Reads the same resolved graph as the Verilog and PCF emitters, so default
/// inputs added for board rules are listed, and the aggregate init port is
/// the last output.
pub fn top_io(project: &Project, options: &CompileOptions, rules: &BoardRules) -> CodegenResult<MainIo> {
    let scope = DependencyScope::root(&project.dependencies);
    let graph = prepare_top(project.graph(), options, &scope)?;
    let mut io = main_io(&graph);
    let pins = top_init_pins(&graph, options, rules);
    if !pins.is_empty() {
        io.outputs.push(IoSignal {
            id: INIT_PORT.to_string(),
            name: INIT_PORT.to_string(),
            range: Some(init_range(pins.len())),
        });
    }
    Ok(io)
}

/// Collects the top-level module parameters (non-local constants).
///
/// Testbench names carry a `constant_` prefix so they never clash with port
/// names.
pub fn main_params(graph: &Graph) -> Vec<MainParam> {
    let mut params = Vec::new();
    for block in &graph.blocks {
        if let BlockKind::Constant(c) = &block.kind {
            if c.local {
                continue;
            }
            let name = match display_name(c.name.as_deref()) {
                Some(name) => format!("constant_{name}"),
                None => format!("constant_{}", params.len()),
            };
            params.push(MainParam {
                id: digest_id(&block.id),
                name,
                value: c.value.clone(),
            });
        }
    }
    params
}

fn signal(id: &str, data: &PortBlock, fallback: &str, n: usize) -> IoSignal {
    IoSignal {
        id: digest_id(id),
        name: display_name(data.name.as_deref()).unwrap_or_else(|| format!("{fallback}_{n}")),
        range: data.range.clone(),
    }
}

fn display_name(name: Option<&str>) -> Option<String> {
    name.filter(|n| !n.is_empty()).map(|n| n.replace(' ', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_config::OutputRule;
    use weft_graph::{Block, CodeBlock, CodePort, ConstantBlock, DefaultDescriptor};

    #[test]
    fn names_ranges_and_fallbacks() {
        let mut bus = PortBlock::on_pin("data bus", "1");
        bus.range = Some("[7:0]".into());
        let mut unnamed = PortBlock::on_pin("", "2");
        unnamed.name = None;
        unnamed.range = Some("[1:0]".into());
        let g = Graph {
            blocks: vec![
                Block::new("a", BlockKind::Input(bus)),
                Block::new("b", BlockKind::Input(unnamed.clone())),
                Block::new("c", BlockKind::Output(unnamed)),
            ],
            wires: vec![],
        };
        let io = main_io(&g);
        assert_eq!(io.inputs[0].name, "data_bus");
        assert_eq!(io.inputs[0].range.as_deref(), Some("[7:0]"));
        assert_eq!(io.inputs[1].name, "input_1");
        assert_eq!(io.inputs[1].range.as_deref(), Some("[1:0]"));
        assert_eq!(io.outputs[0].name, "output_0");
        assert_eq!(io.outputs[0].id, "vc");
    }

    #[test]
    fn params_skip_local_and_fallback() {
        let constant = |name: Option<&str>, local: bool| {
            BlockKind::Constant(ConstantBlock {
                name: name.map(str::to_string),
                value: "3".into(),
                local,
            })
        };
        let g = Graph {
            blocks: vec![
                Block::new("k", constant(Some("max count"), false)),
                Block::new("l", constant(Some("hidden"), true)),
                Block::new("m", constant(None, false)),
            ],
            wires: vec![],
        };
        let params = main_params(&g);
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "constant_max_count");
        assert_eq!(params[0].id, "vk");
        assert_eq!(params[1].name, "constant_1");
    }

    fn clocked_code_block() -> Block {
        let mut clk = CodePort::new("clk");
        clk.default = Some(DefaultDescriptor {
            port: "clk".into(),
            pin: "21".into(),
            apply: true,
        });
        let mut code = CodeBlock::default();
        code.ports.inputs.push(clk);
        Block::new("c", BlockKind::Code(code))
    }

    #[test]
    fn top_io_follows_board_defaults() {
        let p = Project::from_graph(Graph {
            blocks: vec![
                Block::new("o", BlockKind::Output(PortBlock::on_pin("led", "95"))),
                clocked_code_block(),
            ],
            wires: vec![],
        });
        let rules = BoardRules {
            output: vec![
                OutputRule { pin: "95".into(), bit: "0".into() },
                OutputRule { pin: "96".into(), bit: "1".into() },
            ],
            input: vec![],
        };

        let plain = top_io(&p, &CompileOptions::default(), &rules).unwrap();
        assert!(plain.inputs.is_empty());
        assert_eq!(plain.outputs.len(), 1);

        let io = top_io(&p, &CompileOptions::with_board_rules(), &rules).unwrap();
        assert_eq!(io.inputs.len(), 1);
        assert_eq!(io.inputs[0].id, "vclk");
        assert_eq!(io.inputs[0].name, "clk");
        let init = io.outputs.last().unwrap();
        assert_eq!(init.id, "vinit");
        assert_eq!(init.range.as_deref(), Some("[0:0]"));
    }

    #[test]
    fn constant_and_port_sharing_a_name_stay_distinct() {
        let g = Graph {
            blocks: vec![
                Block::new(
                    "k",
                    BlockKind::Constant(ConstantBlock {
                        name: Some("led".into()),
                        value: "1".into(),
                        local: false,
                    }),
                ),
                Block::new("o", BlockKind::Output(PortBlock::on_pin("led", "95"))),
            ],
            wires: vec![],
        };
        let params = main_params(&g);
        let io = main_io(&g);
        assert_eq!(params[0].name, "constant_led");
        assert_eq!(io.outputs[0].name, "led");
    }
}
