//! Flattens a project into Verilog modules.
//!
//! The output is the top module, then one module per sub-circuit type
//! (depth first, in dependency-map order), then one module per inline code
//! block. Each module name is emitted once.

use std::collections::HashSet;

use weft_common::digest_id;
use weft_config::{BoardRules, OutputRule};
use weft_graph::{BlockKind, CodeBlock, Graph, Project};

use crate::analyze::{module_body, module_params, module_ports};
use crate::defaults::{prepare_top, top_init_pins};
use crate::error::{CodegenError, CodegenResult};
use crate::instance::code_module_name;
use crate::module::{render_module, ModuleDescriptor, Param, PortDecl, PortList};
use crate::scope::DependencyScope;
use crate::CompileOptions;

/// Name of the top-level module.
pub const TOP_MODULE: &str = "main";

/// Aggregate output port driving unused board pins to their fixed level.
pub const INIT_PORT: &str = "vinit";

/// Renders every module of `project`.
pub fn compile_verilog(
    project: &Project,
    options: &CompileOptions,
    rules: &BoardRules,
) -> CodegenResult<String> {
    let scope = DependencyScope::root(&project.dependencies);
    let mut flattener = Flattener::default();
    flattener.top(project, options, rules, &scope)?;
    flattener.dependencies(project, &scope)?;
    flattener.code_blocks(TOP_MODULE, project.graph());
    Ok(flattener.out)
}

#[derive(Default)]
struct Flattener<'p> {
    emitted: HashSet<String>,
    stack: Vec<&'p str>,
    out: String,
}

impl<'p> Flattener<'p> {
    fn emit(&mut self, module: ModuleDescriptor) {
        if self.emitted.insert(module.name.clone()) {
            log::debug!("rendering module {}", module.name);
            self.out.push_str(&render_module(&module));
        }
    }

    fn top(
        &mut self,
        project: &Project,
        options: &CompileOptions,
        rules: &BoardRules,
        scope: &DependencyScope<'_>,
    ) -> CodegenResult<()> {
        if project.graph().is_empty() {
            log::warn!("compiling an empty design");
        }
        let graph = prepare_top(project.graph(), options, scope)?;
        let mut ports = module_ports(&graph);
        let mut body = module_body(TOP_MODULE, &graph, scope)?;

        let pins = top_init_pins(&graph, options, rules);
        if !pins.is_empty() {
            for pin in &pins {
                log::debug!("driving unused board pin {} to {}", pin.pin, pin.bit);
            }
            ports
                .outputs
                .push(PortDecl::new(INIT_PORT, Some(init_range(pins.len()))));
            body.push(init_assignment(&pins));
        }

        self.emit(ModuleDescriptor {
            name: TOP_MODULE.to_string(),
            params: module_params(&graph),
            ports,
            body: body.join("\n"),
        });
        Ok(())
    }

    fn dependencies(&mut self, project: &'p Project, scope: &DependencyScope<'_>) -> CodegenResult<()> {
        for (type_name, dep) in &project.dependencies {
            self.dependency(type_name, dep, scope)?;
        }
        Ok(())
    }

    fn dependency(
        &mut self,
        type_name: &'p str,
        dep: &'p Project,
        scope: &DependencyScope<'_>,
    ) -> CodegenResult<()> {
        if self.stack.contains(&type_name) {
            return Err(CodegenError::DependencyCycle(type_name.to_string()));
        }
        let name = digest_id(type_name);
        if self.emitted.contains(&name) {
            return Ok(());
        }

        let inner = scope.nested(&dep.dependencies);
        let graph = dep.graph();
        let body = module_body(&name, graph, &inner)?;
        self.emit(ModuleDescriptor {
            name: name.clone(),
            params: module_params(graph),
            ports: module_ports(graph),
            body: body.join("\n"),
        });

        self.stack.push(type_name);
        self.dependencies(dep, &inner)?;
        self.stack.pop();

        self.code_blocks(&name, graph);
        Ok(())
    }

    fn code_blocks(&mut self, parent: &str, graph: &Graph) {
        for block in &graph.blocks {
            if let BlockKind::Code(code) = &block.kind {
                self.emit(code_module(code_module_name(parent, &block.id), code));
            }
        }
    }
}

/// Bit range of the aggregate init port for `n` pins, `n > 0`.
pub fn init_range(n: usize) -> String {
    format!("[0:{}]", n.saturating_sub(1))
}

fn init_assignment(pins: &[OutputRule]) -> String {
    let bits: String = pins.iter().map(|p| p.bit.as_str()).collect();
    format!("assign {INIT_PORT} = {}'b{bits};", pins.len())
}

/// Builds the module synthesized for an inline code block.
pub fn code_module(name: String, code: &CodeBlock) -> ModuleDescriptor {
    let decl = |p: &weft_graph::CodePort| PortDecl::new(p.name.clone(), p.range.clone());
    ModuleDescriptor {
        name,
        params: code
            .params
            .iter()
            .map(|p| Param::new(p.name.clone(), p.value.clone()))
            .collect(),
        ports: PortList {
            inputs: code.ports.inputs.iter().map(decl).collect(),
            outputs: code.ports.outputs.iter().map(decl).collect(),
        },
        body: collapse_newlines(&code.code),
    }
}

/// Collapses runs of newlines and drops one trailing newline.
fn collapse_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_newline = false;
    for c in text.chars() {
        if c == '\n' && prev_newline {
            continue;
        }
        prev_newline = c == '\n';
        out.push(c);
    }
    if out.ends_with('\n') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_graph::{
        Block, CodeParam, CodePort, DefaultDescriptor, Dependencies, Endpoint, PortBlock, Wire,
    };

    fn compile(project: &Project) -> String {
        compile_verilog(project, &CompileOptions::default(), &BoardRules::default()).unwrap()
    }

    fn project(blocks: Vec<Block>, wires: Vec<Wire>) -> Project {
        Project::from_graph(Graph { blocks, wires })
    }

    #[test]
    fn empty_design_is_bare_main() {
        assert_eq!(compile(&Project::default()), "\nmodule main;\n\nendmodule\n");
    }

    #[test]
    fn round_trip_input_to_output() {
        let p = project(
            vec![
                Block::new("a", BlockKind::Input(PortBlock::on_pin("a", "2"))),
                Block::new("b", BlockKind::Output(PortBlock::on_pin("b", "3"))),
            ],
            vec![Wire::new(Endpoint::new("a", "out"), Endpoint::new("b", "in"))],
        );
        let text = compile(&p);
        assert_eq!(
            text,
            "\nmodule main (\n input va,\n output vb\n);\n wire w0;\n assign w0 = va;\n assign vb = w0;\nendmodule\n"
        );
    }

    #[test]
    fn collapse_blank_lines() {
        assert_eq!(collapse_newlines("a\n\n\nb\n\n"), "a\nb");
        assert_eq!(collapse_newlines("x"), "x");
        assert_eq!(collapse_newlines(""), "");
    }

    #[test]
    fn code_block_module_follows_top() {
        let code = CodeBlock {
            code: "assign q = d;\n\n".into(),
            params: vec![CodeParam {
                name: "W".into(),
                value: Some("8".into()),
            }],
            ports: weft_graph::CodePorts {
                inputs: vec![CodePort::new("d")],
                outputs: vec![CodePort::new("q")],
            },
        };
        let p = project(vec![Block::new("c", BlockKind::Code(code))], vec![]);
        let text = compile(&p);
        let top = text.find("module main;").unwrap();
        let sub = text
            .find("module main_vc #(\n parameter W = 8\n) (\n input d,\n output q\n);\n assign q = d;\nendmodule\n")
            .unwrap();
        assert!(top < sub);
        assert!(text.contains(" main_vc vc ();"));
    }

    #[test]
    fn dependencies_rendered_once_in_order() {
        let leaf = project(vec![], vec![]);
        let mut mid = project(
            vec![Block::new("l", BlockKind::Generic("leaf".into()))],
            vec![],
        );
        mid.dependencies.insert("leaf".into(), leaf.clone());

        let mut top = project(
            vec![
                Block::new("m", BlockKind::Generic("mid".into())),
                Block::new("l", BlockKind::Generic("leaf".into())),
            ],
            vec![],
        );
        top.dependencies.insert("mid".into(), mid);
        top.dependencies.insert("leaf".into(), leaf);

        let text = compile(&top);
        assert_eq!(text.matches("module vleaf;").count(), 1);
        let main = text.find("module main").unwrap();
        let mid_at = text.find("module vmid").unwrap();
        let leaf_at = text.find("module vleaf").unwrap();
        assert!(main < mid_at && mid_at < leaf_at);
    }

    #[test]
    fn nested_scope_resolves_outer_types() {
        let mut top = project(
            vec![Block::new("m", BlockKind::Generic("mid".into()))],
            vec![],
        );
        top.dependencies.insert(
            "mid".into(),
            project(vec![Block::new("l", BlockKind::Generic("leaf".into()))], vec![]),
        );
        top.dependencies.insert("leaf".into(), Project::default());
        assert!(compile(&top).contains(" vleaf vl ();"));
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let mut inner = Project::default();
        inner.dependencies.insert("loop".into(), Project::default());
        let mut top = Project::default();
        top.dependencies.insert("loop".into(), inner);
        let err = compile_verilog(&top, &CompileOptions::default(), &BoardRules::default())
            .unwrap_err();
        assert!(matches!(err, CodegenError::DependencyCycle(t) if t == "loop"));
    }

    #[test]
    fn missing_dependency_is_an_error() {
        let p = project(
            vec![Block::new("g", BlockKind::Generic("ghost".into()))],
            vec![],
        );
        let err = compile_verilog(&p, &CompileOptions::default(), &BoardRules::default())
            .unwrap_err();
        assert!(matches!(err, CodegenError::MissingDependency { .. }));
    }

    #[test]
    fn board_rules_add_defaults_and_init_port() {
        let mut port = CodePort::new("clock");
        port.default = Some(DefaultDescriptor {
            port: "clk".into(),
            pin: "21".into(),
            apply: true,
        });
        let mut code = CodeBlock::default();
        code.ports.inputs.push(port);
        let p = project(vec![Block::new("c", BlockKind::Code(code))], vec![]);
        let rules = BoardRules {
            output: vec![
                OutputRule { pin: "95".into(), bit: "0".into() },
                OutputRule { pin: "96".into(), bit: "1".into() },
            ],
            input: vec![],
        };
        let text = compile_verilog(&p, &CompileOptions::with_board_rules(), &rules).unwrap();
        assert!(text.contains(" input vclk,\n output [0:1] vinit\n"));
        assert!(text.contains(" assign w0 = vclk;"));
        assert!(text.contains(" assign vinit = 2'b01;"));
        assert!(text.contains(" .clock(w0)"));

        let plain = compile_verilog(&p, &CompileOptions::default(), &rules).unwrap();
        assert!(!plain.contains("vinit"));
        assert!(!plain.contains("vclk"));
    }

    #[test]
    fn sub_modules_skip_board_defaults() {
        let mut sub_clk = PortBlock::on_pin("clk", "");
        sub_clk.default = Some(DefaultDescriptor {
            port: "clk".into(),
            pin: "21".into(),
            apply: true,
        });
        let sub = project(vec![Block::new("k", BlockKind::Input(sub_clk))], vec![]);
        let mut deps = Dependencies::new();
        deps.insert("timer".into(), sub);
        let top = Project {
            design: weft_graph::Design {
                board: None,
                graph: Graph {
                    blocks: vec![Block::new("t", BlockKind::Generic("timer".into()))],
                    wires: vec![],
                },
            },
            dependencies: deps,
        };
        let text =
            compile_verilog(&top, &CompileOptions::with_board_rules(), &BoardRules::default()).unwrap();
        let timer = &text[text.find("module vtimer").unwrap()..];
        assert!(!timer.contains("wire"));
        assert!(text.contains(" .vk(w0)"));
    }
}
