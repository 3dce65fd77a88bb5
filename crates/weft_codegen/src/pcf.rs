//! Physical constraint file (PCF) emission.

use weft_common::digest_id;
use weft_config::BoardRules;
use weft_graph::{Block, BlockKind, Project};

use crate::defaults::{prepare_top, top_init_pins};
use crate::error::CodegenResult;
use crate::scope::DependencyScope;
use crate::verilog::INIT_PORT;
use crate::CompileOptions;

/// Renders one `set_io` line per top-level port pin.
///
/// With board rules enabled, default inputs that had to be added and the
/// bits of the aggregate init port are bound as well.
pub fn compile_pcf(
    project: &Project,
    options: &CompileOptions,
    rules: &BoardRules,
) -> CodegenResult<String> {
    let scope = DependencyScope::root(&project.dependencies);
    let graph = prepare_top(project.graph(), options, &scope)?;

    let mut code = String::new();
    for block in &graph.blocks {
        push_block(&mut code, block);
    }

    let pins = top_init_pins(&graph, options, rules);
    if let [pin] = pins.as_slice() {
        code.push_str(&format!("set_io {INIT_PORT} {}\n", pin.pin));
    } else {
        for (i, pin) in pins.iter().enumerate() {
            code.push_str(&format!("set_io {INIT_PORT}[{i}] {}\n", pin.pin));
        }
    }
    Ok(code)
}

fn push_block(code: &mut String, block: &Block) {
    let data = match &block.kind {
        BlockKind::Input(data) | BlockKind::Output(data) => data,
        _ => return,
    };
    let name = digest_id(&block.id);
    let value = |v: &str| if data.is_virtual { String::new() } else { v.to_string() };
    if let [pin] = data.pins.as_slice() {
        code.push_str(&format!("set_io {name} {}\n", value(&pin.value)));
    } else {
        for pin in &data.pins {
            code.push_str(&format!("set_io {name}[{}] {}\n", pin.index, value(&pin.value)));
        }
    }
}
