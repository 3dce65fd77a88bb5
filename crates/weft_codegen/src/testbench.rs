//! Simulation testbench template around the top module.

use weft_config::BoardRules;
use weft_graph::Project;

use crate::error::CodegenResult;
use crate::io::{main_params, top_io, IoSignal};
use crate::module::{render_module, ModuleDescriptor};
use crate::verilog::TOP_MODULE;
use crate::CompileOptions;

/// Name of the testbench module.
pub const TESTBENCH_MODULE: &str = "main_tb";

/// Instance name of the top module inside the testbench.
pub const TOP_INSTANCE: &str = "MAIN";

/// Input name that gets a free-running clock.
pub const CLOCK_NAME: &str = "clk";

/// Simulated time in timescale units.
pub const DURATION: u32 = 10;

const HEADER: &str = "// Testbench template\n\n`default_nettype none\n`define DUMPSTR(x) `\"x.vcd`\"\n`timescale 10 ns / 1 ns\n\n";

/// Renders a testbench that instantiates `main`, toggles the clock if the
/// design has one, and dumps every signal for the configured duration.
///
/// The instance binds every port of the compiled top module, board defaults
/// included.
pub fn compile_testbench(
    project: &Project,
    options: &CompileOptions,
    rules: &BoardRules,
) -> CodegenResult<String> {
    let io = top_io(project, options, rules)?;
    let params = main_params(project.graph());

    let mut content = String::from("\n");
    content.push_str(&format!(
        "// Simulation time: {}ns ({DURATION} * 10ns)\n",
        DURATION * 10
    ));
    content.push_str(&format!("parameter DURATION = {DURATION};\n"));

    if !params.is_empty() {
        content.push_str("\n// Edit the module parameters here\n// e.g. localparam constant_value = 1;\n");
        for p in &params {
            content.push_str(&format!("localparam {} = {};\n", p.name, p.value));
        }
    }

    content.push_str("\n// Input/Output\n");
    for input in &io.inputs {
        content.push_str(&declaration("reg", input));
    }
    for output in &io.outputs {
        content.push_str(&declaration("wire", output));
    }

    content.push_str("\n// Module instance\n");
    content.push_str(TOP_MODULE);
    if !params.is_empty() {
        let bound: Vec<String> = params
            .iter()
            .map(|p| format!(" .{}({})", p.id, p.name))
            .collect();
        content.push_str(" #(\n");
        content.push_str(&bound.join(",\n"));
        content.push_str("\n)");
    }
    content.push(' ');
    content.push_str(TOP_INSTANCE);
    let ports: Vec<String> = io
        .inputs
        .iter()
        .chain(&io.outputs)
        .map(|s| format!(" .{}({})", s.id, s.name))
        .collect();
    if ports.is_empty() {
        content.push_str(" ()");
    } else {
        content.push_str(" (\n");
        content.push_str(&ports.join(",\n"));
        content.push_str("\n)");
    }
    content.push_str(";\n");

    if let Some(clock) = io
        .inputs
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(CLOCK_NAME))
    {
        content.push_str(&format!(
            "\n// Clock signal\nalways #0.5 {0} = ~{0};\n",
            clock.name
        ));
    }

    content.push_str("\ninitial begin\n");
    content.push_str(" // File where to store the simulation results\n");
    content.push_str(" $dumpfile(`DUMPSTR(`VCD_OUTPUT));\n");
    content.push_str(&format!(" $dumpvars(0, {TESTBENCH_MODULE});\n\n"));
    content.push_str(" // Initialize the registers here\n // e.g. value = 1;\n // e.g. #2 value = 0;\n");
    for input in &io.inputs {
        content.push_str(&format!(" {} = 0;\n", input.name));
    }
    content.push_str("\n #(DURATION) $display(\"End of simulation\");\n $finish;\nend\n");

    let mut code = String::from(HEADER);
    code.push_str(&render_module(&ModuleDescriptor {
        name: TESTBENCH_MODULE.to_string(),
        body: content,
        ..Default::default()
    }));
    Ok(code)
}

fn declaration(kind: &str, signal: &IoSignal) -> String {
    match &signal.range {
        Some(range) => format!("{kind} {range} {};\n", signal.name),
        None => format!("{kind} {};\n", signal.name),
    }
}
