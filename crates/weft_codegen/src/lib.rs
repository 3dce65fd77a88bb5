//! Compiles weft circuit graphs into FPGA toolchain inputs.
//!
//! A [`Project`] compiles to four independent artifacts, selected by
//! [`Target`]: Verilog modules, a PCF pin constraint file, a simulation
//! testbench and a GTKWave signal list. [`generate`] is the entry point;
//! everything else is exposed for tools that need a single stage.
//!
//! Generation is a pure function of its inputs. Board defaults are applied
//! to a copy of the top-level graph, never to the caller's project; every
//! target reads that same resolved copy, so the testbench and signal list
//! always match the ports of `main`.

#![warn(missing_docs)]

pub mod analyze;
pub mod banner;
pub mod defaults;
pub mod error;
pub mod gtkwave;
pub mod instance;
pub mod io;
pub mod module;
pub mod pcf;
pub mod report;
pub mod scope;
pub mod testbench;
pub mod verilog;

use std::fmt;
use std::str::FromStr;

use weft_config::{BoardRules, OutputRule};
use weft_graph::Project;

pub use banner::Banner;
pub use defaults::{apply_default_bindings, DefaultBinding, InitPort, ResolvedGraph};
pub use error::{CodegenError, CodegenResult, UnknownTarget};
pub use module::{render_module, ModuleDescriptor, Param, PortDecl, PortList};
pub use report::{inspect, DesignReport, PinMismatch};

/// An artifact the compiler can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Target {
    /// Verilog modules.
    Verilog,
    /// PCF pin constraints.
    Pcf,
    /// Simulation testbench.
    Testbench,
    /// GTKWave signal list.
    Gtkwave,
}

impl Target {
    /// Every target, in generation order.
    pub const ALL: [Target; 4] = [
        Target::Verilog,
        Target::Pcf,
        Target::Testbench,
        Target::Gtkwave,
    ];

    /// Returns the lowercase target name.
    pub fn name(self) -> &'static str {
        match self {
            Target::Verilog => "verilog",
            Target::Pcf => "pcf",
            Target::Testbench => "testbench",
            Target::Gtkwave => "gtkwave",
        }
    }

    /// Returns the conventional output file name.
    pub fn file_name(self) -> &'static str {
        match self {
            Target::Verilog => "main.v",
            Target::Pcf => "main.pcf",
            Target::Testbench => "main_tb.v",
            Target::Gtkwave => "main_tb.gtkw",
        }
    }

    /// Returns the line-comment marker of the artifact's language.
    pub fn comment(self) -> &'static str {
        match self {
            Target::Verilog | Target::Testbench => "//",
            Target::Pcf => "#",
            Target::Gtkwave => "[*]",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Target {
    type Err = UnknownTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| UnknownTarget(s.to_string()))
    }
}

/// Options for one compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Apply board-default initialization to the top-level graph.
    pub board_rules: bool,
    /// Precomputed default-bound input ports; discovered from the graph if absent.
    pub init_ports: Option<Vec<InitPort>>,
    /// Precomputed unused board output pins; discovered from the board rules if absent.
    pub init_pins: Option<Vec<OutputRule>>,
}

impl CompileOptions {
    /// Options with board-default initialization enabled and nothing precomputed.
    pub fn with_board_rules() -> Self {
        Self {
            board_rules: true,
            ..Self::default()
        }
    }
}

/// Generates one artifact, banner included.
pub fn generate(
    target: Target,
    project: &Project,
    options: &CompileOptions,
    rules: &BoardRules,
    banner: &Banner,
) -> CodegenResult<String> {
    let mut code = banner.render(target.comment());
    match target {
        Target::Verilog => {
            code.push_str("`default_nettype none\n");
            code.push_str(&verilog::compile_verilog(project, options, rules)?);
        }
        Target::Pcf => code.push_str(&pcf::compile_pcf(project, options, rules)?),
        Target::Testbench => {
            code.push_str(&testbench::compile_testbench(project, options, rules)?)
        }
        Target::Gtkwave => code.push_str(&gtkwave::compile_gtkwave(project, options, rules)?),
    }
    Ok(code)
}
