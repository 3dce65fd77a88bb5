//! A summary of a design's top-level interface and board defaults.

use serde::Serialize;
use weft_config::{BoardRules, InputRule, OutputRule};
use weft_graph::Project;

use crate::defaults::{find_init_pins, find_init_ports, InitPort};
use crate::error::CodegenResult;
use crate::io::{main_io, main_params, MainIo, MainParam};
use crate::scope::DependencyScope;

/// What a design exposes and which board defaults it would receive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DesignReport {
    /// Top-level ports.
    pub io: MainIo,
    /// Top-level parameters.
    pub params: Vec<MainParam>,
    /// Input ports that declare a board default.
    pub init_ports: Vec<InitPort>,
    /// Board output pins no output uses.
    pub init_pins: Vec<OutputRule>,
    /// Defaults whose pin differs from the board's source of the same name.
    pub pin_mismatches: Vec<PinMismatch>,
}

/// A design default that names a board source but a different pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinMismatch {
    /// The default as recorded in the design.
    pub port: InitPort,
    /// Pin the board offers for that source.
    pub board_pin: String,
}

/// Compares design defaults against the board's default input sources.
///
/// Defaults naming a source the board does not offer are not reported.
pub fn pin_mismatches(ports: &[InitPort], inputs: &[InputRule]) -> Vec<PinMismatch> {
    ports
        .iter()
        .filter_map(|port| {
            let rule = inputs.iter().find(|rule| rule.port == port.name)?;
            (rule.pin != port.pin).then(|| PinMismatch {
                port: port.clone(),
                board_pin: rule.pin.clone(),
            })
        })
        .collect()
}

/// Builds the report for `project` against a board's rules.
pub fn inspect(project: &Project, rules: &BoardRules) -> CodegenResult<DesignReport> {
    let graph = project.graph();
    let scope = DependencyScope::root(&project.dependencies);
    let init_ports = find_init_ports(graph, &scope)?;
    let pin_mismatches = pin_mismatches(&init_ports, &rules.input);
    for m in &pin_mismatches {
        log::warn!(
            "{}.{} defaults '{}' to pin {}, the board has it on {}",
            m.port.block,
            m.port.port,
            m.port.name,
            m.port.pin,
            m.board_pin
        );
    }
    Ok(DesignReport {
        io: main_io(graph),
        params: main_params(graph),
        init_ports,
        init_pins: find_init_pins(graph, rules),
        pin_mismatches,
    })
}
