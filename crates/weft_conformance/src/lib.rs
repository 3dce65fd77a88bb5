//! Conformance test helpers for the weft compiler.
//!
//! Provides fixture loading, board catalogs built from `weft.toml` text and
//! a one-call compilation of every artifact with a fixed banner, so
//! integration tests can assert on exact generated text.

#![warn(missing_docs)]

use std::path::PathBuf;

use weft_codegen::{generate, Banner, CodegenResult, CompileOptions, Target};
use weft_config::{load_config_from_str, resolve_board, BoardRules};
use weft_graph::{load_project, Project};

/// Every artifact of one compilation, banners stripped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artifacts {
    /// Verilog modules, after the `default_nettype` line.
    pub verilog: String,
    /// PCF constraints.
    pub pcf: String,
    /// Testbench.
    pub testbench: String,
    /// GTKWave signal list.
    pub gtkwave: String,
}

/// The banner used by every conformance compilation.
pub fn fixed_banner() -> Banner {
    Banner::new("weft", "0.0.0", "Thu, 01 Jan 1970 00:00:00 +0000")
}

/// Path of a fixture file shipped with this crate.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

/// Loads a fixture project.
///
/// Panics if the fixture is missing or malformed.
pub fn load_fixture(name: &str) -> Project {
    let path = fixture_path(name);
    load_project(&path).unwrap_or_else(|e| panic!("fixture {}: {e}", path.display()))
}

/// Parses a project from JSON text.
///
/// Panics if the text is malformed.
pub fn project(json: &str) -> Project {
    Project::from_json(json).unwrap_or_else(|e| panic!("invalid project JSON: {e}"))
}

/// Builds the rules of a board named `board` whose unused output pins are
/// `(pin, bit)` pairs, going through `weft.toml` parsing and validation.
pub fn make_board(board: &str, outputs: &[(&str, &str)]) -> BoardRules {
    let mut toml_str = String::from(
        r#"
[project]
name = "conformance_test"
version = "0.1.0"
design = "design.ice"
"#,
    );
    for (pin, bit) in outputs {
        toml_str.push_str(&format!(
            "\n[[boards.{board}.rules.output]]\npin = \"{pin}\"\nbit = \"{bit}\"\n"
        ));
    }
    let config = load_config_from_str(&toml_str).unwrap_or_else(|e| panic!("board config: {e}"));
    resolve_board(&config, Some(board))
        .map(|b| b.rules)
        .unwrap_or_default()
}

/// Generates one artifact with the fixed banner and removes the banner.
pub fn compile_target(
    target: Target,
    project: &Project,
    options: &CompileOptions,
    rules: &BoardRules,
) -> CodegenResult<String> {
    let banner = fixed_banner();
    let text = generate(target, project, options, rules, &banner)?;
    let header = banner.render(target.comment());
    Ok(text.strip_prefix(&header).unwrap_or(&text).to_string())
}

/// Generates every artifact.
pub fn compile_all(
    project: &Project,
    options: &CompileOptions,
    rules: &BoardRules,
) -> CodegenResult<Artifacts> {
    let verilog = compile_target(Target::Verilog, project, options, rules)?;
    Ok(Artifacts {
        verilog: verilog
            .strip_prefix("`default_nettype none\n")
            .unwrap_or(&verilog)
            .to_string(),
        pcf: compile_target(Target::Pcf, project, options, rules)?,
        testbench: compile_target(Target::Testbench, project, options, rules)?,
        gtkwave: compile_target(Target::Gtkwave, project, options, rules)?,
    })
}

/// Returns the rendered module named `name`, from `module` through `endmodule`.
pub fn module_text<'a>(verilog: &'a str, name: &str) -> Option<&'a str> {
    let start = [format!("\nmodule {name} "), format!("\nmodule {name};")]
        .iter()
        .filter_map(|head| verilog.find(head.as_str()))
        .min()?;
    let rest = &verilog[start..];
    let end = rest.find("\nendmodule\n")? + "\nendmodule\n".len();
    Some(&rest[..end])
}
