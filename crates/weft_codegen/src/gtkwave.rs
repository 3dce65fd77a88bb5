//! GTKWave signal list for the testbench dump.

use weft_config::BoardRules;
use weft_graph::Project;

use crate::error::CodegenResult;
use crate::io::top_io;
use crate::testbench::TESTBENCH_MODULE;
use crate::CompileOptions;

/// Lists every input then output of the compiled top module as
/// `main_tb.<name><range>`.
pub fn compile_gtkwave(
    project: &Project,
    options: &CompileOptions,
    rules: &BoardRules,
) -> CodegenResult<String> {
    let io = top_io(project, options, rules)?;
    Ok(io
        .inputs
        .iter()
        .chain(&io.outputs)
        .map(|s| {
            format!(
                "{TESTBENCH_MODULE}.{}{}\n",
                s.name,
                s.range.as_deref().unwrap_or_default()
            )
        })
        .collect())
}
