//! The `weft inspect` command.

use std::error::Error;

use weft_codegen::inspect;

use crate::pipeline::open_session;
use crate::{GlobalArgs, InspectArgs};

/// Runs the `weft inspect` command, printing the design report as JSON.
pub fn run(args: &InspectArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let session = open_session(args.design.as_deref(), global)?;
    let rules = session.board_rules(args.board.as_deref())?;
    let report = inspect(&session.project, &rules)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(0)
}
