//! The `weft compile` command.

use std::error::Error;
use std::fs;

use weft_codegen::{generate, CompileOptions};

use crate::pipeline::{banner, open_session, parse_targets};
use crate::{CompileArgs, GlobalArgs};

/// Runs the `weft compile` command.
///
/// Loads the design, selects targets and board rules from the flags and
/// `weft.toml`, then writes each artifact to the output directory (or
/// stdout). Returns exit code 0 on success.
pub fn run(args: &CompileArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let session = open_session(args.design.as_deref(), global)?;

    let build = session.config.as_ref().map(|c| &c.build);
    let targets = if args.targets.is_empty() {
        parse_targets(build.map(|b| b.targets.as_slice()).unwrap_or_default())?
    } else {
        parse_targets(&args.targets)?
    };
    let board_rules = args.board_rules
        || (!args.no_board_rules && build.is_some_and(|b| b.board_rules));
    let rules = session.board_rules(args.board.as_deref())?;
    let options = CompileOptions {
        board_rules,
        ..CompileOptions::default()
    };

    if let Some(config) = &session.config {
        log::info!(
            "Compiling {} v{} ({})",
            config.project.name,
            config.project.version,
            session.design_path.display()
        );
    } else {
        log::info!("Compiling {}", session.design_path.display());
    }

    let banner = banner();
    let out_dir = session.out_dir(args.out_dir.as_deref());
    if !args.stdout {
        fs::create_dir_all(&out_dir)?;
    }

    for target in &targets {
        let text = generate(*target, &session.project, &options, &rules, &banner)?;
        if args.stdout {
            print!("{text}");
        } else {
            let path = out_dir.join(target.file_name());
            fs::write(&path, text)?;
            log::info!("Wrote {}", path.display());
        }
    }

    if !global.quiet && !args.stdout {
        eprintln!(
            "    Finished {} artifact(s) in {}",
            targets.len(),
            out_dir.display()
        );
    }
    Ok(0)
}
