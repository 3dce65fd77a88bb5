//! Weft CLI, the command-line front end of the weft circuit compiler.
//!
//! Provides `weft compile` to turn a circuit design into Verilog, PCF
//! constraints, a testbench and a GTKWave signal list, and `weft inspect`
//! to print a design's top-level interface and board defaults as JSON.

#![warn(missing_docs)]

mod compile;
mod inspect;
mod pipeline;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Weft, a compiler from visual circuit designs to FPGA toolchain inputs.
#[derive(Parser, Debug)]
#[command(name = "weft", version, about = "Weft circuit compiler")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (info-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level for diagnostics on stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Path to a custom `weft.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate artifacts from a design.
    Compile(CompileArgs),
    /// Print a design's interface and board defaults as JSON.
    Inspect(InspectArgs),
}

/// Arguments for the `weft compile` subcommand.
#[derive(Parser, Debug)]
pub struct CompileArgs {
    /// Design file. Defaults to `project.design` from `weft.toml`.
    pub design: Option<PathBuf>,

    /// Artifact to generate (`verilog`, `pcf`, `testbench`, `gtkwave` or `all`).
    /// Repeatable.
    #[arg(short, long = "target")]
    pub targets: Vec<String>,

    /// Board whose default-pin rules apply.
    #[arg(short, long)]
    pub board: Option<String>,

    /// Apply board-default initialization.
    #[arg(long, conflicts_with = "no_board_rules")]
    pub board_rules: bool,

    /// Skip board-default initialization even if `weft.toml` enables it.
    #[arg(long)]
    pub no_board_rules: bool,

    /// Output directory. Defaults to `build.out_dir` from `weft.toml`.
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Print artifacts to stdout instead of writing files.
    #[arg(long)]
    pub stdout: bool,
}

/// Arguments for the `weft inspect` subcommand.
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Design file. Defaults to `project.design` from `weft.toml`.
    pub design: Option<PathBuf>,

    /// Board whose unused output pins are reported.
    #[arg(short, long)]
    pub board: Option<String>,
}

/// Diagnostic log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging.
    Off,
    /// Errors only.
    Error,
    /// Warnings and errors.
    Warn,
    /// Progress messages.
    Info,
    /// Per-module and per-binding detail.
    Debug,
    /// Everything.
    Trace,
}

impl LogLevel {
    fn filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

impl Cli {
    /// Effective log level after `--quiet` and `--verbose`.
    fn level(&self) -> log::LevelFilter {
        if self.quiet {
            log::LevelFilter::Error
        } else if self.verbose {
            self.log_level.filter().max(log::LevelFilter::Info)
        } else {
            self.log_level.filter()
        }
    }
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .format_timestamp(None)
        .filter_level(cli.level())
        .target(env_logger::Target::Stderr)
        .init();

    let global = GlobalArgs {
        quiet: cli.quiet,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Compile(ref args) => compile::run(args, &global),
        Command::Inspect(ref args) => inspect::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
