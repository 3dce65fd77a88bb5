//! Shared pipeline helpers for CLI commands.
//!
//! Project root resolution, design loading, board selection, target
//! parsing and the generation banner, used by both `compile` and `inspect`.

use std::error::Error;
use std::path::{Path, PathBuf};

use weft_codegen::{Banner, Target, UnknownTarget};
use weft_config::{load_config, resolve_board, BoardRules, ProjectConfig, CONFIG_FILE_NAME};
use weft_graph::{load_project, Project};

use crate::GlobalArgs;

/// Tool name written into every banner.
pub const TOOL_NAME: &str = "weft";

/// A loaded design together with the project configuration around it, if any.
pub struct Session {
    /// Directory containing `weft.toml`, when one was found.
    pub root: Option<PathBuf>,
    /// Parsed `weft.toml`, when one was found.
    pub config: Option<ProjectConfig>,
    /// Path of the design file.
    pub design_path: PathBuf,
    /// The parsed design.
    pub project: Project,
}

/// Walks up from `start` looking for the nearest directory containing `weft.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE_NAME).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE_NAME} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root directory from global CLI args.
///
/// A `--config` path wins: a file resolves to its parent directory, a directory to itself.
/// Otherwise walks up from the current directory looking for `weft.toml`.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            Ok(p.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")))
        } else {
            Ok(p)
        }
    } else {
        find_project_root(&std::env::current_dir()?)
    }
}

/// Opens the design to work on.
///
/// An explicit `design` path may be compiled without any `weft.toml`; the
/// configuration is still loaded when one is found. Without a path, the
/// design comes from `project.design` of the required `weft.toml`.
pub fn open_session(design: Option<&Path>, global: &GlobalArgs) -> Result<Session, Box<dyn Error>> {
    let (root, config, design_path) = match design {
        Some(path) => match resolve_project_root(global) {
            Ok(root) => {
                let config = load_config(&root)?;
                (Some(root), Some(config), path.to_path_buf())
            }
            Err(e) if global.config.is_none() => {
                log::debug!("no project configuration: {e}");
                (None, None, path.to_path_buf())
            }
            Err(e) => return Err(e),
        },
        None => {
            let root = resolve_project_root(global)?;
            let config = load_config(&root)?;
            let path = root.join(&config.project.design);
            (Some(root), Some(config), path)
        }
    };

    let project = load_project(&design_path)
        .map_err(|e| format!("{}: {e}", design_path.display()))?;
    Ok(Session {
        root,
        config,
        design_path,
        project,
    })
}

impl Session {
    /// Selects the board rules that apply.
    ///
    /// Precedence: `--board`, then `build.board`, then the board recorded in
    /// the design file if the catalog defines it. No board means no rules.
    pub fn board_rules(&self, board: Option<&str>) -> Result<BoardRules, Box<dyn Error>> {
        let Some(config) = &self.config else {
            if let Some(name) = board {
                return Err(format!("board '{name}' given but no {CONFIG_FILE_NAME} was found").into());
            }
            return Ok(BoardRules::default());
        };

        let recorded = self
            .project
            .design
            .board
            .as_deref()
            .filter(|name| config.boards.contains_key(*name));
        let name = board.or(config.build.board.as_deref()).or(recorded);
        let resolved = resolve_board(config, name)?;
        if let Some(name) = &resolved.name {
            log::info!("Using board {name}");
        }
        Ok(resolved.rules)
    }

    /// Directory generated files go to.
    pub fn out_dir(&self, cli: Option<&Path>) -> PathBuf {
        if let Some(dir) = cli {
            return dir.to_path_buf();
        }
        match (&self.root, &self.config) {
            (Some(root), Some(config)) => root.join(&config.build.out_dir),
            _ => self
                .design_path
                .parent()
                .map(|p| p.join("build"))
                .unwrap_or_else(|| PathBuf::from("build")),
        }
    }
}

/// Parses target names, expanding `all`, dropping duplicates and keeping
/// first-mention order. No names at all means every target.
pub fn parse_targets(names: &[String]) -> Result<Vec<Target>, UnknownTarget> {
    if names.is_empty() {
        return Ok(Target::ALL.to_vec());
    }
    let mut targets = Vec::new();
    for name in names {
        let expanded = if name == "all" {
            Target::ALL.to_vec()
        } else {
            vec![name.parse::<Target>()?]
        };
        for t in expanded {
            if !targets.contains(&t) {
                targets.push(t);
            }
        }
    }
    Ok(targets)
}

/// The banner for artifacts generated now by this binary.
pub fn banner() -> Banner {
    Banner::new(
        TOOL_NAME,
        env!("CARGO_PKG_VERSION"),
        chrono::Utc::now().to_rfc2822(),
    )
}
