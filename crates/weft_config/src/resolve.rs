//! Board resolution: picking the active board from the catalog.

use crate::error::ConfigError;
use crate::types::{BoardRules, ProjectConfig};

/// The board a compilation runs against.
///
/// An unnamed board carries no rules, so board-default initialization has
/// nothing to add beyond the defaults declared by the blocks themselves.
#[derive(Debug, Clone, Default)]
pub struct ResolvedBoard {
    /// The board name, if any board was selected.
    pub name: Option<String>,
    /// Human-readable board description.
    pub description: String,
    /// Default-pin rules of the selected board.
    pub rules: BoardRules,
}

/// Resolves the active board.
///
/// An explicit `name` wins over `build.board`. With neither set the result is
/// an empty, unnamed board.
pub fn resolve_board(
    config: &ProjectConfig,
    name: Option<&str>,
) -> Result<ResolvedBoard, ConfigError> {
    let Some(name) = name.or(config.build.board.as_deref()) else {
        return Ok(ResolvedBoard::default());
    };

    let board = config
        .boards
        .get(name)
        .ok_or_else(|| ConfigError::UnknownBoard(name.to_string()))?;

    Ok(ResolvedBoard {
        name: Some(name.to_string()),
        description: board.description.clone(),
        rules: board.rules.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    const TOML: &str = r#"
[project]
name = "test"
version = "0.1.0"
design = "test.ice"

[[boards.icezum.rules.output]]
pin = "95"
bit = "0"

[[boards.icestick.rules.output]]
pin = "99"
bit = "1"

[build]
board = "icezum"
"#;

    #[test]
    fn falls_back_to_build_board() {
        let config = load_config_from_str(TOML).unwrap();
        let board = resolve_board(&config, None).unwrap();
        assert_eq!(board.name.as_deref(), Some("icezum"));
        assert_eq!(board.rules.output[0].pin, "95");
    }

    #[test]
    fn explicit_name_overrides() {
        let config = load_config_from_str(TOML).unwrap();
        let board = resolve_board(&config, Some("icestick")).unwrap();
        assert_eq!(board.rules.output[0].pin, "99");
    }

    #[test]
    fn unknown_board_errors() {
        let config = load_config_from_str(TOML).unwrap();
        let err = resolve_board(&config, Some("nonexistent")).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownBoard(_)));
    }

    #[test]
    fn no_board_is_empty() {
        let config = load_config_from_str(
            "[project]\nname=\"t\"\nversion=\"0.1.0\"\ndesign=\"t.ice\"",
        )
        .unwrap();
        let board = resolve_board(&config, None).unwrap();
        assert!(board.name.is_none());
        assert!(board.rules.output.is_empty());
    }
}
