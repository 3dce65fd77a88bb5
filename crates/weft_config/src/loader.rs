//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::{ProjectConfig, KNOWN_TARGETS};
use std::collections::HashSet;
use std::path::Path;

/// Name of the project configuration file.
pub const CONFIG_FILE_NAME: &str = "weft.toml";

/// Loads and validates a `weft.toml` configuration from a project directory.
///
/// Reads `<project_dir>/weft.toml`, parses it, and validates required fields.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `weft.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and configuration values are consistent.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.project.design.is_empty() {
        return Err(ConfigError::MissingField("project.design".to_string()));
    }

    for (name, board) in &config.boards {
        let mut seen = HashSet::new();
        for rule in &board.rules.output {
            if rule.bit != "0" && rule.bit != "1" {
                return Err(ConfigError::ValidationError(format!(
                    "board '{name}': output pin {} has bit '{}', expected 0 or 1",
                    rule.pin, rule.bit
                )));
            }
            if !seen.insert(rule.pin.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "board '{name}': output pin {} listed twice",
                    rule.pin
                )));
            }
        }
    }

    if let Some(board) = &config.build.board {
        if !config.boards.contains_key(board) {
            return Err(ConfigError::UnknownBoard(board.clone()));
        }
    }

    for target in &config.build.targets {
        if !KNOWN_TARGETS.contains(&target.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "unknown build target '{target}' (expected one of {})",
                KNOWN_TARGETS.join(", ")
            )));
        }
    }
    Ok(())
}
