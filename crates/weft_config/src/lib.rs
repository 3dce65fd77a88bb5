//! Parsing and validation of `weft.toml` project configuration files.
//!
//! This crate reads the project configuration file and produces a strongly-typed
//! [`ProjectConfig`] holding the design path, the board catalog with its
//! default-pin rules, and build settings.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use resolve::{resolve_board, ResolvedBoard};
pub use types::*;
