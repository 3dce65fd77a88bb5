//! Configuration types deserialized from `weft.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Output target names accepted in `build.targets`.
pub const KNOWN_TARGETS: &[&str] = &["verilog", "pcf", "testbench", "gtkwave", "all"];

/// The top-level project configuration parsed from `weft.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata (name, version, design file).
    pub project: ProjectMeta,
    /// The board catalog, keyed by board name.
    #[serde(default)]
    pub boards: BTreeMap<String, BoardDef>,
    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,
}

/// Core project metadata required in every `weft.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// The project version string.
    pub version: String,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
    /// Path of the circuit graph file, relative to the project directory.
    pub design: String,
}

/// One board of the catalog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoardDef {
    /// Human-readable board name.
    #[serde(default)]
    pub description: String,
    /// Default-binding rules for this board.
    #[serde(default)]
    pub rules: BoardRules,
}

/// Default-pin rules of a board.
///
/// `output` lists pins that must be driven to a fixed level when the design
/// leaves them unused (LEDs, enables). `input` lists the default sources the
/// editor offers for unconnected block inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRules {
    /// Output pins with their fixed idle level.
    #[serde(default)]
    pub output: Vec<OutputRule>,
    /// Default input sources.
    #[serde(default)]
    pub input: Vec<InputRule>,
}

/// An output pin that is driven to `bit` when no output block claims it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRule {
    /// Physical pin name.
    pub pin: String,
    /// Fixed level, `"0"` or `"1"`.
    pub bit: String,
}

/// A default input source offered by the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRule {
    /// Port name of the default source (e.g. `clk`).
    pub port: String,
    /// Physical pin name.
    pub pin: String,
}

/// Build configuration.
#[derive(Debug, Deserialize)]
pub struct BuildConfig {
    /// Board used when none is given on the command line.
    #[serde(default)]
    pub board: Option<String>,
    /// Whether board-default initialization is applied to the top module.
    #[serde(default)]
    pub board_rules: bool,
    /// Artifacts to generate (`"all"`, a single target, or a list).
    ///
    /// Accepts either a single string or a list of strings. Defaults to an
    /// empty vec, meaning every target.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub targets: Vec<String>,
    /// Output directory, relative to the project directory.
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            board: None,
            board_rules: false,
            targets: Vec::new(),
            out_dir: default_out_dir(),
        }
    }
}

fn default_out_dir() -> String {
    "build".to_string()
}

/// Deserializes a field that can be either a single string or a list of strings.
///
/// Allows TOML config to accept both `targets = "all"` (string) and
/// `targets = ["verilog", "pcf"]` (array of strings).
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}
