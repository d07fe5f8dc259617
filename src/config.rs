use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;

/// Settings for the code generator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// One level of indentation in the formatted output.
    pub indent: String,
    /// Comment text placed between the code of consecutive entry points.
    pub entry_separator: String,
    /// Comment text emitted when the graph has no entry point.
    pub empty_message: String,
    /// Write diagnostics into the output as comments. They are always reported
    /// in the generation result either way.
    pub inline_diagnostics: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            entry_separator: "--- next entry point ---".to_string(),
            empty_message: "No start block found. Add a start block to generate code.".to_string(),
            inline_diagnostics: true,
        }
    }
}

/// Settings for the undo/redo history.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of retained states.
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { capacity: 30 }
    }
}

/// Top-level editor configuration, usually loaded from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub generator: GeneratorConfig,
    pub history: HistoryConfig,
}

impl EditorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }
}
