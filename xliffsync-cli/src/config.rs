//! Project configuration (`xliffsync.toml`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use xliffsync::{ResourceFormat, TargetDescriptor, TargetSettings};

pub const DEFAULT_CONFIG_FILE: &str = "xliffsync.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProjectConfig {
    pub source: SourceConfig,
    pub target_settings: TargetSettings,
    #[serde(default)]
    pub targets: Vec<TargetDescriptor>,
}

/// The `[source]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Source resource, relative to the working directory.
    pub path: String,
    pub language: String,
    #[serde(default)]
    pub application_name: Option<String>,
    /// Inferred from the extension of `path` when absent.
    #[serde(default)]
    pub format: Option<ResourceFormat>,
}

impl ProjectConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Invalid config: {}", e))
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
        Self::from_toml_str(&content)
    }

    /// The configured targets, restricted to `languages` when it is not empty.
    pub fn select_targets(&self, languages: &[String]) -> Result<Vec<&TargetDescriptor>, String> {
        if languages.is_empty() {
            return Ok(self.targets.iter().collect());
        }
        languages
            .iter()
            .map(|lang| {
                self.targets
                    .iter()
                    .find(|t| t.language == *lang)
                    .ok_or_else(|| format!("Unknown target language: {}", lang))
            })
            .collect()
    }
}

/// `--config` if given, else `xliffsync.toml` in the working directory.
pub fn resolve_config_path(config: Option<&Path>, working_dir: &Path) -> PathBuf {
    match config {
        Some(path) => path.to_path_buf(),
        None => working_dir.join(DEFAULT_CONFIG_FILE),
    }
}
