//! Scratchpad
//!
//! Workspace-local markdown notes with:
//! - Title slugs as stable, filesystem-safe filenames
//! - A notes store over a single flat directory (list, create, open, remove, watch)
//! - Explicit host ports for the file system and the editor
//! - Shell commands (add, remove, open, search) for interactive use

pub mod commands;
pub mod events;
pub mod host;
pub mod notes;

#[cfg(test)]
pub(crate) mod test_helpers;

use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Notes directory, relative to the workspace, when nothing else is configured
pub const DEFAULT_NOTES_DIR: &str = ".scratchpad";

/// Config file looked up in the current directory
pub const DEFAULT_CONFIG_FILE: &str = "scratchpad.yaml";

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub workspace: WorkspaceYamlConfig,
    pub editor: EditorYamlConfig,
}

/// Workspace configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkspaceYamlConfig {
    pub path: String,
    pub notes_dir: String,
}

impl Default for WorkspaceYamlConfig {
    fn default() -> Self {
        Self {
            path: ".".into(),
            notes_dir: DEFAULT_NOTES_DIR.into(),
        }
    }
}

/// Editor configuration section
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct EditorYamlConfig {
    /// Editor command line, e.g. `nvim` or `emacs -nw`
    pub command: Option<String>,
}

// ============================================================================
// Runtime config (what the application actually uses)
// ============================================================================

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub workspace_path: PathBuf,
    pub notes_dir: PathBuf,
    /// `None` means no editor: opened notes are printed as `path:row:col`
    pub editor_command: Option<String>,
}

impl Config {
    /// Load configuration from `scratchpad.yaml` in CWD (if any) and env vars.
    /// Equivalent to from_yaml_and_env(None).
    pub fn from_env() -> Result<Self> {
        Self::from_yaml_and_env(None)
    }

    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default. For the editor, `SCRATCHPAD_EDITOR`
    /// beats the YAML value, which beats the generic `VISUAL` / `EDITOR`.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        // 1. Load YAML config (or defaults if file not found)
        let yaml = Self::load_yaml(yaml_path);

        // 2. Build Config with env var overrides
        let editor_command = env_non_empty("SCRATCHPAD_EDITOR")
            .or(yaml.editor.command.filter(|c| !c.trim().is_empty()))
            .or_else(|| env_non_empty("VISUAL"))
            .or_else(|| env_non_empty("EDITOR"));

        Ok(Self {
            workspace_path: env_non_empty("SCRATCHPAD_WORKSPACE")
                .unwrap_or(yaml.workspace.path)
                .into(),
            notes_dir: env_non_empty("SCRATCHPAD_NOTES_DIR")
                .unwrap_or(yaml.workspace.notes_dir)
                .into(),
            editor_command,
        })
    }

    /// The notes directory resolved against the workspace
    pub fn notes_path(&self) -> PathBuf {
        self.workspace_path.join(&self.notes_dir)
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

// ============================================================================
// Tests
// ============================================================================
