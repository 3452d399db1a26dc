//! Run configuration for the tree printer and the file merger.
//!
//! Both utilities read their settings from one TOML file with an independent
//! section each. Every field is optional; anything left out keeps its default.
//!
//! # Configuration File Format
//!
//! ```toml
//! [tree]
//! root_dir = "battle_arena"
//! output_file = "directory_structure.txt"
//! ignored_paths = ["battle_arena/__pycache__"]
//! sort_entries = false
//!
//! [merge]
//! root_dir = "battle_arena"
//! output_file = "merged_output.txt"
//! allowed_extensions = ["py", "php", "txt"]
//! ignored_paths = ["battle_arena/__pycache__"]
//! ```

use crate::ignore::IgnoreList;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const LOCAL_CONFIG: &str = ".dirdumprc.toml";
const DEFAULT_ROOT: &str = "battle_arena";
const DEFAULT_IGNORED: [&str; 3] = [
    "battle_arena/__pycache__",
    "battle_arena/entities/__pycache__",
    "battle_arena/ui/__pycache__",
];

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    #[error("Invalid configuration in {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
    /// IO error while reading configuration.
    #[error("IO error reading configuration {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirdumpConfig {
    #[serde(default)]
    pub tree: TreeSettings,
    #[serde(default)]
    pub merge: MergeSettings,
}

/// Settings for `dirdump-tree`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeSettings {
    /// Directory to render.
    pub root_dir: PathBuf,
    /// Destination file, recreated on every run.
    pub output_file: PathBuf,
    /// Path prefixes left out of the tree.
    pub ignored_paths: Vec<String>,
    /// Sort siblings by name instead of keeping the directory listing order.
    pub sort_entries: bool,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from(DEFAULT_ROOT),
            output_file: PathBuf::from("directory_structure.txt"),
            ignored_paths: default_ignored_paths(),
            sort_entries: false,
        }
    }
}

impl TreeSettings {
    pub fn ignore_list(&self) -> IgnoreList {
        IgnoreList::new(self.ignored_paths.iter().cloned())
    }
}

/// Settings for `dirdump-merge`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeSettings {
    /// Directory to merge.
    pub root_dir: PathBuf,
    /// Destination file, recreated on every run.
    pub output_file: PathBuf,
    /// Extensions (without the dot) to include. Empty means every file.
    pub allowed_extensions: Vec<String>,
    /// Path prefixes left out of the merge.
    pub ignored_paths: Vec<String>,
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from(DEFAULT_ROOT),
            output_file: PathBuf::from("merged_output.txt"),
            allowed_extensions: vec!["py".to_string(), "php".to_string(), "txt".to_string()],
            ignored_paths: default_ignored_paths(),
        }
    }
}

impl MergeSettings {
    pub fn ignore_list(&self) -> IgnoreList {
        IgnoreList::new(self.ignored_paths.iter().cloned())
    }

    pub fn extension_set(&self) -> HashSet<String> {
        self.allowed_extensions.iter().cloned().collect()
    }
}

fn default_ignored_paths() -> Vec<String> {
    DEFAULT_IGNORED.iter().map(|p| p.to_string()).collect()
}

impl DirdumpConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.dirdumprc.toml` in the current directory
    /// 3. Look for `~/.config/dirdump/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but cannot
    /// be read, or if any file found is not valid TOML.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("dirdump")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&content).map_err(|reason| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason,
        })
    }

    fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }
}
