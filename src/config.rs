use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::symbol::CompletionMode;

const CONFIG_DIR: &str = ".pcdindex";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub index: IndexConfig,

    #[serde(default)]
    pub watcher: WatchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Declaration file extensions
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Path fragments to skip (in addition to .gitignore)
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,

    /// Completion matching: "prefix" (default) or "substring"
    #[serde(default)]
    pub completion_mode: CompletionMode,

    /// Maximum number of declaration files read at once during a build
    #[serde(default = "default_max_concurrent_reads")]
    pub max_concurrent_reads: usize,

    /// Number of cross-document redeclarations remembered
    #[serde(default = "default_collision_log_limit")]
    pub collision_log_limit: usize,

    /// Replacement for the built-in declaration pattern; group 1 must
    /// capture the PCD name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaration_pattern: Option<String>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            ignore_patterns: default_ignore_patterns(),
            completion_mode: CompletionMode::default(),
            max_concurrent_reads: default_max_concurrent_reads(),
            collision_log_limit: default_collision_log_limit(),
            declaration_pattern: None,
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["dec".to_string()]
}

fn default_ignore_patterns() -> Vec<String> {
    vec![
        ".git".to_string(),
        "Build".to_string(),
        "node_modules".to_string(),
        "target".to_string(),
    ]
}

fn default_max_concurrent_reads() -> usize {
    16
}

fn default_collision_log_limit() -> usize {
    crate::symbol::index::DEFAULT_COLLISION_LOG_LIMIT
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Debounce delay in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    500
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write logs to rolling files
    #[serde(default)]
    pub enabled: bool,

    /// Write logs to stderr
    #[serde(default = "default_true")]
    pub stderr: bool,

    /// trace, debug, info, warn or error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log directory, relative to the workspace root unless absolute
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,

    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// hourly, daily, minutely or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            stderr: default_true(),
            level: default_log_level(),
            directory: default_log_directory(),
            file_prefix: default_file_prefix(),
            rotation: default_rotation(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> PathBuf {
    PathBuf::from(CONFIG_DIR).join("logs")
}

fn default_file_prefix() -> String {
    "pcdindex.log".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Config {
    /// Load configuration from the .pcdindex directory, or defaults if absent
    pub fn load(root: &Path) -> Result<Self> {
        let config_path = root.join(CONFIG_DIR).join(CONFIG_FILE);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;

            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config from {:?}", config_path))
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to the .pcdindex directory
    pub fn save(&self, root: &Path) -> Result<()> {
        let config_dir = Self::pcdindex_dir(root);
        let config_path = config_dir.join(CONFIG_FILE);

        std::fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create config directory {:?}", config_dir))?;

        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        Ok(())
    }

    /// Get the path to the .pcdindex directory
    pub fn pcdindex_dir(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR)
    }

    /// Check if a config directory exists under `root`
    pub fn is_initialized(root: &Path) -> bool {
        Self::pcdindex_dir(root).exists()
    }
}
