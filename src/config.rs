//! Configuration for the code intelligence engine.
//!
//! Settings live in `.codexray/config.json`. Every field has a default so a
//! minimal or hand-edited file still loads; unknown fields round-trip
//! unmodified via `extra`, so a future engine version's config survives being
//! opened by this one.
//!
//! `RUST_LOG` overrides `logging.default` / `logging.modules` at startup -
//! see [`crate::logging`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Directory name the engine stores its config and database under.
pub const STORE_DIR: &str = ".codexray";
/// Database file name within [`STORE_DIR`].
pub const DB_FILE: &str = "codexray.db";
/// Config file name within [`STORE_DIR`].
pub const CONFIG_FILE: &str = "config.json";

/// Schema version this build of the engine expects.
pub const EXPECTED_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "default_project_name")]
    pub project_name: String,

    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub frameworks: Vec<String>,

    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    #[serde(default)]
    pub git_hooks_enabled: bool,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub mcp: McpConfig,

    /// Unknown fields, preserved verbatim across load/save round-trips.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub default: String,

    #[serde(default)]
    pub modules: HashMap<String, String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct McpConfig {
    #[serde(default = "default_max_context_size")]
    pub max_context_size: usize,
}

fn default_version() -> u32 {
    EXPECTED_SCHEMA_VERSION
}
fn default_project_name() -> String {
    "project".to_string()
}
fn default_languages() -> Vec<String> {
    vec![
        "rust",
        "python",
        "javascript",
        "typescript",
        "go",
        "java",
        "c",
        "cpp",
        "csharp",
        "php",
        "kotlin",
        "swift",
        "lua",
        "gdscript",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
fn default_max_file_size() -> u64 {
    1_048_576
}
fn default_log_level() -> String {
    "warn".to_string()
}
fn default_max_context_size() -> usize {
    100_000
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            project_name: default_project_name(),
            languages: default_languages(),
            exclude: default_exclude_patterns(),
            frameworks: Vec::new(),
            max_file_size: default_max_file_size(),
            git_hooks_enabled: false,
            logging: LoggingConfig::default(),
            mcp: McpConfig::default(),
            extra: Map::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            max_context_size: default_max_context_size(),
        }
    }
}

fn default_exclude_patterns() -> Vec<String> {
    vec![
        "target/**",
        "node_modules/**",
        ".git/**",
        "dist/**",
        "build/**",
        "vendor/**",
        ".codexray/**",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Settings {
    /// Path to the `.codexray` directory under `root`.
    pub fn store_dir(root: &Path) -> PathBuf {
        root.join(STORE_DIR)
    }

    pub fn config_path(root: &Path) -> PathBuf {
        Self::store_dir(root).join(CONFIG_FILE)
    }

    pub fn db_path(root: &Path) -> PathBuf {
        Self::store_dir(root).join(DB_FILE)
    }

    /// Load settings from `root/.codexray/config.json`.
    ///
    /// Fails with [`Error::NotInitialized`] if the store directory is
    /// absent, and [`crate::error::StorageError::SchemaVersionMismatch`] if
    /// the persisted version predates what this build expects.
    pub fn load(root: &Path) -> Result<Self> {
        let store_dir = Self::store_dir(root);
        if !store_dir.is_dir() {
            return Err(Error::NotInitialized { path: store_dir });
        }

        let config_path = Self::config_path(root);
        let content = std::fs::read_to_string(&config_path)?;
        let settings: Settings = serde_json::from_str(&content)
            .map_err(|e| Error::Config { reason: e.to_string() })?;

        if settings.version < EXPECTED_SCHEMA_VERSION {
            return Err(crate::error::StorageError::SchemaVersionMismatch {
                found: settings.version,
                expected: EXPECTED_SCHEMA_VERSION,
            }
            .into());
        }

        Ok(settings)
    }

    /// Write settings to `root/.codexray/config.json`, creating the store
    /// directory if needed.
    pub fn save(&self, root: &Path) -> Result<()> {
        let store_dir = Self::store_dir(root);
        std::fs::create_dir_all(&store_dir)?;
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config { reason: e.to_string() })?;
        std::fs::write(Self::config_path(root), json)?;
        Ok(())
    }

    pub fn is_initialized(root: &Path) -> bool {
        Self::store_dir(root).is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_settings_match_spec_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.version, 1);
        assert_eq!(settings.max_file_size, 1_048_576);
        assert!(!settings.git_hooks_enabled);
        assert_eq!(settings.languages.len(), 14);
    }

    #[test]
    fn round_trips_through_save_and_load() {
        let dir = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.project_name = "demo".to_string();
        settings.save(dir.path()).unwrap();

        let loaded = Settings::load(dir.path()).unwrap();
        assert_eq!(loaded.project_name, "demo");
    }

    #[test]
    fn unknown_fields_are_preserved() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(Settings::store_dir(dir.path())).unwrap();
        std::fs::write(
            Settings::config_path(dir.path()),
            r#"{"version": 1, "projectName": "demo", "futureField": {"nested": true}}"#,
        )
        .unwrap();

        let settings = Settings::load(dir.path()).unwrap();
        assert_eq!(settings.project_name, "demo");
        assert!(settings.extra.contains_key("futureField"));

        settings.save(dir.path()).unwrap();
        let reread = std::fs::read_to_string(Settings::config_path(dir.path())).unwrap();
        assert!(reread.contains("futureField"));
    }

    #[test]
    fn missing_store_dir_is_not_initialized_error() {
        let dir = TempDir::new().unwrap();
        let err = Settings::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::NotInitialized { .. }));
    }

    #[test]
    fn older_schema_version_is_rejected() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(Settings::store_dir(dir.path())).unwrap();
        std::fs::write(
            Settings::config_path(dir.path()),
            r#"{"version": 0}"#,
        )
        .unwrap();

        let err = Settings::load(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            Error::Storage(crate::error::StorageError::SchemaVersionMismatch { .. })
        ));
    }
}
