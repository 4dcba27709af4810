//! Configuration for project checks.
//!
//! Read from the JSON file named by `NUGET_META_CONFIG`. Every field is
//! optional; an unset variable means all defaults.

use crate::error::{MetaError, Result};
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Root configuration.
///
/// # Examples
///
/// ```
/// use nuget_meta::config::MetaConfig;
///
/// let config = MetaConfig::from_json(r#"{ "max_concurrent_checks": 2, "cache": { "enabled": false } }"#).unwrap();
///
/// assert_eq!(config.max_concurrent_checks, 2);
/// assert_eq!(config.lock_file_name, "project.lock.json");
/// assert!(!config.cache.enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MetaConfig {
    #[serde(default = "default_lock_file_name")]
    pub lock_file_name: String,
    #[serde(default = "default_project_file_name")]
    pub project_file_name: String,
    /// Parent directories searched for a lock file above the project.
    #[serde(default = "default_max_parent_depth")]
    pub max_parent_depth: usize,
    #[serde(default = "default_max_concurrent_checks")]
    pub max_concurrent_checks: usize,
    /// Default tracing filter, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Default for MetaConfig {
    fn default() -> Self {
        Self {
            lock_file_name: default_lock_file_name(),
            project_file_name: default_project_file_name(),
            max_parent_depth: default_max_parent_depth(),
            max_concurrent_checks: default_max_concurrent_checks(),
            log_level: default_log_level(),
            cache: CacheConfig::default(),
        }
    }
}

/// Lock file cache settings.
///
/// # Defaults
///
/// - `enabled`: `true`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}

impl MetaConfig {
    /// Environment variable naming the configuration file.
    pub const ENV_VAR: &'static str = "NUGET_META_CONFIG";

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| MetaError::config(e.to_string()))
    }

    /// Loads configuration from a JSON file.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| MetaError::config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_json(&content)
            .map_err(|e| MetaError::config(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Path named by [`Self::ENV_VAR`]. Unset and empty both mean none.
    pub fn env_path() -> Option<PathBuf> {
        config_path(std::env::var_os(Self::ENV_VAR))
    }

    /// Loads `path` when given, otherwise returns defaults.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path).await,
            None => Ok(Self::default()),
        }
    }

    /// Number of projects checked at once, never less than one.
    pub fn concurrency(&self) -> usize {
        self.max_concurrent_checks.max(1)
    }
}

fn config_path(value: Option<OsString>) -> Option<PathBuf> {
    value.filter(|v| !v.is_empty()).map(PathBuf::from)
}

fn default_true() -> bool {
    true
}

fn default_lock_file_name() -> String {
    "project.lock.json".into()
}

fn default_project_file_name() -> String {
    "project.json".into()
}

fn default_max_parent_depth() -> usize {
    5
}

fn default_max_concurrent_checks() -> usize {
    8
}

fn default_log_level() -> String {
    "info".into()
}
