//! Configuration module for route generation.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//! - CLI argument overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `RG_` and use double underscores
//! to separate nested levels:
//! - `RG_APP_DIR=app` sets `app_dir`
//! - `RG_WATCH__DEBOUNCE_MS=500` sets `watch.debounce_ms`
//! - `RG_DEV_MODE=true` sets `dev_mode`
//!
//! `NODE_ENV=development` also enables `dev_mode`, matching the host build tool.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{RouteError, RouteResult};

const CONFIG_DIR: &str = ".routegen";
const CONFIG_FILE: &str = "settings.toml";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Root of the app directory that encodes the page structure
    #[serde(default = "default_app_dir")]
    pub app_dir: PathBuf,

    /// Output path of the typed route declaration file
    #[serde(default = "default_declaration_path")]
    pub declaration_path: PathBuf,

    /// Output path of the `link$` helper module
    #[serde(default = "default_utils_path")]
    pub utils_path: PathBuf,

    /// Extensions (with leading dot) that qualify a `page.*` file as a route
    #[serde(default = "default_page_extensions")]
    pub page_extensions: Vec<String>,

    /// Optional depth guard for the directory walk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,

    /// Development mode: keep watching the app directory after generating
    #[serde(default)]
    pub dev_mode: bool,

    /// File watcher settings
    #[serde(default)]
    pub watch: WatchConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WatchConfig {
    /// Quiet period after the last add/remove before routes are regenerated
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Glob patterns (relative to the app directory) whose events are ignored
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default level for all modules
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-module level overrides (`module = "level"`)
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_app_dir() -> PathBuf {
    PathBuf::from("src/app")
}
fn default_declaration_path() -> PathBuf {
    PathBuf::from("node_modules/@types/next-routes/index.d.ts")
}
fn default_utils_path() -> PathBuf {
    PathBuf::from("src/lib/link$.ts")
}
fn default_page_extensions() -> Vec<String> {
    [".tsx", ".ts", ".js", ".jsx", ".mdx"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_debounce_ms() -> u64 {
    300
}
fn default_ignore_patterns() -> Vec<String> {
    vec!["node_modules/**".to_string()]
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            app_dir: default_app_dir(),
            declaration_path: default_declaration_path(),
            utils_path: default_utils_path(),
            page_extensions: default_page_extensions(),
            max_depth: None,
            dev_mode: false,
            watch: WatchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            ignore_patterns: default_ignore_patterns(),
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

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        // Try to find the workspace root by looking for .routegen directory
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(CONFIG_FILE));

        Self::figment(config_path)
            .extract()
            .map_err(Box::new)
            .map(Self::apply_node_env)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Self::figment(path.as_ref().to_path_buf())
            .extract()
            .map_err(Box::new)
            .map(Self::apply_node_env)
    }

    fn figment(config_path: PathBuf) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(config_path))
            // Double underscore separates nested levels, single underscore stays
            .merge(Env::prefixed("RG_").map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
    }

    fn apply_node_env(mut settings: Settings) -> Settings {
        if std::env::var("NODE_ENV").is_ok_and(|v| v == "development") {
            settings.dev_mode = true;
        }
        settings
    }

    /// Find the settings file by looking for a .routegen directory
    /// from the current directory up to the filesystem root
    fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        current
            .ancestors()
            .map(|ancestor| ancestor.join(CONFIG_DIR))
            .find(|dir| dir.is_dir())
            .map(|dir| dir.join(CONFIG_FILE))
    }

    /// Check that the app directory exists and is a directory.
    pub fn validate(&self) -> RouteResult<()> {
        if self.app_dir.as_os_str().is_empty() {
            return Err(RouteError::config("app_dir is empty"));
        }
        if !self.app_dir.exists() {
            return Err(RouteError::config(format!(
                "app directory {} does not exist",
                self.app_dir.display()
            )));
        }
        if !self.app_dir.is_dir() {
            return Err(RouteError::config(format!(
                "app directory {} is not a directory",
                self.app_dir.display()
            )));
        }
        if self.page_extensions.is_empty() {
            return Err(RouteError::config("page_extensions is empty"));
        }
        Ok(())
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Create a default settings file in the current directory
    pub fn init_config_file(force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = PathBuf::from(CONFIG_DIR).join(CONFIG_FILE);

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        Settings::default().save(&config_path)?;
        Ok(config_path)
    }
}
