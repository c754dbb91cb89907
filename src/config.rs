//! Run configuration: TOML file, then environment, then CLI flags.
//!
//! ```toml
//! api_base = "https://api.example.com/1/"
//! access_token = "..."
//! cache_path = "/home/me/.cache/playlist-sync/found_tracks.sqlite3"
//! timeout_secs = 30
//! log_level = "info"
//! ```

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{Result, SyncError};

pub const APP_DIR: &str = "playlist-sync";
pub const CONFIG_FILE: &str = "config.toml";
pub const CACHE_FILE: &str = "found_tracks.sqlite3";

pub const ENV_TOKEN: &str = "PLAYLIST_SYNC_TOKEN";
pub const ENV_API_BASE: &str = "PLAYLIST_SYNC_API_BASE";

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub api_base: String,
    pub access_token: Option<String>,
    pub cache_path: PathBuf,
    pub timeout_secs: u64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            access_token: None,
            cache_path: default_cache_path(),
            timeout_secs: 30,
            log_level: "info".to_string(),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
}

pub fn default_cache_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CACHE_FILE)
}

impl Config {
    /// Load from `path`, or the default location when `None`. A missing
    /// file yields defaults; an unreadable or malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) => p,
                None => return Ok(Config::default()),
            },
        };
        if !path.exists() {
            return Ok(Config::default());
        }
        let text = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&text)
            .map_err(|e| SyncError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| SyncError::Config(e.to_string()))
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(ENV_TOKEN) {
            self.access_token = Some(token);
        }
        if let Some(base) = lookup(ENV_API_BASE) {
            self.api_base = base;
        }
    }

    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_base.trim().is_empty() {
            return Err(SyncError::Config(
                "api_base is not set (config file, PLAYLIST_SYNC_API_BASE or --api-base)".into(),
            ));
        }
        if self.cache_path.is_dir() {
            return Err(SyncError::Config(format!(
                "cache path '{}' is a directory",
                self.cache_path.display()
            )));
        }
        if self.timeout_secs == 0 {
            return Err(SyncError::Config("timeout_secs must be positive".into()));
        }
        self.level_filter().map(|_| ())
    }

    pub fn level_filter(&self) -> Result<LevelFilter> {
        self.log_level
            .parse()
            .map_err(|_| SyncError::Config(format!("unknown log_level '{}'", self.log_level)))
    }
}
