use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::theme::Theme;

/// Env var that overrides `api.base_url`
pub const API_URL_ENV: &str = "QUOTESCOPE_API_URL";

/// Main configuration structure
///
/// Loaded from `<config dir>/quotescope/config.toml`. Priority is
/// CLI > env > file > defaults; the CLI applies its own overrides on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Load config from the default location, falling back to defaults
    pub fn load() -> crate::Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env();
        Ok(config)
    }

    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Save config to disk
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api.base_url = url;
            }
        }
    }

    /// XDG config dir on Unix-like systems, AppData on Windows
    pub fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("quotescope");

        Ok(config_dir.join("config.toml"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    quotescope_api::DEFAULT_API_URL.to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Timing and sizing knobs for the slider, cache and list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Minimum gap between preview fetches while dragging
    #[serde(default = "default_throttle")]
    pub throttle_ms: u64,

    /// Quiet time after release before the settled fetch
    #[serde(default = "default_debounce")]
    pub debounce_ms: u64,

    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Quotes per page when bucketing client-side
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "default_search_debounce")]
    pub search_debounce_ms: u64,
}

fn default_throttle() -> u64 {
    300
}

fn default_debounce() -> u64 {
    150
}

fn default_cache_capacity() -> usize {
    quotescope_cache::DEFAULT_CAPACITY
}

fn default_page_size() -> usize {
    100
}

fn default_search_debounce() -> u64 {
    300
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            throttle_ms: default_throttle(),
            debounce_ms: default_debounce(),
            cache_capacity: default_cache_capacity(),
            page_size: default_page_size(),
            search_debounce_ms: default_search_debounce(),
        }
    }
}

impl NavigationConfig {
    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Stored theme preference; `None` follows the terminal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,

    /// Enable mouse support (slider dragging) in the TUI
    #[serde(default = "default_mouse")]
    pub mouse_enabled: bool,
}

fn default_mouse() -> bool {
    true
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: None,
            mouse_enabled: default_mouse(),
        }
    }
}
