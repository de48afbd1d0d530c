//! Configuration management for diffscope
//!
//! This module provides configuration structures and defaults for the
//! comparison session, the result history and text output. Values come from
//! defaults, then an optional TOML file, then environment variables.

use std::path::Path;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use crate::core::{Settings, DEFAULT_MAX_RESULTS};

/// Global configuration for diffscope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffScopeConfig {
    /// Initial settings for compute calls
    pub settings: Settings,
    /// Result history configuration
    pub store: StoreConfig,
    /// Text output configuration
    pub ui: UiConfig,
}

/// Configuration for the result history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum number of results kept in a session
    pub max_results: usize,
}

/// Configuration for text output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Default width for side-by-side diff display
    pub default_width: usize,
    /// Colour changed rows with ANSI escapes
    pub color: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_width: 120,
            color: true,
        }
    }
}

/// Configuration loading and management
impl DiffScopeConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Load from `path` when given, otherwise use defaults; environment
    /// variables override either.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides())
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Some(lines) = env_value::<usize>("DIFFSCOPE_CONTEXT_LINES") {
            self.settings.context_lines = lines;
        }

        if let Some(max) = env_value::<usize>("DIFFSCOPE_MAX_RESULTS") {
            self.store.max_results = max;
        }

        if let Some(flag) = env_value::<bool>("DIFFSCOPE_IGNORE_CASE") {
            self.settings.ignore_case = flag;
        }

        if let Some(flag) = env_value::<bool>("DIFFSCOPE_IGNORE_WHITESPACE") {
            self.settings.ignore_whitespace = flag;
        }

        if let Some(width) = env_value::<usize>("DIFFSCOPE_WIDTH") {
            self.ui.default_width = width;
        }

        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.store.max_results == 0 {
            return Err("max_results must be greater than 0".to_string());
        }

        if self.ui.default_width < 20 {
            return Err("default_width must be at least 20".to_string());
        }

        Ok(())
    }
}

fn env_value<T: std::str::FromStr>(name: &str) -> Option<T> {
    let value = std::env::var(name).ok()?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!("Ignoring {}: cannot parse {:?}", name, value);
            None
        }
    }
}
