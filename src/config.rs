use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use xdg::BaseDirectories;

use crate::retry::RetryPolicy;

/// REST API version sent with every `gh api` request.
pub const DEFAULT_API_VERSION: &str = "2022-11-28";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Program used as the GitHub client.
    pub gh_program: String,
    pub api_version: String,
    pub retry: RetryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gh_program: "gh".to_owned(),
            api_version: DEFAULT_API_VERSION.to_owned(),
            retry: RetryPolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `~/.config/prpost/config.toml`
    /// is read when present and defaults are used otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::load_from(path)?,
            None => match Self::config_path() {
                Some(path) if path.exists() => Self::load_from(&path)?,
                _ => Self::default(),
            },
        };
        Ok(config.normalized())
    }

    fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn normalized(mut self) -> Self {
        if self.gh_program.trim().is_empty() {
            self.gh_program = "gh".to_owned();
        }
        if self.api_version.trim().is_empty() {
            self.api_version = DEFAULT_API_VERSION.to_owned();
        }
        self.retry = self.retry.normalized();
        self
    }

    fn config_path() -> Option<PathBuf> {
        BaseDirectories::with_prefix("prpost")
            .ok()
            .map(|dirs| dirs.get_config_home().join("config.toml"))
    }
}
