use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;
use users_core::DEFAULT_BASE_URL;

use crate::error::{CliError, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Contents of `config.toml`. Every key is optional.
#[derive(Deserialize, Default, Debug, PartialEq, Eq)]
pub struct Config {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Read the config file if there is one; a missing file or config
    /// directory means defaults.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| CliError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| CliError::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "users").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Explicit value (flag or env var) first, then the file, then the
    /// public service.
    pub fn resolve_base_url(&self, explicit: Option<&str>) -> String {
        explicit
            .map(String::from)
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// A zero timeout would fail every request, so it falls back to the default.
    pub fn resolve_timeout(&self, explicit: Option<u64>) -> Duration {
        Duration::from_secs(
            explicit
                .or(self.timeout_secs)
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        )
    }
}
