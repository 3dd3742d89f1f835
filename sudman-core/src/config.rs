use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SudmanError};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "SUDMAN_CONFIG";

/// User configuration, read from `~/.config/sudman/config.yml` by default
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SudmanConfig {
    /// Manager executable
    pub systemctl: String,

    /// Journal executable
    pub journalctl: String,

    /// Default line count for `sudman logs`
    pub log_lines: usize,

    /// Lines fetched by the dashboard's log action
    pub dashboard_log_lines: usize,

    /// Maximum characters accepted by the dashboard filter prompt
    pub filter_max_len: usize,
}

impl Default for SudmanConfig {
    fn default() -> Self {
        Self {
            systemctl: "systemctl".into(),
            journalctl: "journalctl".into(),
            log_lines: 50,
            dashboard_log_lines: 20,
            filter_max_len: 20,
        }
    }
}

impl SudmanConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SudmanError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SudmanConfig =
            serde_yaml::from_str(&content).map_err(|source| SudmanError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the config to use.
    ///
    /// An explicit path (flag or `SUDMAN_CONFIG`) must exist; the default
    /// location silently falls back to built-in defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match resolve_path(explicit) {
            Some(path) => Self::load(&path),
            None => {
                debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.systemctl.trim().is_empty() {
            return Err(invalid("systemctl must not be empty"));
        }
        if self.journalctl.trim().is_empty() {
            return Err(invalid("journalctl must not be empty"));
        }
        if self.log_lines == 0 || self.dashboard_log_lines == 0 {
            return Err(invalid("log line counts must be at least 1"));
        }
        if self.filter_max_len == 0 {
            return Err(invalid("filter_max_len must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(details: &str) -> SudmanError {
    SudmanError::InvalidConfig {
        details: details.to_string(),
    }
}

/// The file [`SudmanConfig::discover`] would load, if any: the explicit
/// path, then `SUDMAN_CONFIG`, then the default location when it exists.
pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(env_path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(env_path));
    }
    default_path().filter(|path| path.exists())
}

/// `<config dir>/sudman/config.yml`, if the platform has a config dir
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sudman").join("config.yml"))
}
