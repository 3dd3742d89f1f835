//! Session-level error taxonomy.
//!
//! Per-unit operations report through [`crate::control::Outcome`]; these
//! errors are reserved for failures that abort a CLI command or the whole
//! dashboard session.

use std::path::PathBuf;

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, SudmanError>;

#[derive(Debug, Error)]
pub enum SudmanError {
    #[error("systemd is not available on this system.")]
    SystemdUnavailable,

    #[error("systemd user session is not active.")]
    SessionInactive,

    #[error("Unit {name} not found.")]
    UnitNotFound { name: String },

    #[error("cannot read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config: {details}")]
    InvalidConfig { details: String },

    #[error("terminal failure: {source}")]
    Terminal {
        #[source]
        source: std::io::Error,
    },
}

impl SudmanError {
    /// Whether this error ends the whole session rather than one operation.
    pub fn is_session_fatal(&self) -> bool {
        matches!(
            self,
            Self::SystemdUnavailable | Self::SessionInactive | Self::Terminal { .. }
        )
    }
}
