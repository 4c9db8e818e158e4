// ABOUTME: Application-wide error types for releasectl.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::release::{ExitOutcome, PolicyError, ReleaseError};

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid policy: {0}")]
    Policy(#[from] PolicyError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Release(#[from] ReleaseError),
}

impl Error {
    /// Anything that fails before the controller runs is a configuration problem.
    pub fn outcome(&self) -> ExitOutcome {
        match self {
            Error::Release(e) => e.outcome(),
            _ => ExitOutcome::ConfigurationError,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
