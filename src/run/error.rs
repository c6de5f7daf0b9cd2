//! Run loop errors.

use crate::builder::BuildError;
use crate::config::ConfigError;
use thiserror::Error;

/// Errors a driver can report while it is wired into the loop.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DriverError {
    /// The driver could not describe its action kinds
    #[error(transparent)]
    Build(#[from] BuildError),

    /// The driver's static configuration is unusable
    #[error("Invalid driver configuration: {0}")]
    InvalidConfig(String),
}

/// Errors that abort wiring or running the loop.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Driver `{driver}` failed to start: {source}")]
    Driver {
        driver: String,
        #[source]
        source: DriverError,
    },

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Connection point is already connected")]
    AlreadyConnected,
}
