//! Crate-level error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::identify::IdentifyError;
use crate::network::ModelError;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that stop the service from starting.  Per-request failures are
/// folded into the JSON response instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Identification client error: {0}")]
    Identify(#[from] IdentifyError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
