//! Error types for the facade.

use chainrules_core::{ConfigCompatError, CoreError};
use thiserror::Error;

/// Errors that can occur while selecting, loading or applying a configuration.
#[derive(Debug, Error)]
pub enum ChainRulesError {
    /// Core encoding or validation error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Stored and candidate configurations conflict.
    #[error(transparent)]
    Compat(#[from] ConfigCompatError),

    /// Reading a configuration file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration document is not valid JSON for a chain config.
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),

    /// No preset with this name.
    #[error("unknown network: {0}")]
    UnknownNetwork(String),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, ChainRulesError>;
