//! Error types.
//!
//! Only startup can fail: a bad configuration or a window that will not
//! open.  Everything after that degrades to "keep the previous frame".

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path:?}: {source}")]
    Read {
        path:   PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse config {path:?}: {source}")]
    Parse {
        path:   PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum SwarmError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("window: {0}")]
    Window(String),

    #[error("detector: {0}")]
    Detector(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = SwarmError> = std::result::Result<T, E>;
