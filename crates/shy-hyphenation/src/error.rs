use std::path::PathBuf;

use shy_patterns::PatternError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Hyphenation could not be configured. Pipeline construction must stop.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot load hyphenation patterns: {0}")]
    PatternLoad(#[from] PatternError),

    #[error("invalid hyphenation settings: {0}")]
    Settings(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }
}
