use std::path::PathBuf;

use logparser::ParseError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Game not found: {0}")]
    GameNotFound(String),
}

impl ReplayError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
