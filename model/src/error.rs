use std::path::PathBuf;

use thiserror::Error;

/// Errors returned while loading or validating model artifacts.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model: read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("model: parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("model: {what} has {got} values, expected {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("model: {0}")]
    Invalid(String),
}
