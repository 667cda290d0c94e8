//! Error types for metric sources.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("remote source failed: {0}")]
    Remote(String),

    #[error("invalid target {target:?}: {detail}")]
    InvalidTarget { target: String, detail: String },

    #[error("failed to parse fixture: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("fixture io error: {0}")]
    Io(#[from] std::io::Error),
}
