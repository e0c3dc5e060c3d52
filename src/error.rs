//! Crate error type
//!
//! Only the configuration boundary can fail. Once a [`crate::sim::Session`] exists,
//! every simulation operation is infallible.

use thiserror::Error;

/// Errors raised while building a session from configuration
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown difficulty preset `{0}` (expected easy, medium or hard)")]
    UnknownDifficulty(String),

    #[error("task `{task}` has a zero period")]
    ZeroPeriod { task: &'static str },

    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
