//! Error types for the fallible boundaries: configuration files and saves.

use thiserror::Error;

/// Failure to read a game configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Failure to write or read a level snapshot.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("encode error: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("decode error: {0}")]
    Decode(#[from] bincode::error::DecodeError),
}
