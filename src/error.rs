//! @ai:module:intent Define error types for console client operations
//! @ai:module:layer domain
//! @ai:module:public_api ConsoleError, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Unified error type for API calls and local file work
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Non-success response; `detail` is what the user should see.
    #[error("{detail}")]
    Api {
        status: reqwest::StatusCode,
        detail: String,
    },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response for {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    TomlWrite(#[from] toml::ser::Error),
}

impl ConsoleError {
    /// @ai:intent HTTP status of an API failure, if this is one
    /// @ai:effects pure
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            ConsoleError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
