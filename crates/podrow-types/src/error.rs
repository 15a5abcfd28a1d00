//! Error types for the pod row.

use std::io;

/// Errors produced by the pod row crates.
///
/// None of these ever cross into the host as a panic: inbound calls log the
/// failure and hand the value back so the caller can ignore it.
#[derive(Debug, thiserror::Error)]
pub enum PodRowError {
    #[error("pod not found: {0}")]
    PodNotFound(String),

    #[error("input rejected: {0}")]
    InputRejected(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("script error: {0}")]
    Script(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, PodRowError>;
