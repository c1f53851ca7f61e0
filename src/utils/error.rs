//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while parsing path listings or trace logs
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Input contained no usable lines")]
    EmptyInput,

    #[error("Invalid input: {0}")]
    InvalidFormat(String),
}

/// Errors that can occur during tree filtering
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("No tree node matches namespace: {0}")]
    UnresolvedNamespace(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
