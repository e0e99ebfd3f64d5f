//! Error types for rf433d
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using SwitchError
pub type Result<T> = std::result::Result<T, SwitchError>;

/// Unified error type for rf433d operations
#[derive(Debug, Error)]
pub enum SwitchError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Command Errors (answered with the failure token, never fatal)
    // -------------------------------------------------------------------------
    #[error("Incomplete command: {0}")]
    IncompleteCommand(String),

    #[error("Unknown protocol: {0:?}")]
    UnknownProtocol(char),

    #[error("Unsupported code: {0}")]
    UnsupportedCode(String),

    #[error("Out of range: {0}")]
    OutOfRange(String),

    #[error("Unsupported action: {0}")]
    UnsupportedAction(u8),

    #[error("Malformed group code: {0:?}")]
    MalformedGroup(String),

    // -------------------------------------------------------------------------
    // Transmitter Errors
    // -------------------------------------------------------------------------
    #[error("Transmit failed: {0}")]
    Transmit(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SwitchError {
    /// Whether this error was caused by the request itself
    ///
    /// Command errors are answered with the failure token and the server
    /// moves on to the next connection.
    pub fn is_command_error(&self) -> bool {
        matches!(
            self,
            SwitchError::IncompleteCommand(_)
                | SwitchError::UnknownProtocol(_)
                | SwitchError::UnsupportedCode(_)
                | SwitchError::OutOfRange(_)
                | SwitchError::UnsupportedAction(_)
                | SwitchError::MalformedGroup(_)
        )
    }
}
