//! Error types for RelayKV
//!
//! Provides a unified error type for producer and consumer operations.

use thiserror::Error;

/// Result type alias using RelayError
pub type Result<T> = std::result::Result<T, RelayError>;

/// Unified error type for RelayKV operations
#[derive(Debug, Error)]
pub enum RelayError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Producer Errors
    // -------------------------------------------------------------------------
    /// A command was built with a missing required parameter
    #[error("Invalid command: {0}")]
    Construction(String),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    /// Malformed envelope, payload or frame bytes
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("Transport error: {0}")]
    Transport(String),

    // -------------------------------------------------------------------------
    // Output Errors
    // -------------------------------------------------------------------------
    #[error("Output sink error: {0}")]
    Sink(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RelayError {
    /// Whether the error only affects the current message
    ///
    /// Decode and sink failures drop one message; everything else means the
    /// process cannot make progress.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RelayError::Decode(_) | RelayError::Sink(_))
    }
}
