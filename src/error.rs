//! Error types for annex-remote
//!
//! Provides a unified error type for the protocol engine and the handlers
//! that sit behind it.

use thiserror::Error;

/// Result type alias using AnnexError
pub type Result<T> = std::result::Result<T, AnnexError>;

/// Unified error type for protocol operations
#[derive(Debug, Error)]
pub enum AnnexError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("End of stream")]
    EndOfStream,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    /// Reply did not have the shape the request expects. Carries the line.
    #[error("Protocol violation: unexpected line {0:?}")]
    ProtocolViolation(String),

    #[error("Unsupported command: {0}")]
    UnsupportedCommand(String),

    /// A parameter cannot be represented on the wire
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Protocol extension not available: {0}")]
    ExtensionUnavailable(String),

    /// The host sent `ERROR` and is giving up on the session
    #[error("Host error: {0}")]
    Host(String),

    // -------------------------------------------------------------------------
    // Handler Errors
    // -------------------------------------------------------------------------
    /// The requested operation failed; answered with the command's failure reply
    #[error("{0}")]
    Remote(String),

    /// The handler faulted; answered with `ERROR`
    #[error("Handler fault: {0}")]
    Handler(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AnnexError {
    /// Shorthand for an operation failure reported by a handler
    pub fn remote(message: impl Into<String>) -> Self {
        AnnexError::Remote(message.into())
    }

    /// Shorthand for a handler fault
    pub fn handler(message: impl Into<String>) -> Self {
        AnnexError::Handler(message.into())
    }

    /// Whether the session cannot continue after this error
    pub fn is_fatal(&self) -> bool {
        matches!(self, AnnexError::Io(_) | AnnexError::EndOfStream)
    }

    /// Message text suitable for a `-FAILURE` or `ERROR` reply
    pub fn reply_message(&self) -> String {
        match self {
            AnnexError::Remote(msg) | AnnexError::Handler(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}
