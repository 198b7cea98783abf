//! Error types for ordercast-core

use ordercast_commons::CodecError;
use thiserror::Error;

/// Errors that can occur while opening sessions or moving notifications
#[derive(Error, Debug)]
pub enum LiveError {
    /// Payload could not be encoded, or a received payload could not be decoded
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Channel bus error: {0}")]
    Bus(String),

    /// The session's stream is gone; the session has been deregistered
    #[error("Session closed: {0}")]
    SessionClosed(String),

    /// The session's buffer is full; the event was dropped
    #[error("Session buffer full: {0}")]
    SessionBackpressure(String),

    #[error("Connection limit reached ({0})")]
    ConnectionLimit(usize),

    #[error("Server is shutting down")]
    ShuttingDown,
}

/// Result type for live operations
pub type Result<T> = std::result::Result<T, LiveError>;
