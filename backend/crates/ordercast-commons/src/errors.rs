//! Error types for ordercast-commons

use thiserror::Error;

/// Failure to move a notification payload through the wire codec
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Failed to encode notification: {0}")]
    Encode(String),

    #[error("Malformed notification payload: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, CodecError>;
