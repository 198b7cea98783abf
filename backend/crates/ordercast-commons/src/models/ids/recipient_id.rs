//! Type-safe wrapper for notification recipients.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity a notification is addressed to.
///
/// Resolved from an already-authenticated request (typically the user's email).
/// The raw string doubles as the channel bus topic name, so it is used verbatim
/// and never normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipientId(String);

/// Error type for RecipientId validation failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientIdValidationError(pub String);

impl fmt::Display for RecipientIdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for RecipientIdValidationError {}

impl RecipientId {
    /// Longest identity accepted (the maximum length of an email address).
    pub const MAX_LEN: usize = 320;

    /// Wrap an identity that is already known to be valid.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Validate and wrap an identity coming from outside the process.
    ///
    /// Rejects empty values, values longer than [`Self::MAX_LEN`] and values
    /// containing control characters (a newline would corrupt SSE framing).
    pub fn try_new(id: impl Into<String>) -> Result<Self, RecipientIdValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(RecipientIdValidationError("Recipient id cannot be empty".to_string()));
        }
        if id.len() > Self::MAX_LEN {
            return Err(RecipientIdValidationError(format!(
                "Recipient id exceeds {} bytes",
                Self::MAX_LEN
            )));
        }
        if id.chars().any(char::is_control) {
            return Err(RecipientIdValidationError(
                "Recipient id cannot contain control characters".to_string(),
            ));
        }
        Ok(Self(id))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The bus topic this recipient's notifications are published on.
    #[inline]
    pub fn topic(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RecipientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for RecipientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecipientId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
