use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for one open stream session.
///
/// Two sessions for the same recipient (a reconnect, or a second browser tab)
/// share a `RecipientId` but never a `SessionId`; cleanup uses it to avoid
/// evicting a newer session that replaced this one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    #[inline]
    pub fn new(unique_id: impl Into<String>) -> Self {
        Self(unique_id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
