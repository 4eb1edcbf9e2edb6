//! One user message and its reply.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user message paired with its (possibly pending) assistant reply.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    message: String,
    reply: String,
    created_at: DateTime<Utc>,
}

impl Turn {
    /// Build a pending turn for a freshly submitted message.
    #[must_use]
    pub fn pending(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            reply: String::new(),
            created_at: Utc::now(),
        }
    }

    /// User-authored text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Assistant text; empty while pending.
    #[must_use]
    pub fn reply(&self) -> &str {
        &self.reply
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the reply is still outstanding.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.reply.is_empty()
    }

    /// Fill in the reply.
    ///
    /// Returns `false` and leaves the turn untouched when it is already
    /// resolved or `reply` is empty.
    pub fn resolve(&mut self, reply: impl Into<String>) -> bool {
        let reply = reply.into();
        if !self.is_pending() || reply.is_empty() {
            return false;
        }
        self.reply = reply;
        true
    }
}
