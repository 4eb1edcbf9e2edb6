//! Boundary to the remote reply service.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use crate::assistant::core::errors::AssistantResult;

/// Boxed future type for reply service calls.
pub type ReplyFuture<'a> = Pin<Box<dyn Future<Output = AssistantResult<Value>> + Send + 'a>>;

/// Remote collaborator turning a user message into a raw reply value.
///
/// The value may be a bare string, an object carrying `data.reply`, or any
/// other JSON; see [`crate::assistant::reply::shape::extract_reply`].
pub trait ReplyService: Send + Sync {
    /// Send one user message.
    ///
    /// # Errors
    /// Returns an error if the request fails; the caller treats any error as
    /// a rejected send.
    fn send_reply(&self, text: String) -> ReplyFuture<'_>;
}
