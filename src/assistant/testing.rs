//! Hand-driven reply service for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::assistant::core::errors::{AssistantError, AssistantResult};
use crate::assistant::reply::service::{ReplyFuture, ReplyService};

/// One outstanding call; the test decides how it settles.
pub struct ReplyCall {
    pub text: String,
    responder: oneshot::Sender<AssistantResult<Value>>,
}

impl ReplyCall {
    pub fn succeed(self, raw: Value) {
        let _ = self.responder.send(Ok(raw));
    }

    pub fn fail(self, reason: &str) {
        let _ = self
            .responder
            .send(Err(AssistantError::SendRejected(reason.to_string())));
    }
}

/// Reply service that forwards every call to the test through a channel.
pub struct ManualReplyService {
    calls: mpsc::UnboundedSender<ReplyCall>,
    count: AtomicUsize,
}

impl ManualReplyService {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<ReplyCall>) {
        let (calls, rx) = mpsc::unbounded_channel();
        let service = Arc::new(Self {
            calls,
            count: AtomicUsize::new(0),
        });
        (service, rx)
    }

    pub fn call_count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl ReplyService for ManualReplyService {
    fn send_reply(&self, text: String) -> ReplyFuture<'_> {
        self.count.fetch_add(1, Ordering::SeqCst);
        let (responder, settled) = oneshot::channel();
        let _ = self.calls.send(ReplyCall { text, responder });
        Box::pin(async move {
            settled.await.unwrap_or_else(|_| {
                Err(AssistantError::SendRejected("test dropped the call".to_string()))
            })
        })
    }
}
