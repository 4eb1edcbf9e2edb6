//! Message submission and asynchronous reply reconciliation.
//!
//! A send is split in two halves. [`TurnManager::submit`] runs
//! synchronously: it checks the input, takes the in-flight guard and appends
//! a pending turn. [`PendingSend::settle`] awaits the reply service and
//! patches the turn at the index captured by `submit`, in the session
//! captured by `submit`. The guard travels with the [`PendingSend`] and is
//! released when it is settled or dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::assistant::conversation::session::SessionHandle;
use crate::assistant::conversation::turn::Turn;
use crate::assistant::core::errors::AssistantError;
use crate::assistant::core::ids::SessionId;
use crate::assistant::reply::service::ReplyService;
use crate::assistant::reply::shape::extract_reply;

/// How a settled send ended.
#[derive(Debug)]
pub enum SendOutcome {
    /// The turn received its reply.
    Replied {
        /// Index of the patched turn.
        turn_index: usize,
        /// Reply text stored on the turn.
        reply: String,
    },
    /// The reply service failed; the turn stays pending.
    Rejected {
        /// Index of the pending turn.
        turn_index: usize,
        /// Failure reported by the service.
        error: AssistantError,
    },
}

impl SendOutcome {
    /// Index of the turn this outcome belongs to.
    #[must_use]
    pub const fn turn_index(&self) -> usize {
        match self {
            Self::Replied { turn_index, .. } | Self::Rejected { turn_index, .. } => *turn_index,
        }
    }

    /// Whether the send produced a reply.
    #[must_use]
    pub const fn is_replied(&self) -> bool {
        matches!(self, Self::Replied { .. })
    }
}

/// Holds the in-flight flag for as long as it lives.
#[derive(Debug)]
struct BusyGuard(Arc<AtomicBool>);

impl BusyGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(Arc::clone(flag)))
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A submitted turn whose reply has not been requested yet.
#[must_use = "the turn stays pending and the manager busy until this is settled or dropped"]
pub struct PendingSend {
    service: Arc<dyn ReplyService>,
    session: SessionHandle,
    session_id: SessionId,
    turn_index: usize,
    text: String,
    _guard: BusyGuard,
}

impl PendingSend {
    /// Index of the optimistic turn in its session.
    #[must_use]
    pub const fn turn_index(&self) -> usize {
        self.turn_index
    }

    /// Session the turn was appended to.
    #[must_use]
    pub const fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Request the reply and patch it into the turn.
    ///
    /// On failure the turn is left pending and the session error message is
    /// set. The in-flight guard is released in both cases.
    pub async fn settle(self) -> SendOutcome {
        let result = self.service.send_reply(self.text.clone()).await;
        let turn_index = self.turn_index;

        match result {
            Ok(raw) => {
                let reply = extract_reply(&raw);
                let applied = self
                    .session
                    .write(|session| session.resolve_turn(turn_index, reply.clone()));
                if applied {
                    info!(
                        session_id = %self.session_id,
                        turn_index,
                        reply_chars = reply.chars().count(),
                        "turn resolved"
                    );
                } else {
                    warn!(
                        session_id = %self.session_id,
                        turn_index,
                        "turn was already resolved; reply discarded"
                    );
                }
                SendOutcome::Replied { turn_index, reply }
            }
            Err(error) => {
                warn!(
                    session_id = %self.session_id,
                    turn_index,
                    error = %error,
                    "reply request failed"
                );
                let message = format!("Failed to get a reply: {error}");
                self.session.write(|session| session.set_error(message));
                SendOutcome::Rejected { turn_index, error }
            }
        }
    }
}

/// Serializes message submission and reconciles replies.
pub struct TurnManager {
    service: Arc<dyn ReplyService>,
    busy: Arc<AtomicBool>,
}

impl TurnManager {
    /// Create a manager sending through `service`.
    #[must_use]
    pub fn new(service: Arc<dyn ReplyService>) -> Self {
        Self {
            service,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a send is currently in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Append a pending turn for `text` to `session`.
    ///
    /// Returns `None` without touching the session when `text` is blank or
    /// another send from this manager is still in flight.
    pub fn submit(&self, text: &str, session: &SessionHandle) -> Option<PendingSend> {
        if text.trim().is_empty() {
            debug!("ignoring blank message");
            return None;
        }

        let Some(guard) = BusyGuard::acquire(&self.busy) else {
            debug!("send already in flight; ignoring message");
            return None;
        };

        let (session_id, turn_index) = session.write(|s| {
            s.clear_error();
            (s.id(), s.push_turn(Turn::pending(text)))
        });
        debug!(%session_id, turn_index, "appended pending turn");

        Some(PendingSend {
            service: Arc::clone(&self.service),
            session: session.clone(),
            session_id,
            turn_index,
            text: text.to_string(),
            _guard: guard,
        })
    }

    /// Submit and settle in one call. `None` when the submission was ignored.
    pub async fn send(&self, text: &str, session: &SessionHandle) -> Option<SendOutcome> {
        match self.submit(text, session) {
            Some(pending) => Some(pending.settle().await),
            None => None,
        }
    }

    /// Submit and settle on a background task.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn spawn_send(
        &self,
        text: &str,
        session: &SessionHandle,
    ) -> Option<JoinHandle<SendOutcome>> {
        self.submit(text, session)
            .map(|pending| tokio::spawn(pending.settle()))
    }
}
