//! Conversation sessions and the shared handle used by in-flight sends.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::assistant::conversation::turn::Turn;
use crate::assistant::core::ids::SessionId;

/// Maximum characters kept when deriving a title from the first message.
const TITLE_MAX_CHARS: usize = 40;

/// An ordered sequence of turns forming one conversation.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    turns: Vec<Turn>,
    error_message: Option<String>,
}

impl Session {
    /// Create an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log correlation identifier.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Turns in conversation order.
    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of turns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the session holds no turns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Error banner text from the most recent failed send, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Title derived from the first user message.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        let first = self.turns.first()?.message().trim();
        if first.chars().count() <= TITLE_MAX_CHARS {
            return Some(first.to_string());
        }
        let mut title: String = first.chars().take(TITLE_MAX_CHARS).collect();
        title.push('…');
        Some(title)
    }

    /// Append a turn and return its index.
    pub(crate) fn push_turn(&mut self, turn: Turn) -> usize {
        self.turns.push(turn);
        self.turns.len() - 1
    }

    /// Resolve the turn at `index`. Returns `false` if there is no pending turn there.
    pub(crate) fn resolve_turn(&mut self, index: usize, reply: String) -> bool {
        self.turns
            .get_mut(index)
            .is_some_and(|turn| turn.resolve(reply))
    }

    pub(crate) fn set_error(&mut self, message: String) {
        self.error_message = Some(message);
    }

    pub(crate) fn clear_error(&mut self) {
        self.error_message = None;
    }
}

/// Shared, lockable reference to one session.
///
/// An in-flight send keeps its own clone of the handle, so its reply lands
/// in the session it was created against even after the store has moved on.
/// Locks are only taken for short synchronous sections.
#[derive(Clone, Debug, Default)]
pub struct SessionHandle(Arc<RwLock<Session>>);

impl SessionHandle {
    /// Create a handle to a fresh empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing session value.
    #[must_use]
    pub fn from_session(session: Session) -> Self {
        Self(Arc::new(RwLock::new(session)))
    }

    /// Run `f` with shared access to the session.
    pub fn read<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        let guard = self.0.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Run `f` with exclusive access to the session.
    pub(crate) fn write<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut guard = self.0.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Deep copy of the current session value.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.read(Clone::clone)
    }

    /// Session identifier.
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.read(Session::id)
    }

    /// Number of turns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read(Session::len)
    }

    /// Whether the session holds no turns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read(Session::is_empty)
    }

    /// Whether both handles point at the same session object.
    #[must_use]
    pub fn same_session(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
