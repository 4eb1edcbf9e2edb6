//! Active session and archived history.
//!
//! History is kept in chronological order: index 0 is the oldest archived
//! session and new archives are appended at the back, so an index keeps
//! naming the same entry until the history is cleared. Use
//! [`SessionStore::history_newest_first`] for display order.
//!
//! A resumed entry is a copy. Turns that were still pending when it was
//! copied pick up their reply from the archived original once it arrives.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::assistant::conversation::session::{Session, SessionHandle};
use crate::assistant::core::errors::{AssistantError, AssistantResult};

/// Display row for one archived session.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct HistoryEntrySummary {
    /// Position in the history list.
    pub index: usize,
    /// Title derived from the first message.
    pub title: String,
    /// Number of turns.
    pub turn_count: usize,
    /// When the first turn was created.
    pub started_at: Option<DateTime<Utc>>,
}

/// Owner of the active session and the archived-session history.
#[derive(Debug, Default)]
pub struct SessionStore {
    active: SessionHandle,
    history: Vec<SessionHandle>,
    current_index: Option<usize>,
    /// Turn count of the active session when it was copied out of history.
    loaded_len: Option<usize>,
    /// Archived original of the active copy and the number of turns copied.
    view_source: Option<(SessionHandle, usize)>,
}

impl SessionStore {
    /// Create a store with an empty active session and no history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the active session, with late replies from its archived
    /// original already applied.
    #[must_use]
    pub fn active(&self) -> &SessionHandle {
        self.refresh_resumed_view();
        &self.active
    }

    /// Index of the history entry currently loaded into the active session.
    #[must_use]
    pub const fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Number of archived sessions.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Copy of the archived session at `index`.
    #[must_use]
    pub fn history_entry(&self, index: usize) -> Option<Session> {
        self.history.get(index).map(SessionHandle::snapshot)
    }

    /// Summaries of archived sessions, newest first.
    #[must_use]
    pub fn history_newest_first(&self) -> Vec<HistoryEntrySummary> {
        self.history
            .iter()
            .enumerate()
            .rev()
            .map(|(index, handle)| {
                handle.read(|session| HistoryEntrySummary {
                    index,
                    title: session.title().unwrap_or_default(),
                    turn_count: session.len(),
                    started_at: session.turns().first().map(|turn| turn.created_at()),
                })
            })
            .collect()
    }

    /// Archive the active session (when it has turns) and start an empty one.
    pub fn start_new_session(&mut self) {
        self.archive_active();
        self.active = SessionHandle::new();
        self.current_index = None;
        self.loaded_len = None;
        self.view_source = None;
        debug!(
            session_id = %self.active.id(),
            history_len = self.history.len(),
            "started new session"
        );
    }

    /// Load a copy of `history[index]` as the active session.
    ///
    /// The previously active session is archived first by the same rule as
    /// [`Self::start_new_session`].
    ///
    /// # Errors
    /// Returns [`AssistantError::InvalidHistoryIndex`] without touching any
    /// state when `index` is out of range.
    pub fn select_history_session(&mut self, index: usize) -> AssistantResult<()> {
        let len = self.history.len();
        let Some(entry) = self.history.get(index) else {
            return Err(AssistantError::InvalidHistoryIndex { index, len });
        };

        let source = entry.clone();
        let mut copy = source.snapshot();
        copy.clear_error();

        self.archive_active();
        self.loaded_len = Some(copy.len());
        self.view_source = Some((source, copy.len()));
        self.active = SessionHandle::from_session(copy);
        self.current_index = Some(index);

        debug!(
            session_id = %self.active.id(),
            index,
            history_len = self.history.len(),
            "resumed archived session"
        );
        Ok(())
    }

    /// Drop every archived session. The active session is left as is and
    /// still receives late replies for turns it copied.
    pub fn clear_history(&mut self) {
        let cleared = self.history.len();
        self.history.clear();
        self.current_index = None;
        self.loaded_len = None;
        debug!(cleared, "cleared session history");
    }

    /// Move the active session into history. Returns whether anything was archived.
    fn archive_active(&mut self) -> bool {
        self.refresh_resumed_view();
        let len = self.active.len();
        if len == 0 {
            return false;
        }
        // An untouched copy of a history entry is already archived.
        if self.current_index.is_some() && self.loaded_len == Some(len) {
            return false;
        }

        let archived = std::mem::take(&mut self.active);
        debug!(
            session_id = %archived.id(),
            turns = len,
            index = self.history.len(),
            "archived session"
        );
        self.history.push(archived);
        true
    }

    /// Copy replies that reached the archived original into the matching
    /// still-pending turns of the active copy.
    fn refresh_resumed_view(&self) {
        let Some((source, copied)) = &self.view_source else {
            return;
        };

        let pending: Vec<usize> = self.active.read(|session| {
            session
                .turns()
                .iter()
                .take(*copied)
                .enumerate()
                .filter(|(_, turn)| turn.is_pending())
                .map(|(index, _)| index)
                .collect()
        });
        if pending.is_empty() {
            return;
        }

        let replies: Vec<(usize, String)> = source.read(|session| {
            pending
                .iter()
                .filter_map(|&index| {
                    let turn = session.turns().get(index)?;
                    (!turn.is_pending()).then(|| (index, turn.reply().to_string()))
                })
                .collect()
        });
        if replies.is_empty() {
            return;
        }

        let applied = self.active.write(|session| {
            replies
                .into_iter()
                .map(|(index, reply)| session.resolve_turn(index, reply))
                .filter(|resolved| *resolved)
                .count()
        });
        debug!(
            session_id = %self.active.id(),
            applied,
            "applied late replies to resumed session"
        );
    }
}
