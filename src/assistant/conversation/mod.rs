//! Conversation model: turns, sessions and the session store.

pub mod session;
pub mod store;
pub mod turn;

pub use session::{Session, SessionHandle};
pub use store::{HistoryEntrySummary, SessionStore};
pub use turn::Turn;
