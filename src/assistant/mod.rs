//! Tournament assistant: conversation state, reply plumbing and widget control.

pub mod conversation;
pub mod core;
pub mod reply;
pub mod suggestions;
pub mod turn_manager;
pub mod widget;

#[cfg(test)]
pub(crate) mod testing;

pub use conversation::{HistoryEntrySummary, Session, SessionHandle, SessionStore, Turn};
pub use self::core::{
    AssistantConfig, AssistantError, AssistantResult, DetailLevel, Language, ReplyConfig,
    SessionId, Settings, UserRole,
};
pub use reply::{HttpReplyService, ReplyService, extract_reply};
pub use suggestions::{BASELINE_SUGGESTIONS, suggestions_for, suggestions_for_role_name};
pub use turn_manager::{PendingSend, SendOutcome, TurnManager};
pub use widget::WidgetController;
