//! Top-level assistant widget state.
//!
//! The controller owns the visible UI state and forwards user actions to the
//! [`TurnManager`] and the [`SessionStore`]. It holds no conversation
//! invariants of its own.

use std::sync::Arc;

use tracing::debug;

use crate::assistant::conversation::session::SessionHandle;
use crate::assistant::conversation::store::{HistoryEntrySummary, SessionStore};
use crate::assistant::conversation::turn::Turn;
use crate::assistant::core::config::AssistantConfig;
use crate::assistant::core::errors::AssistantResult;
use crate::assistant::core::role::UserRole;
use crate::assistant::core::settings::{DetailLevel, Language, Settings};
use crate::assistant::reply::service::ReplyService;
use crate::assistant::suggestions::suggestions_for;
use crate::assistant::turn_manager::{PendingSend, TurnManager};

/// Coordinator for one assistant widget instance.
pub struct WidgetController {
    open: bool,
    history_visible: bool,
    settings: Settings,
    role: Option<UserRole>,
    input: String,
    store: SessionStore,
    turns: TurnManager,
}

impl WidgetController {
    /// Create a closed widget with default settings.
    #[must_use]
    pub fn new(service: Arc<dyn ReplyService>, role: Option<UserRole>) -> Self {
        Self {
            open: false,
            history_visible: false,
            settings: Settings::default(),
            role,
            input: String::new(),
            store: SessionStore::new(),
            turns: TurnManager::new(service),
        }
    }

    /// Create a widget with the settings and role from `config`.
    #[must_use]
    pub fn from_config(service: Arc<dyn ReplyService>, config: &AssistantConfig) -> Self {
        let mut widget = Self::new(service, config.role);
        widget.settings = config.settings;
        widget
    }

    /// Whether the widget is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Open the widget.
    pub fn open(&mut self) {
        self.open = true;
    }

    /// Close the widget. In-flight sends keep running.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Flip open/closed.
    pub fn toggle_open(&mut self) {
        self.open = !self.open;
    }

    /// Whether the history drawer is shown.
    #[must_use]
    pub const fn is_history_visible(&self) -> bool {
        self.history_visible
    }

    /// Show or hide the history drawer.
    pub fn toggle_history(&mut self) {
        self.history_visible = !self.history_visible;
    }

    /// Current settings.
    #[must_use]
    pub const fn settings(&self) -> Settings {
        self.settings
    }

    /// Change the reply language.
    pub fn set_language(&mut self, language: Language) {
        self.settings.language = language;
    }

    /// Change the detail level.
    pub fn set_detail_level(&mut self, detail_level: DetailLevel) {
        self.settings.detail_level = detail_level;
    }

    /// Flip advanced mode.
    pub fn toggle_advanced_mode(&mut self) {
        self.settings.advanced_mode = !self.settings.advanced_mode;
    }

    /// Flip the voice input flag. Speech capture is not handled here.
    pub fn toggle_voice_input(&mut self) {
        self.settings.voice_input_active = !self.settings.voice_input_active;
    }

    /// Role the suggestions are picked for.
    #[must_use]
    pub const fn role(&self) -> Option<UserRole> {
        self.role
    }

    /// Starter prompts for the current role.
    #[must_use]
    pub fn suggestions(&self) -> Vec<&'static str> {
        suggestions_for(self.role)
    }

    /// Current input draft.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the input draft.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Whether a send is in flight.
    #[must_use]
    pub fn is_sending(&self) -> bool {
        self.turns.is_busy()
    }

    /// Send the input draft. The draft is cleared when a turn is created.
    pub fn submit_input(&mut self) -> Option<PendingSend> {
        let text = self.input.clone();
        self.send_text(&text)
    }

    /// Send `text` into the active session.
    pub fn send_text(&mut self, text: &str) -> Option<PendingSend> {
        let pending = self.turns.submit(text, self.store.active())?;
        self.input.clear();
        Some(pending)
    }

    /// Send the suggestion at `index`, if there is one.
    pub fn send_suggestion(&mut self, index: usize) -> Option<PendingSend> {
        let suggestion = *self.suggestions().get(index)?;
        debug!(index, suggestion, "suggestion chosen");
        self.send_text(suggestion)
    }

    /// Archive the current conversation and start an empty one.
    pub fn new_chat(&mut self) {
        self.store.start_new_session();
    }

    /// Resume the archived session at `index`.
    ///
    /// # Errors
    /// Returns an error if `index` is out of range; nothing changes then.
    pub fn select_history(&mut self, index: usize) -> AssistantResult<()> {
        self.store.select_history_session(index)
    }

    /// Drop all archived sessions.
    pub fn clear_history(&mut self) {
        self.store.clear_history();
    }

    /// Handle to the active session.
    #[must_use]
    pub fn active_session(&self) -> &SessionHandle {
        self.store.active()
    }

    /// Copy of the active session's turns.
    #[must_use]
    pub fn active_turns(&self) -> Vec<Turn> {
        self.store.active().read(|s| s.turns().to_vec())
    }

    /// Error banner text of the active session.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.store.active().read(|s| s.error_message().map(str::to_string))
    }

    /// History drawer rows, newest first.
    #[must_use]
    pub fn history_entries(&self) -> Vec<HistoryEntrySummary> {
        self.store.history_newest_first()
    }

    /// Underlying session store.
    #[must_use]
    pub const fn store(&self) -> &SessionStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio::sync::mpsc::UnboundedReceiver;

    use super::*;
    use crate::assistant::core::errors::AssistantError;
    use crate::assistant::testing::{ManualReplyService, ReplyCall};

    fn widget(role: Option<UserRole>) -> (WidgetController, UnboundedReceiver<ReplyCall>) {
        let (service, calls) = ManualReplyService::new();
        (WidgetController::new(service, role), calls)
    }

    #[test]
    fn test_ui_toggles() {
        let (mut w, _calls) = widget(None);
        assert!(!w.is_open());
        w.toggle_open();
        assert!(w.is_open());
        w.close();
        assert!(!w.is_open());
        w.open();
        w.toggle_history();
        assert!(w.is_history_visible());

        w.set_language(Language::Bilingual);
        w.set_detail_level(DetailLevel::Expert);
        w.toggle_advanced_mode();
        w.toggle_voice_input();
        let settings = w.settings();
        assert_eq!(settings.language, Language::Bilingual);
        assert_eq!(settings.detail_level, DetailLevel::Expert);
        assert!(settings.advanced_mode);
        assert!(settings.voice_input_active);

        w.toggle_voice_input();
        assert!(!w.settings().voice_input_active);
    }

    #[test]
    fn test_from_config_applies_settings_and_role() {
        let (service, _calls) = ManualReplyService::new();
        let mut config = AssistantConfig::new().with_role(Some(UserRole::Coach));
        config.settings.language = Language::Secondary;
        let w = WidgetController::from_config(service, &config);
        assert_eq!(w.role(), Some(UserRole::Coach));
        assert_eq!(w.settings().language, Language::Secondary);
        assert_eq!(w.suggestions()[0], "Manage my team");
    }

    #[test]
    fn test_submit_clears_input_only_when_turn_created() {
        let (mut w, _calls) = widget(None);
        w.set_input("   ");
        assert!(w.submit_input().is_none());
        assert_eq!(w.input(), "   ");

        w.set_input("How do I register?");
        let pending = w.submit_input();
        assert!(pending.is_some());
        assert_eq!(w.input(), "");
        assert_eq!(w.active_turns().len(), 1);
        assert!(w.is_sending());

        w.set_input("typed while waiting");
        assert!(w.submit_input().is_none());
        assert_eq!(w.input(), "typed while waiting");
        assert_eq!(w.active_turns().len(), 1);
    }

    #[test]
    fn test_send_suggestion() {
        let (mut w, _calls) = widget(Some(UserRole::Coach));
        assert!(w.send_suggestion(99).is_none());
        let pending = w.send_suggestion(1);
        assert!(pending.is_some());
        assert_eq!(w.active_turns()[0].message(), "View training tips");
    }

    #[tokio::test]
    async fn test_reply_after_new_chat_lands_in_archived_session() {
        let (mut w, mut calls) = widget(None);
        let pending = w.send_text("slow question").expect("send");
        let task = tokio::spawn(pending.settle());
        let call = calls.recv().await.expect("call");

        w.new_chat();
        assert!(w.active_turns().is_empty());
        assert_eq!(w.store().history_len(), 1);

        call.succeed(json!({ "data": { "reply": "late answer" } }));
        task.await.expect("settle task");

        let archived = w.store().history_entry(0).unwrap_or_default();
        assert_eq!(archived.turns()[0].reply(), "late answer");
        assert!(w.active_turns().is_empty());
    }

    #[tokio::test]
    async fn test_late_reply_shows_in_resumed_session() {
        let (mut w, mut calls) = widget(None);
        let task = tokio::spawn(w.send_text("q1").expect("send").settle());
        let call = calls.recv().await.expect("call");

        w.new_chat();
        assert!(w.select_history(0).is_ok());
        assert!(w.active_turns()[0].is_pending());

        call.succeed(json!({ "data": { "reply": "a1" } }));
        task.await.expect("settle task");

        assert_eq!(w.active_turns()[0].reply(), "a1");

        drop(w.send_text("q2"));
        w.new_chat();
        let rows = w.history_entries();
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].index, rows[0].turn_count), (1, 2));
        let extended = w.store().history_entry(1).unwrap_or_default();
        assert_eq!(extended.turns()[0].reply(), "a1");
    }

    #[tokio::test]
    async fn test_failed_send_shows_error_on_active_session() {
        let (mut w, mut calls) = widget(None);
        let task = tokio::spawn(w.send_text("anyone there?").expect("send").settle());
        calls.recv().await.expect("call").fail("timeout");
        task.await.expect("settle task");

        assert!(w.error_message().is_some_and(|m| m.contains("timeout")));
        assert!(w.active_turns()[0].is_pending());
        assert!(!w.is_sending());
    }

    #[test]
    fn test_history_navigation() {
        let (mut w, _calls) = widget(None);
        drop(w.send_text("first chat"));
        w.new_chat();
        drop(w.send_text("second chat"));
        w.new_chat();

        let rows = w.history_entries();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "second chat");

        assert!(matches!(
            w.select_history(5),
            Err(AssistantError::InvalidHistoryIndex { index: 5, len: 2 })
        ));
        assert!(w.select_history(0).is_ok());
        assert_eq!(w.active_turns()[0].message(), "first chat");

        w.clear_history();
        assert!(w.history_entries().is_empty());
        assert_eq!(w.active_turns().len(), 1);
    }
}
