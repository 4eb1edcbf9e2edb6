//! Starter prompts offered before the user types anything.

use crate::assistant::core::role::UserRole;

/// Prompts offered to every role, after any role-specific ones.
pub const BASELINE_SUGGESTIONS: [&str; 5] = [
    "How do I register?",
    "Show upcoming tournaments",
    "Explain the tournament rules",
    "How does scoring work?",
    "Contact support",
];

const fn role_suggestions(role: Option<UserRole>) -> &'static [&'static str] {
    match role {
        Some(UserRole::Guest) => &["Create an account", "Browse public tournaments"],
        Some(UserRole::Admin) => &["Manage users", "Review system reports"],
        Some(UserRole::Player) => &["View my matches", "Check my ranking"],
        Some(UserRole::Judge) => &["View my assigned matches", "Submit match scores"],
        Some(UserRole::Coach) => &["Manage my team", "View training tips"],
        Some(UserRole::Organizer) => &["Create a tournament", "Manage registrations"],
        None => &[],
    }
}

/// Ordered suggestions for `role`: role-specific prompts, then the baseline.
#[must_use]
pub fn suggestions_for(role: Option<UserRole>) -> Vec<&'static str> {
    role_suggestions(role)
        .iter()
        .chain(BASELINE_SUGGESTIONS.iter())
        .copied()
        .collect()
}

/// Same as [`suggestions_for`] for a raw role name; unknown names get the baseline.
#[must_use]
pub fn suggestions_for_role_name(name: &str) -> Vec<&'static str> {
    suggestions_for(UserRole::from_name(name))
}
