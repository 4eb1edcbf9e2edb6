//! Application roles as seen by the assistant.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role of the signed-in user. A missing role is modelled as `Option::None`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Visitor without an account.
    Guest,
    /// Platform administrator.
    Admin,
    /// Tournament participant.
    Player,
    /// Match official.
    Judge,
    /// Team coach.
    Coach,
    /// Tournament organizer.
    Organizer,
}

impl UserRole {
    /// Stable string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Admin => "admin",
            Self::Player => "player",
            Self::Judge => "judge",
            Self::Coach => "coach",
            Self::Organizer => "organizer",
        }
    }

    /// Parse a role name coming from the auth layer; unknown names map to `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "guest" => Ok(Self::Guest),
            "admin" => Ok(Self::Admin),
            "player" => Ok(Self::Player),
            "judge" => Ok(Self::Judge),
            "coach" => Ok(Self::Coach),
            "organizer" => Ok(Self::Organizer),
            _ => Err(value.to_string()),
        }
    }
}
