//! Per-widget display settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Language the assistant answers in.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    /// The application's primary language.
    #[default]
    Primary,
    /// The application's secondary language.
    Secondary,
    /// Both languages side by side.
    Bilingual,
}

impl Language {
    /// Stable string form for configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Bilingual => "bilingual",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "primary" => Ok(Self::Primary),
            "secondary" => Ok(Self::Secondary),
            "bilingual" => Ok(Self::Bilingual),
            _ => Err(value.to_string()),
        }
    }
}

/// How much detail replies should carry.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailLevel {
    /// Short answers.
    #[default]
    Basic,
    /// Answers with context.
    Detailed,
    /// Full answers for experienced users.
    Expert,
}

impl DetailLevel {
    /// Stable string form for configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Detailed => "detailed",
            Self::Expert => "expert",
        }
    }
}

impl fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DetailLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "detailed" => Ok(Self::Detailed),
            "expert" => Ok(Self::Expert),
            _ => Err(value.to_string()),
        }
    }
}

/// Widget settings. Shared by every session of one widget instance.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Reply language.
    pub language: Language,
    /// Reply detail level.
    pub detail_level: DetailLevel,
    /// Advanced mode toggle.
    pub advanced_mode: bool,
    /// Whether voice input is currently on. Capture itself happens elsewhere.
    pub voice_input_active: bool,
}
