//! Line-oriented command parsing for the terminal front-end.

use crate::assistant::core::settings::{DetailLevel, Language};

/// One parsed line of console input.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// Plain text to send as a message.
    Message(String),
    /// Archive the conversation and start a new one.
    NewChat,
    /// List archived conversations.
    History,
    /// Resume the archived conversation at this display position.
    Open(usize),
    /// Drop every archived conversation.
    ClearHistory,
    /// List starter prompts.
    Suggestions,
    /// Send the starter prompt at this position.
    Pick(usize),
    /// Change reply language.
    Language(Language),
    /// Change detail level.
    Detail(DetailLevel),
    /// Flip advanced mode.
    Advanced,
    /// Flip the voice input flag.
    Voice,
    /// Show the command list.
    Help,
    /// Leave the console.
    Quit,
    /// Blank line.
    Empty,
    /// A slash command that could not be understood.
    Invalid(String),
}

/// Help text listing every command.
pub const HELP: &str = "\
/new            start a new conversation
/history        list archived conversations
/open N         resume archived conversation N
/clear          drop all archived conversations
/suggest        list starter prompts
/pick N         send starter prompt N
/lang L         primary | secondary | bilingual
/detail D       basic | detailed | expert
/advanced       toggle advanced mode
/voice          toggle voice input
/help           show this list
/quit           exit";

/// Parse one input line.
#[must_use]
pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Message(trimmed.to_string());
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default().to_ascii_lowercase();
    let arg = parts.next();

    match (name.as_str(), arg) {
        ("new", None) => Command::NewChat,
        ("history", None) => Command::History,
        ("clear", None) => Command::ClearHistory,
        ("suggest", None) => Command::Suggestions,
        ("advanced", None) => Command::Advanced,
        ("voice", None) => Command::Voice,
        ("help", None) => Command::Help,
        ("quit" | "exit", None) => Command::Quit,
        ("open", Some(n)) => parse_position(n).map_or_else(
            || Command::Invalid(format!("not a position: {n}")),
            Command::Open,
        ),
        ("pick", Some(n)) => parse_position(n).map_or_else(
            || Command::Invalid(format!("not a position: {n}")),
            Command::Pick,
        ),
        ("lang", Some(value)) => value
            .parse::<Language>()
            .map_or_else(Command::Invalid, Command::Language),
        ("detail", Some(value)) => value
            .parse::<DetailLevel>()
            .map_or_else(Command::Invalid, Command::Detail),
        _ => Command::Invalid(format!("unknown command: /{rest}")),
    }
}

/// Positions are shown 1-based; converts to a 0-based index.
fn parse_position(raw: &str) -> Option<usize> {
    raw.parse::<usize>().ok()?.checked_sub(1)
}
