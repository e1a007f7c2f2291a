//! # Command Parsing
//!
//! Maps free-form message text onto the bot's command surface. Anything
//! that is not a recognized command is ignored by the handler.

use crate::mentions::find_mentions;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Leaderboard,
    Stats,
    Flag,
    Unflag,
    /// "spotbot miss @user" — target is the first mention after the keyword.
    Miss { target: Option<String> },
    Help,
    Rules,
    Ping,
}

/// Parses a command from message text. `ping` stands alone; everything else
/// is `spotbot <keyword> …`, case-insensitive on the keyword.
pub fn parse(text: &str) -> Option<Command> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("ping") {
        return Some(Command::Ping);
    }

    let mut words = trimmed.split_whitespace();
    if !words.next()?.eq_ignore_ascii_case("spotbot") {
        return None;
    }
    match words.next()?.to_ascii_lowercase().as_str() {
        "leaderboard" => Some(Command::Leaderboard),
        "stats" => Some(Command::Stats),
        "flag" => Some(Command::Flag),
        "unflag" => Some(Command::Unflag),
        "help" => Some(Command::Help),
        "rules" => Some(Command::Rules),
        "miss" => Some(Command::Miss { target: find_mentions(trimmed).into_iter().next() }),
        _ => None,
    }
}
