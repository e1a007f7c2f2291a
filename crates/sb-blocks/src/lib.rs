//! # sb-blocks
//!
//! Structured block payloads for SpotBot's outbound messages, plus the
//! randomized greeting prefixes used in threaded replies. Pure builders:
//! every function returns a `serde_json::Value` block array the chat
//! connector can send as-is.

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use serde_json::{json, Value};

fn section(text: &str) -> Value {
    json!({ "type": "section", "text": { "type": "mrkdwn", "text": text } })
}

fn header(text: &str) -> Value {
    json!({ "type": "header", "text": { "type": "plain_text", "text": text } })
}

fn date_context(date: NaiveDate) -> Value {
    json!({ "type": "context", "elements": [{ "type": "mrkdwn", "text": format!("*{date}*") }] })
}

/// Leaderboard payload: header, date line, ranked body, footer hint.
pub fn leaderboard_blocks(date: NaiveDate, body: &str, semester: &str) -> Value {
    json!([
        header(&format!(":trophy:  Spot Leaderboard for {semester} :trophy:")),
        date_context(date),
        section(body),
        json!({ "type": "context", "elements": [{
            "type": "mrkdwn",
            "text": "To see your individual stats, type 'spotbot stats'!"
        }] }),
    ])
}

/// Personal stats payload: header, date line, spotting line, spotted line.
pub fn stat_blocks(date: NaiveDate, name: &str, spotting: &str, spotted: &str) -> Value {
    json!([
        header(&format!(":chart_with_upwards_trend: Spot Stats for {name} :chart_with_upwards_trend:")),
        date_context(date),
        section(spotting),
        section(spotted),
    ])
}

/// "miss" payload: the lead line and a random photo of the missed member.
pub fn miss_blocks(lead: &str, image_url: &str) -> Value {
    json!([
        section(lead),
        section("It's okay, here's a picture of them to remind you <3"),
        section(image_url),
    ])
}

/// The official rules, as posted on `spotbot rules`.
pub fn rule_blocks() -> Value {
    json!([
        header("Spotting Official Rules & Regulations"),
        section(
            "It is everyone's responsibility to hold everyone accountable for following \
             the rules! If you see a post that violates any of the following rules, reply \
             'spotbot flag' in its thread. Please use this command in good faith!"
        ),
        section(
            "*Rule 1:* The person being spotted must be identifiable. Some ambiguity is \
             allowed, total ambiguity is not."
        ),
        section(
            "*Rule 2:* Spotting multiple members in the same group or vicinity counts as \
             one spot. You cannot get multiple points from spotting the same group."
        ),
        section(
            "*Rule 3:* You cannot get multiple points for spotting individuals or groups \
             at the same function. If you're unsure whether a spot violates this rule, \
             post it anyway."
        ),
        section(
            "*Rule 4:* In a spotting duel, the winner is the first person to post their \
             spot in the channel; everyone else's spots do not count."
        ),
    ])
}

/// The command overview, as posted on `spotbot help`.
pub fn help_blocks() -> Value {
    json!([
        section("👋 Hi there! I'm SpotBot.\n\nHere are some things I can do:"),
        section(
            "*📸 Spotting:* Found a member in the wild? Upload a picture and tag them in \
             the spotting channel to secure those points."
        ),
        section("*🚩 Flag:* Detected an illegal spot? Reply *spotbot flag* in its thread."),
        section("*🚩 Unflag:* Falsely accused? Reply *spotbot unflag* in the thread."),
        section("*🏆 Leaderboard:* See the top spotters with *spotbot leaderboard*."),
        section("*📈 Stats:* View your own stats with *spotbot stats*."),
        section("*🥺 Miss:* Miss anyone? Type *spotbot miss @ThatPerson* for a random photo of them."),
        section("*📖 Rules:* Need a refresher? Type *spotbot rules*."),
        json!({ "type": "divider" }),
        json!({ "type": "context", "elements": [{
            "type": "mrkdwn",
            "text": "❓ View my commands anytime by typing *spotbot help*!"
        }] }),
    ])
}

const EXCITED: &[&str] = &[
    "Hey",
    "Hi",
    "What's poppin'",
    "Greetings",
    "Attention",
    "Howdy",
];

const DISAPPOINTED: &[&str] = &["Oh no", "Whoops", "Yikes"];

/// A random upbeat greeting prefix for success replies.
pub fn excited_greeting() -> &'static str {
    EXCITED.choose(&mut rand::thread_rng()).copied().unwrap_or("Hey")
}

/// A random let-down greeting prefix for rejection replies.
pub fn disappointed_greeting() -> &'static str {
    DISAPPOINTED
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("Oh no")
}
