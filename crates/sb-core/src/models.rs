//! # Domain Models
//!
//! These structs represent the core entities of SpotBot. Identifiers come
//! from the chat platform and are carried as opaque strings.

use serde::{Deserialize, Serialize};

/// One user photographing and tagging others. The central entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spot {
    /// Identifier of the originating chat message. Primary key and natural
    /// idempotence key: re-processing the same message never creates a
    /// second row.
    pub id: String,
    /// Identifier of the user who posted the spot.
    pub spotter: String,
    /// Identifiers of the users referenced in the spot, in message order.
    /// Non-empty for any persisted Spot.
    pub tagged: Vec<String>,
    /// Reference to the externally stored photo.
    pub image_url: String,
    /// Moderation state. Starts false, flipped only by the moderation
    /// state machine; a flagged Spot contributes nothing to any ranking.
    pub flagged: bool,
    /// Partition key scoping ranking queries to one competitive period.
    /// Assigned at creation time and never migrated.
    pub semester: String,
}

/// One line of the leaderboard. Derived, never stored; recomputed on every
/// query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: String,
    pub count: i64,
}

/// An outbound message: plain text plus an optional structured block
/// payload, optionally threaded under an existing message.
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    pub channel: String,
    pub thread: Option<String>,
    pub text: String,
    pub blocks: Option<serde_json::Value>,
}

impl Reply {
    /// A plain text reply threaded under `thread`.
    pub fn threaded(channel: &str, thread: &str, text: String) -> Self {
        Self {
            channel: channel.to_string(),
            thread: Some(thread.to_string()),
            text,
            blocks: None,
        }
    }

    /// An unthreaded block payload with fallback text.
    pub fn blocks(channel: &str, text: &str, blocks: serde_json::Value) -> Self {
        Self {
            channel: channel.to_string(),
            thread: None,
            text: text.to_string(),
            blocks: Some(blocks),
        }
    }
}
