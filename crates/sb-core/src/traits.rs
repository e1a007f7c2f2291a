//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary. The
//! engine only ever sees these interfaces; all I/O lives behind them.

use crate::models::{Reply, Spot};
use async_trait::async_trait;

/// Result of an insert against the idempotence key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A row with this id already exists; nothing was written.
    Duplicate,
}

/// Result of a lookup by spot id, as explicit variants rather than errors
/// so the moderation branches stay exhaustive.
#[derive(Debug, Clone)]
pub enum Lookup {
    Found(Spot),
    NotFound,
    /// More than one row matched the id. Must never happen given the
    /// uniqueness invariant; surfaced as a fatal integrity error upstream.
    Conflict,
}

/// Data persistence contract for the spot table. The storage layer itself
/// enforces uniqueness of `id`.
#[async_trait]
pub trait SpotRepo: Send + Sync {
    /// Inserts one spot; a duplicate id is a silent no-op reported as
    /// [`InsertOutcome::Duplicate`].
    async fn insert(&self, spot: Spot) -> anyhow::Result<InsertOutcome>;

    async fn find(&self, id: &str) -> anyhow::Result<Lookup>;

    /// Flips the moderation flag, but only when the row currently holds the
    /// opposite state. Returns whether a row was flipped, so exactly one of
    /// two concurrent flags observes success.
    async fn set_flagged(&self, id: &str, flagged: bool) -> anyhow::Result<bool>;

    /// Number of qualifying spots posted by `user_id` in `semester`.
    async fn count_for(&self, user_id: &str, semester: &str) -> anyhow::Result<i64>;

    /// Qualifying spot count per spotter for the semester, ordered by count
    /// descending then spotter id ascending.
    async fn spot_counts(&self, semester: &str) -> anyhow::Result<Vec<(String, i64)>>;

    /// Number of qualifying spots tagging `user_id` in `semester`.
    async fn tagged_count(&self, user_id: &str, semester: &str) -> anyhow::Result<i64>;

    /// Qualifying spots tagging `user_id`, grouped by spotter, same order
    /// as [`SpotRepo::spot_counts`].
    async fn spotter_counts_of(
        &self,
        user_id: &str,
        semester: &str,
    ) -> anyhow::Result<Vec<(String, i64)>>;

    /// All qualifying spots tagging `user_id` in `semester`.
    async fn spots_tagging(&self, user_id: &str, semester: &str) -> anyhow::Result<Vec<Spot>>;
}

/// Binary object storage contract for the spot photos.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Fetches the attachment bytes from the platform-provided locator.
    async fn fetch(&self, locator: &str) -> anyhow::Result<Vec<u8>>;

    /// Saves raw bytes under a deterministic key and returns a publicly
    /// resolvable URL.
    async fn store(&self, key: &str, data: Vec<u8>) -> anyhow::Result<String>;
}

/// Outbound messaging and presentation-only name resolution.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn post_message(&self, reply: &Reply) -> anyhow::Result<()>;

    /// Display name for a user id. Used only for rendering, never for
    /// ranking logic.
    async fn resolve_display_name(&self, user_id: &str) -> anyhow::Result<String>;
}
