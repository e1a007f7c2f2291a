//! # SpotError
//!
//! Centralized error handling for the SpotBot ecosystem. Every variant here
//! is caught at the command-handling boundary and translated into a chat
//! reply; nothing crashes the long-running process for a single bad event.

use thiserror::Error;

/// The primary error type for all engine operations.
#[derive(Error, Debug)]
pub enum SpotError {
    /// Spot post mentioned no one. User-correctable.
    #[error("no users tagged in spot")]
    NoTags,

    /// First attachment's declared type is not an allowed image type.
    #[error("unsupported media type: {0}")]
    UnsupportedMedia(String),

    /// Moderation target does not exist.
    #[error("spot not found")]
    NotFound,

    /// Moderation action arrived outside the spot's thread, so there is no
    /// target to look up.
    #[error("moderation action not sent in a spot thread")]
    NotInThread,

    /// Flag on an already-flagged spot. Idempotent failure, no mutation.
    #[error("spot is already flagged")]
    AlreadyFlagged,

    /// Unflag on a spot that is not flagged.
    #[error("spot is not flagged")]
    NotFlagged,

    /// Data-integrity violation (duplicate-id collision on lookup). Logged
    /// as critical and surfaced generically, never swallowed.
    #[error("data integrity violation: {0}")]
    Integrity(String),

    /// Object-store or name-resolution failure. Retryable at the caller's
    /// discretion, never retried internally, never leaves partial state.
    #[error("i/o failure: {0}")]
    Io(String),
}

impl SpotError {
    /// Wraps an infrastructure failure from a port boundary.
    pub fn io(err: impl std::fmt::Display) -> Self {
        SpotError::Io(err.to_string())
    }
}

/// A specialized Result type for SpotBot engine logic.
pub type Result<T> = std::result::Result<T, SpotError>;
