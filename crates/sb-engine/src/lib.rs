//! # sb-engine
//!
//! The ranking and moderation engine: everything between the inbound event
//! boundary and the ports defined in sb-core. Converts the raw stream of
//! chat events (spot posts, flags, unflags, queries) into a consistent,
//! queryable leaderboard state.

pub mod commands;
pub mod handler;
pub mod ingest;
pub mod mentions;
pub mod moderation;
pub mod ranking;

pub use handler::Engine;

#[cfg(test)]
pub(crate) mod testutil;
