//! spotbot/crates/sb-core/src/lib.rs
//!
//! The central domain types and interface definitions for SpotBot.

pub mod error;
pub mod event;
pub mod models;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use event::*;
pub use models::*;
pub use traits::*;
