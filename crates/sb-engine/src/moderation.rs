//! # Moderation State Machine
//!
//! `unflagged` ⇄ `flagged`, driven by flag/unflag replies inside a spot's
//! thread. Both actions require a thread reference naming the target spot;
//! without one there is nothing to look up and the action is rejected
//! before any state access. No authorization beyond that: any member may
//! flag or unflag any spot.

use log::info;
use sb_core::{Lookup, Result, Spot, SpotError, SpotRepo};

/// Resolves the action's thread reference to its target spot.
async fn lookup_target(repo: &dyn SpotRepo, thread_root: Option<&str>) -> Result<Spot> {
    let id = thread_root.ok_or(SpotError::NotInThread)?;
    match repo.find(id).await.map_err(SpotError::io)? {
        Lookup::Found(spot) => Ok(spot),
        Lookup::NotFound => Err(SpotError::NotFound),
        Lookup::Conflict => Err(SpotError::Integrity(format!("multiple spots share id {id}"))),
    }
}

/// Flags the spot at the root of the actor's thread. Errors:
/// [`SpotError::NotInThread`], [`SpotError::NotFound`],
/// [`SpotError::AlreadyFlagged`] (no mutation). On success returns the
/// updated spot, whose `spotter` the caller notifies.
pub async fn flag(repo: &dyn SpotRepo, thread_root: Option<&str>, actor: &str) -> Result<Spot> {
    let spot = lookup_target(repo, thread_root).await?;
    if spot.flagged {
        return Err(SpotError::AlreadyFlagged);
    }
    // Guarded flip: of two concurrent flags, exactly one flips the row.
    if !repo.set_flagged(&spot.id, true).await.map_err(SpotError::io)? {
        return Err(SpotError::AlreadyFlagged);
    }
    info!("spot {} flagged by {actor}", spot.id);
    Ok(Spot { flagged: true, ..spot })
}

/// Symmetric inverse of [`flag`]; fails with [`SpotError::NotFlagged`] when
/// the spot is not currently flagged.
pub async fn unflag(repo: &dyn SpotRepo, thread_root: Option<&str>, actor: &str) -> Result<Spot> {
    let spot = lookup_target(repo, thread_root).await?;
    if !spot.flagged {
        return Err(SpotError::NotFlagged);
    }
    if !repo.set_flagged(&spot.id, false).await.map_err(SpotError::io)? {
        return Err(SpotError::NotFlagged);
    }
    info!("spot {} unflagged by {actor}", spot.id);
    Ok(Spot { flagged: false, ..spot })
}
