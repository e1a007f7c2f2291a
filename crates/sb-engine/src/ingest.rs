//! # Spot Ingestion Pipeline
//!
//! Validates an incoming spot event, persists the photo externally, then
//! creates the record. Exactly one object-store write and one insert per
//! accepted event; a rejected event causes neither. Fetch/store failures
//! are not retried here; reprocessing the same message later is idempotent
//! at the repo boundary because the message id is the primary key.

use log::info;
use sb_core::{ChatEvent, InsertOutcome, MediaStore, Result, Spot, SpotError, SpotRepo};

use crate::mentions::find_mentions;

/// Attachment types that qualify as a spot photo.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["jpg", "png", "heic"];

/// What an accepted spot event produced: the persisted record and the
/// spotter's updated personal total for the confirmation reply.
#[derive(Debug)]
pub struct IngestOutcome {
    pub spot: Spot,
    pub total: i64,
}

/// Runs the pipeline for one spot event. Validation short-circuits at the
/// first failure, in order: tags present, then media type allowed.
pub async fn record_spot(
    repo: &dyn SpotRepo,
    media: &dyn MediaStore,
    event: &ChatEvent,
    semester: &str,
) -> Result<IngestOutcome> {
    let tagged = find_mentions(&event.text);
    if tagged.is_empty() {
        return Err(SpotError::NoTags);
    }

    let attachment = event
        .attachments
        .first()
        .ok_or_else(|| SpotError::UnsupportedMedia("none".to_string()))?;
    let filetype = attachment.filetype.to_ascii_lowercase();
    if !ALLOWED_IMAGE_TYPES.contains(&filetype.as_str()) {
        return Err(SpotError::UnsupportedMedia(filetype));
    }

    info!("recording spot from {} at message {}", event.sender, event.message_id);

    // Photo first: if the store write fails, no record is inserted.
    let bytes = media.fetch(&attachment.url).await.map_err(SpotError::io)?;
    let key = format!("{semester}/{}_{}.{filetype}", event.sender, event.message_id);
    let image_url = media.store(&key, bytes).await.map_err(SpotError::io)?;

    let spot = Spot {
        id: event.message_id.clone(),
        spotter: event.sender.clone(),
        tagged,
        image_url,
        flagged: false,
        semester: semester.to_string(),
    };
    match repo.insert(spot.clone()).await.map_err(SpotError::io)? {
        InsertOutcome::Inserted => {}
        InsertOutcome::Duplicate => {
            info!("spot {} already recorded, skipping insert", spot.id);
        }
    }

    let total = repo.count_for(&event.sender, semester).await.map_err(SpotError::io)?;
    Ok(IngestOutcome { spot, total })
}
