//! # Inbound Events
//!
//! The typed shape of everything the connector hands to the engine. The
//! loosely-typed platform payload is parsed into this once, at the boundary;
//! everything inward works with these fields.

use serde::Deserialize;

/// A file attached to a message, with the type the platform declared for it.
#[derive(Debug, Clone, Deserialize)]
pub struct Attachment {
    /// Declared file type, e.g. "jpg", "png", "heic".
    pub filetype: String,
    /// Where the binary content can be fetched from.
    pub url: String,
}

/// One inbound chat event: either a spot post (has attachments) or a
/// command message (text only).
#[derive(Debug, Clone, Deserialize)]
pub struct ChatEvent {
    /// User who sent the message.
    pub sender: String,
    /// Platform identifier of the message itself.
    pub message_id: String,
    /// Channel the message was posted in; replies go back here.
    pub channel: String,
    /// Identifier of the thread root when the message is a thread reply.
    #[serde(default)]
    pub thread_root: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}
