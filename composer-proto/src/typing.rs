//! Typing notification sent to peers when a composer changes status.

use serde::{Deserialize, Serialize};

use crate::status::ComposingStatus;

/// A typing indicator message sent between peers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingMessage {
    /// The peer whose composer changed status.
    pub peer_id: String,
    /// The room the composer belongs to.
    pub room_id: String,
    /// The new composing status.
    pub status: ComposingStatus,
}

impl TypingMessage {
    /// Build a typing message for `peer_id` in `room_id`.
    pub fn new(
        peer_id: impl Into<String>,
        room_id: impl Into<String>,
        status: ComposingStatus,
    ) -> Self {
        Self {
            peer_id: peer_id.into(),
            room_id: room_id.into(),
            status,
        }
    }

    /// Whether the peer is typing according to this message.
    #[must_use]
    pub const fn is_typing(&self) -> bool {
        self.status.is_typing()
    }
}
