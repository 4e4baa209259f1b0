//! Observer that forwards status changes to peers as typing messages.
//!
//! Typing indicators are fire-and-forget: when the outbound channel is full
//! or closed the notification is dropped and logged, never surfaced to the
//! code reporting keystrokes.

use tokio::sync::mpsc;

use composer_proto::typing::TypingMessage;

use super::{ComposingStatus, StatusObserver};

/// Converts each status change into a [`TypingMessage`] for one peer/room
/// and pushes it onto a bounded channel.
#[derive(Debug, Clone)]
pub struct TypingBroadcaster {
    peer_id: String,
    room_id: String,
    tx: mpsc::Sender<TypingMessage>,
}

impl TypingBroadcaster {
    /// Wrap an existing sender.
    pub fn new(
        peer_id: impl Into<String>,
        room_id: impl Into<String>,
        tx: mpsc::Sender<TypingMessage>,
    ) -> Self {
        Self {
            peer_id: peer_id.into(),
            room_id: room_id.into(),
            tx,
        }
    }

    /// Create a broadcaster together with the receiving end of its channel.
    ///
    /// `buffer` is clamped to at least 1, as tokio channels require.
    pub fn channel(
        peer_id: impl Into<String>,
        room_id: impl Into<String>,
        buffer: usize,
    ) -> (Self, mpsc::Receiver<TypingMessage>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self::new(peer_id, room_id, tx), rx)
    }
}

impl StatusObserver for TypingBroadcaster {
    fn on_status_change(&self, status: ComposingStatus) {
        let message = TypingMessage::new(self.peer_id.clone(), self.room_id.clone(), status);
        match self.tx.try_send(message) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::debug!(%status, room = %self.room_id, "typing channel full, indicator dropped");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(%status, room = %self.room_id, "typing channel closed, indicator dropped");
            }
        }
    }
}
