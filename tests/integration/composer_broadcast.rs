//! Integration tests for composer -> peer typing notifications.
//!
//! Verifies:
//! 1. Text changes on a composer reach the broadcast channel as one
//!    `Typing` / `Typed` pair per burst.
//! 2. Broadcast messages survive the framed wire codec.
//! 3. Taking the message does not count as typing.
//! 4. A disposed composer broadcasts nothing further.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;

use composer::policy::{Platform, VoicePolicy};
use composer::state::{ComposerState, PrimaryAction};
use composer::typing::broadcast::TypingBroadcaster;
use composer_proto::codec;
use composer_proto::status::ComposingStatus;
use composer_proto::typing::TypingMessage;

const SETTLE: Duration = Duration::from_millis(1000);

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn create_composer(policy: VoicePolicy) -> (ComposerState, mpsc::Receiver<TypingMessage>) {
    let (broadcaster, rx) = TypingBroadcaster::channel("alice", "general", 16);
    let state = ComposerState::new(SETTLE, policy, broadcaster).unwrap();
    (state, rx)
}

fn drain(rx: &mut mpsc::Receiver<TypingMessage>) -> Vec<TypingMessage> {
    let mut messages = Vec::new();
    while let Ok(message) = rx.try_recv() {
        messages.push(message);
    }
    messages
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn keystrokes_broadcast_one_pair_per_burst() {
    let (mut state, mut rx) = create_composer(VoicePolicy::default());

    for text in ["h", "he", "hel", "hell", "hello"] {
        state.notify_text_changed(text);
        sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(
        drain(&mut rx),
        vec![TypingMessage::new("alice", "general", ComposingStatus::Typing)]
    );

    sleep(SETTLE).await;
    assert_eq!(
        drain(&mut rx),
        vec![TypingMessage::new("alice", "general", ComposingStatus::Typed)]
    );
    assert_eq!(state.input(), "hello");
}

#[tokio::test(start_paused = true)]
async fn broadcast_messages_survive_framing() {
    let (mut state, mut rx) = create_composer(VoicePolicy::default());

    state.notify_text_changed("hi");
    sleep(SETTLE * 2).await;

    let mut stream = Vec::new();
    for message in drain(&mut rx) {
        stream.extend_from_slice(&codec::encode_framed(&message).unwrap());
    }

    let (first, used) = codec::decode_framed(&stream).unwrap();
    let (second, rest) = codec::decode_framed(&stream[used..]).unwrap();
    assert_eq!(used + rest, stream.len());
    assert!(first.is_typing());
    assert!(!second.is_typing());
    assert_eq!(second.peer_id, "alice");
}

#[tokio::test(start_paused = true)]
async fn sending_does_not_restart_typing() {
    let (mut state, mut rx) = create_composer(VoicePolicy::new(true, Platform::Ios));

    state.notify_text_changed("ship it");
    sleep(SETTLE * 2).await;
    drain(&mut rx);

    assert_eq!(state.primary_action(), PrimaryAction::Send);
    assert_eq!(state.take_message().unwrap(), "ship it");
    assert_eq!(state.primary_action(), PrimaryAction::Record);

    sleep(SETTLE * 2).await;
    assert!(drain(&mut rx).is_empty());
    assert_eq!(state.status(), ComposingStatus::Typed);
}

#[tokio::test(start_paused = true)]
async fn disposed_composer_broadcasts_nothing() {
    let (mut state, mut rx) = create_composer(VoicePolicy::default());

    state.notify_text_changed("a");
    state.dispose();
    state.notify_text_changed("ab");
    sleep(SETTLE * 3).await;

    let messages = drain(&mut rx);
    assert_eq!(messages.len(), 1);
    assert!(messages[0].is_typing());
}
