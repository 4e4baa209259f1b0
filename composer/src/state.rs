//! Local state of a message composer.
//!
//! Holds what the composer widget tracks between renders: the current input
//! text, whether a voice message is being recorded, and the composing
//! status (through its [`TypingDebouncer`]). Rendering and the pickers and
//! recorders behind the buttons are left to the host.

use std::time::Duration;

use crate::policy::VoicePolicy;
use crate::typing::{ComposingStatus, DebounceError, StatusObserver, TypingDebouncer};

/// Errors returned by [`ComposerState`] operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ComposerError {
    /// Voice recording is not enabled by the current policy.
    #[error("voice recording is disabled")]
    VoiceDisabled,

    /// A recording is already in progress.
    #[error("already recording")]
    AlreadyRecording,

    /// No recording is in progress.
    #[error("not recording")]
    NotRecording,

    /// The input holds nothing but whitespace.
    #[error("message is empty")]
    EmptyMessage,
}

/// The control the composer offers next to the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryAction {
    /// Send the typed text.
    Send,
    /// Start a voice recording.
    Record,
    /// Nothing to do.
    None,
}

/// State of one message composer.
#[derive(Debug)]
pub struct ComposerState {
    input: String,
    recording: bool,
    policy: VoicePolicy,
    debouncer: TypingDebouncer,
}

impl ComposerState {
    /// Create a composer on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`DebounceError::NoRuntime`] when called outside a tokio
    /// runtime.
    pub fn new(
        settle_duration: Duration,
        policy: VoicePolicy,
        observer: impl StatusObserver,
    ) -> Result<Self, DebounceError> {
        let debouncer = TypingDebouncer::new(settle_duration, observer)?;
        Ok(Self::with_debouncer(debouncer, policy))
    }

    /// Create a composer around an existing debouncer.
    #[must_use]
    pub fn with_debouncer(debouncer: TypingDebouncer, policy: VoicePolicy) -> Self {
        Self {
            input: String::new(),
            recording: false,
            policy,
            debouncer,
        }
    }

    /// Store the new input text and report one activity event.
    ///
    /// Every change callback counts as activity, even when the text is
    /// unchanged.
    pub fn notify_text_changed(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.debouncer.notify_activity();
    }

    /// Current input text.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Current composing status.
    #[must_use]
    pub fn status(&self) -> ComposingStatus {
        self.debouncer.status()
    }

    /// Whether a voice message is being recorded.
    #[must_use]
    pub const fn is_recording(&self) -> bool {
        self.recording
    }

    /// The voice policy in effect.
    #[must_use]
    pub const fn policy(&self) -> VoicePolicy {
        self.policy
    }

    /// Whether the composer offers voice recording at all.
    #[must_use]
    pub const fn voice_recording_enabled(&self) -> bool {
        self.policy.voice_recording_enabled()
    }

    /// Which control the composer should show next to the input.
    #[must_use]
    pub fn primary_action(&self) -> PrimaryAction {
        if !self.input.trim().is_empty() {
            PrimaryAction::Send
        } else if self.voice_recording_enabled() {
            PrimaryAction::Record
        } else {
            PrimaryAction::None
        }
    }

    /// Take the trimmed message text and clear the input.
    ///
    /// Clearing the input is not reported as activity.
    ///
    /// # Errors
    ///
    /// Returns [`ComposerError::EmptyMessage`] when the input is blank; the
    /// input is left untouched in that case.
    pub fn take_message(&mut self) -> Result<String, ComposerError> {
        let trimmed = self.input.trim();
        if trimmed.is_empty() {
            return Err(ComposerError::EmptyMessage);
        }
        let message = trimmed.to_string();
        self.input.clear();
        tracing::debug!(len = message.len(), "message taken from composer");
        Ok(message)
    }

    /// Begin recording a voice message.
    ///
    /// # Errors
    ///
    /// Returns [`ComposerError::VoiceDisabled`] when the policy does not
    /// allow recording, or [`ComposerError::AlreadyRecording`].
    pub fn start_recording(&mut self) -> Result<(), ComposerError> {
        if !self.voice_recording_enabled() {
            return Err(ComposerError::VoiceDisabled);
        }
        if self.recording {
            return Err(ComposerError::AlreadyRecording);
        }
        self.recording = true;
        tracing::debug!("voice recording started");
        Ok(())
    }

    /// Stop the current voice recording.
    ///
    /// # Errors
    ///
    /// Returns [`ComposerError::NotRecording`] when no recording is active.
    pub fn stop_recording(&mut self) -> Result<(), ComposerError> {
        if !self.recording {
            return Err(ComposerError::NotRecording);
        }
        self.recording = false;
        tracing::debug!("voice recording stopped");
        Ok(())
    }

    /// Tear down the composer's timers. Idempotent.
    pub fn dispose(&mut self) {
        self.recording = false;
        self.debouncer.dispose();
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.debouncer.is_disposed()
    }
}
