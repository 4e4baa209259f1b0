//! The two-valued composing status of a text input.

use serde::{Deserialize, Serialize};

/// Last observed activity classification of a text input.
///
/// A freshly created input is [`Typed`](Self::Typed) (idle). It flips to
/// [`Typing`](Self::Typing) on the first keystroke of a burst and back to
/// `Typed` once the input has been quiet for the settle duration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComposingStatus {
    /// The user is actively editing the input.
    Typing,
    /// The user has paused or finished editing.
    #[default]
    Typed,
}

impl ComposingStatus {
    /// Whether this status means the user is currently typing.
    #[must_use]
    pub const fn is_typing(self) -> bool {
        matches!(self, Self::Typing)
    }
}

impl std::fmt::Display for ComposingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Typing => write!(f, "typing"),
            Self::Typed => write!(f, "typed"),
        }
    }
}
