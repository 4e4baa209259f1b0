//! Voice-recording enablement policy.
//!
//! The host decides which platform it runs on; this module only combines
//! that with the caller's opt-in. Recording is enabled only when it is
//! explicitly allowed AND the platform supports it.

use std::fmt;
use std::str::FromStr;

/// Platform the composer is hosted on, as reported by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Android phone or tablet.
    Android,
    /// iPhone or iPad.
    Ios,
    /// Desktop operating system.
    #[default]
    Desktop,
    /// Browser.
    Web,
}

impl Platform {
    /// Whether voice messages can be recorded on this platform.
    #[must_use]
    pub const fn supports_recording(self) -> bool {
        matches!(self, Self::Android | Self::Ios)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Android => write!(f, "android"),
            Self::Ios => write!(f, "ios"),
            Self::Desktop => write!(f, "desktop"),
            Self::Web => write!(f, "web"),
        }
    }
}

/// Error returned when parsing an unknown platform name.
#[derive(Debug, thiserror::Error)]
#[error("unknown platform {0:?} (expected android, ios, desktop or web)")]
pub struct UnknownPlatform(String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "android" => Ok(Self::Android),
            "ios" => Ok(Self::Ios),
            "desktop" => Ok(Self::Desktop),
            "web" => Ok(Self::Web),
            _ => Err(UnknownPlatform(s.to_string())),
        }
    }
}

/// Whether the composer offers voice-message recording.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoicePolicy {
    /// Caller opt-in for voice recording.
    pub allow_voice_recording: bool,
    /// Host platform.
    pub platform: Platform,
}

impl VoicePolicy {
    /// Build a policy from the opt-in flag and the host platform.
    #[must_use]
    pub const fn new(allow_voice_recording: bool, platform: Platform) -> Self {
        Self {
            allow_voice_recording,
            platform,
        }
    }

    /// Recording is enabled only when allowed and supported.
    #[must_use]
    pub const fn voice_recording_enabled(&self) -> bool {
        self.allow_voice_recording && self.platform.supports_recording()
    }
}
