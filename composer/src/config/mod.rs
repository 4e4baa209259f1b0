//! Configuration for the composer driver.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/composer/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::PathBuf;
use std::time::Duration;

use crate::policy::{Platform, VoicePolicy};
use crate::typing::DEFAULT_SETTLE_DURATION;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    typing: TypingFileConfig,
    voice: VoiceFileConfig,
    identity: IdentityFileConfig,
}

/// `[typing]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct TypingFileConfig {
    settle_ms: Option<u64>,
    broadcast_buffer: Option<usize>,
}

/// `[voice]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct VoiceFileConfig {
    allow_recording: Option<bool>,
    platform: Option<Platform>,
}

/// `[identity]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct IdentityFileConfig {
    peer_id: Option<String>,
    room_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved composer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposerConfig {
    /// Quiet period after the last keystroke before reverting to `Typed`.
    pub settle_duration: Duration,
    /// Capacity of the outbound typing-message channel.
    pub broadcast_buffer: usize,
    /// Voice recording policy.
    pub voice: VoicePolicy,
    /// Local peer identity announced in typing messages.
    pub peer_id: String,
    /// Room the composer types into.
    pub room_id: String,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            settle_duration: DEFAULT_SETTLE_DURATION,
            broadcast_buffer: 64,
            voice: VoicePolicy::default(),
            peer_id: "me".to_string(),
            room_id: "general".to_string(),
        }
    }
}

impl ComposerConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read
    /// or if any config file found cannot be parsed.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Resolve from CLI args and env vars alone, ignoring any config file.
    #[must_use]
    pub fn from_cli(cli: &CliArgs) -> Self {
        Self::resolve(cli, &ConfigFile::default())
    }

    /// Resolve from CLI args and a parsed config file. Priority: CLI > file
    /// > default.
    #[must_use]
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            settle_duration: cli
                .settle_ms
                .or(file.typing.settle_ms)
                .map_or(defaults.settle_duration, Duration::from_millis),
            broadcast_buffer: file
                .typing
                .broadcast_buffer
                .unwrap_or(defaults.broadcast_buffer),
            voice: VoicePolicy {
                allow_voice_recording: cli
                    .allow_voice
                    .or(file.voice.allow_recording)
                    .unwrap_or(defaults.voice.allow_voice_recording),
                platform: cli
                    .platform
                    .or(file.voice.platform)
                    .unwrap_or(defaults.voice.platform),
            },
            peer_id: cli
                .peer_id
                .clone()
                .or_else(|| file.identity.peer_id.clone())
                .unwrap_or(defaults.peer_id),
            room_id: cli
                .room_id
                .clone()
                .or_else(|| file.identity.room_id.clone())
                .unwrap_or(defaults.room_id),
        }
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Drive a message composer from stdin")]
pub struct CliArgs {
    /// Settle duration in milliseconds before typing reverts to idle.
    #[arg(long, env = "COMPOSER_SETTLE_MS")]
    pub settle_ms: Option<u64>,

    /// Allow voice-message recording (still requires a mobile platform).
    #[arg(long, env = "COMPOSER_ALLOW_VOICE")]
    pub allow_voice: Option<bool>,

    /// Host platform (android, ios, desktop, web).
    #[arg(long, env = "COMPOSER_PLATFORM")]
    pub platform: Option<Platform>,

    /// Local peer identity announced in typing messages.
    #[arg(long, env = "PEER_ID")]
    pub peer_id: Option<String>,

    /// Room the composer types into.
    #[arg(long, env = "ROOM_ID")]
    pub room_id: Option<String>,

    /// Path to config file (default: `~/.config/composer/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "COMPOSER_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/composer.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist. Otherwise the default
/// path is tried and a missing file is treated as empty config.
fn load_config_file(explicit_path: Option<&std::path::Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(ConfigFile::default());
        };
        config_dir.join("composer").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
