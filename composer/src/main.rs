//! `composer` — drive a message composer from stdin.
//!
//! Each input line replaces the composer's text, as if the user had edited
//! the field. Typing notifications are framed with the wire codec and
//! printed as they are emitted.
//!
//! ```bash
//! cargo run --bin composer -- --settle-ms 500 --peer-id alice --room-id dev
//! ```
//!
//! Commands: `/send` takes the message, `/rec` and `/stop` toggle voice
//! recording.

use std::io;
use std::path::Path;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use composer::config::{CliArgs, ComposerConfig};
use composer::state::ComposerState;
use composer::typing::broadcast::TypingBroadcaster;
use composer_proto::codec;
use composer_proto::typing::TypingMessage;

/// Extra wait past the settle duration at shutdown.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(10);

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    let config = match ComposerConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ComposerConfig::from_cli(&cli)
        }
    };

    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!(
        settle_ms = config.settle_duration.as_millis(),
        voice = config.voice.voice_recording_enabled(),
        "composer starting"
    );

    let (broadcaster, rx) =
        TypingBroadcaster::channel(&config.peer_id, &config.room_id, config.broadcast_buffer);
    let printer = tokio::spawn(print_typing_messages(rx));

    let mut state = ComposerState::new(config.settle_duration, config.voice, broadcaster)
        .map_err(io::Error::other)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        handle_line(&mut state, &line);
    }

    // Let the trailing `Typed` reach peers before tearing down.
    if state.status().is_typing() {
        tokio::time::sleep(config.settle_duration + SHUTDOWN_GRACE).await;
    }
    state.dispose();
    drop(state);

    if let Err(e) = printer.await {
        tracing::warn!(error = %e, "typing printer task failed");
    }

    tracing::info!("composer exiting");
    Ok(())
}

/// Apply one stdin line to the composer.
fn handle_line(state: &mut ComposerState, line: &str) {
    match line {
        "/send" => match state.take_message() {
            Ok(message) => println!("sent: {message}"),
            Err(e) => println!("error: {e}"),
        },
        "/rec" => match state.start_recording() {
            Ok(()) => println!("recording"),
            Err(e) => println!("error: {e}"),
        },
        "/stop" => match state.stop_recording() {
            Ok(()) => println!("recording stopped"),
            Err(e) => println!("error: {e}"),
        },
        text => state.notify_text_changed(text),
    }
}

/// Print every typing message with the size of its framed encoding.
async fn print_typing_messages(mut rx: mpsc::Receiver<TypingMessage>) {
    while let Some(message) = rx.recv().await {
        match codec::encode_framed(&message) {
            Ok(frame) => println!(
                "{} {} {} bytes={}",
                message.status,
                message.peer_id,
                message.room_id,
                frame.len()
            ),
            Err(e) => tracing::warn!(error = %e, "failed to encode typing message"),
        }
    }
}

/// Initialize file-based logging.
///
/// Logs go to a file so stdout stays reserved for program output. Returns a
/// [`WorkerGuard`] that must be held until shutdown to flush buffered logs.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("composer.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}
