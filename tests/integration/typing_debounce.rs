//! Integration tests for the typing debounce state machine.
//!
//! Verifies, through the public API and on a paused tokio clock:
//! 1. The leading `Typing` notification is synchronous.
//! 2. A burst settles once, one settle duration after its last event.
//! 3. Calls at 0ms and 500ms settle at 1500ms, not 1000ms.
//! 4. Disposal silences the debouncer for good.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::{Instant, sleep};

use composer::typing::{ComposingStatus, StatusObserver, TypingDebouncer};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

type Log = Arc<Mutex<Vec<(ComposingStatus, Duration)>>>;

/// Observer that records each status with its offset from `start`.
fn recording_observer(start: Instant) -> (Log, impl StatusObserver) {
    let log: Log = Arc::default();
    let sink = Arc::clone(&log);
    let observer = move |status: ComposingStatus| {
        sink.lock().push((status, start.elapsed()));
    };
    (log, observer)
}

fn statuses(log: &Log) -> Vec<ComposingStatus> {
    log.lock().iter().map(|(status, _)| *status).collect()
}

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn typed_fires_after_last_call_not_first() {
    let start = Instant::now();
    let (log, observer) = recording_observer(start);
    let debouncer = TypingDebouncer::new(Duration::from_millis(1000), observer).unwrap();

    debouncer.notify_activity();
    assert_eq!(statuses(&log), vec![ComposingStatus::Typing]);

    sleep(Duration::from_millis(500)).await;
    debouncer.notify_activity();
    assert_eq!(statuses(&log), vec![ComposingStatus::Typing]);

    sleep(Duration::from_millis(600)).await;
    // t = 1100ms: past the first call's deadline, still typing.
    assert_eq!(debouncer.status(), ComposingStatus::Typing);

    sleep(Duration::from_millis(500)).await;
    let events = log.lock().clone();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].1, Duration::ZERO);
    assert_eq!(events[1].0, ComposingStatus::Typed);
    assert!(events[1].1 >= Duration::from_millis(1500));
    assert!(events[1].1 < Duration::from_millis(1510));
}

#[tokio::test(start_paused = true)]
async fn separate_bursts_emit_separate_pairs() {
    let (log, observer) = recording_observer(Instant::now());
    let debouncer = TypingDebouncer::new(Duration::from_millis(200), observer).unwrap();

    for _ in 0..3 {
        for _ in 0..5 {
            debouncer.notify_activity();
            sleep(Duration::from_millis(50)).await;
        }
        sleep(Duration::from_millis(500)).await;
    }

    let expected: Vec<_> =
        std::iter::repeat_n([ComposingStatus::Typing, ComposingStatus::Typed], 3)
            .flatten()
            .collect();
    assert_eq!(statuses(&log), expected);
}

#[tokio::test(start_paused = true)]
async fn status_matches_pending_timer() {
    let (_log, observer) = recording_observer(Instant::now());
    let debouncer = TypingDebouncer::new(Duration::from_millis(100), observer).unwrap();

    assert!(!debouncer.has_pending_timer());
    assert!(!debouncer.status().is_typing());

    debouncer.notify_activity();
    assert!(debouncer.has_pending_timer());
    assert!(debouncer.status().is_typing());

    sleep(Duration::from_millis(150)).await;
    assert!(!debouncer.has_pending_timer());
    assert!(!debouncer.status().is_typing());
}

// ---------------------------------------------------------------------------
// Disposal
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn disposed_debouncer_stays_silent() {
    let (log, observer) = recording_observer(Instant::now());
    let debouncer = TypingDebouncer::new(Duration::from_millis(1000), observer).unwrap();

    debouncer.notify_activity();
    sleep(Duration::from_millis(400)).await;
    debouncer.dispose();
    debouncer.dispose();

    for _ in 0..10 {
        debouncer.notify_activity();
    }
    sleep(Duration::from_secs(5)).await;

    assert_eq!(statuses(&log), vec![ComposingStatus::Typing]);
    assert!(debouncer.is_disposed());
}
