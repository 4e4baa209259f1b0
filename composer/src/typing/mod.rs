//! Typing-status debounce.
//!
//! [`TypingDebouncer`] turns a stream of raw "text changed" events into a
//! two-valued [`ComposingStatus`] signal:
//!
//! - the first event of a burst flips the status to `Typing` and notifies
//!   the observer synchronously (leading edge);
//! - every event cancels the pending settle timer and starts a new one, so
//!   the status reverts to `Typed` exactly one settle duration after the
//!   *last* event of the burst (trailing edge).
//!
//! Timers are tokio tasks. A generation counter guards against a superseded
//! timer that woke up before its abort was observed, so a cancelled timer
//! never reaches the observer.

pub mod broadcast;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

pub use composer_proto::status::ComposingStatus;

/// Settle duration used when none is configured.
pub const DEFAULT_SETTLE_DURATION: Duration = Duration::from_secs(1);

/// Smallest settle duration a debouncer will schedule.
///
/// A zero duration is raised to this value, which degenerates the debounce
/// to "settle on the next timer tick".
pub const MIN_SETTLE_DURATION: Duration = Duration::from_millis(1);

/// Errors that can occur when constructing a [`TypingDebouncer`].
#[derive(Debug, thiserror::Error)]
pub enum DebounceError {
    /// No tokio runtime was running on the calling thread.
    #[error("typing debouncer requires a running tokio runtime")]
    NoRuntime,
}

/// Receives composing status changes from a [`TypingDebouncer`].
///
/// Observers are invoked while the debouncer's internal lock is held, so
/// notifications arrive in transition order. An observer must not call
/// back into the debouncer that is notifying it.
pub trait StatusObserver: Send + Sync + 'static {
    /// Called once per status transition.
    fn on_status_change(&self, status: ComposingStatus);
}

impl<F> StatusObserver for F
where
    F: Fn(ComposingStatus) + Send + Sync + 'static,
{
    fn on_status_change(&self, status: ComposingStatus) {
        self(status);
    }
}

/// Observer that discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl StatusObserver for NoopObserver {
    fn on_status_change(&self, _status: ComposingStatus) {}
}

/// Forwards every notification onto an unbounded tokio channel.
///
/// A dropped receiver is logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<ComposingStatus>,
}

impl ChannelObserver {
    /// Create an observer together with the receiving end of its channel.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ComposingStatus>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl From<mpsc::UnboundedSender<ComposingStatus>> for ChannelObserver {
    fn from(tx: mpsc::UnboundedSender<ComposingStatus>) -> Self {
        Self { tx }
    }
}

impl StatusObserver for ChannelObserver {
    fn on_status_change(&self, status: ComposingStatus) {
        if self.tx.send(status).is_err() {
            tracing::debug!(%status, "status receiver closed, notification dropped");
        }
    }
}

/// Fans each notification out to several observers, in registration order.
#[derive(Default)]
pub struct ObserverSet {
    observers: Vec<Box<dyn StatusObserver>>,
}

impl ObserverSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observer to the set.
    #[must_use]
    pub fn with(mut self, observer: impl StatusObserver) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

}

impl StatusObserver for ObserverSet {
    fn on_status_change(&self, status: ComposingStatus) {
        for observer in &self.observers {
            observer.on_status_change(status);
        }
    }
}

impl std::fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverSet")
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Mutable debounce state, always accessed under [`Shared::state`].
#[derive(Debug, Default)]
struct DebounceState {
    status: ComposingStatus,
    /// The single outstanding settle timer, if any.
    pending: Option<JoinHandle<()>>,
    /// Bumped on every reschedule; a timer only settles if it still matches.
    generation: u64,
    disposed: bool,
}

/// State shared between the debouncer and its settle timer task.
struct Shared {
    state: Mutex<DebounceState>,
    observer: Box<dyn StatusObserver>,
}

impl Shared {
    /// Revert to `Typed` if the timer identified by `generation` is still
    /// the current one.
    fn settle(&self, generation: u64) {
        let mut state = self.state.lock();
        if state.disposed || state.generation != generation {
            tracing::trace!(generation, "stale settle timer ignored");
            return;
        }
        state.pending = None;
        state.status = ComposingStatus::Typed;
        tracing::debug!("composing status -> typed");
        self.observer.on_status_change(ComposingStatus::Typed);
    }
}

/// Debounces text-input activity into a `Typing` / `Typed` status.
///
/// # Disposal
///
/// [`dispose`](Self::dispose) cancels the pending timer and is idempotent.
/// After disposal, [`notify_activity`](Self::notify_activity) is a silent
/// no-op and the observer is never called again. Dropping the debouncer
/// disposes it.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use composer::typing::{ComposingStatus, TypingDebouncer};
///
/// # async fn example() -> Result<(), composer::typing::DebounceError> {
/// let debouncer = TypingDebouncer::new(Duration::from_secs(1), |status: ComposingStatus| {
///     println!("peer is now {status}");
/// })?;
/// debouncer.notify_activity(); // prints "peer is now typing"
/// tokio::time::sleep(Duration::from_millis(1100)).await; // prints "peer is now typed"
/// # Ok(())
/// # }
/// ```
pub struct TypingDebouncer {
    shared: Arc<Shared>,
    settle_duration: Duration,
    runtime: Handle,
}

impl TypingDebouncer {
    /// Create a debouncer whose timers run on the current tokio runtime.
    ///
    /// A zero `settle_duration` is raised to [`MIN_SETTLE_DURATION`].
    ///
    /// # Errors
    ///
    /// Returns [`DebounceError::NoRuntime`] when called outside a tokio
    /// runtime.
    pub fn new(
        settle_duration: Duration,
        observer: impl StatusObserver,
    ) -> Result<Self, DebounceError> {
        let runtime = Handle::try_current().map_err(|_| DebounceError::NoRuntime)?;
        Ok(Self::with_handle(runtime, settle_duration, observer))
    }

    /// Create a debouncer whose timers run on the given runtime handle.
    pub fn with_handle(
        runtime: Handle,
        settle_duration: Duration,
        observer: impl StatusObserver,
    ) -> Self {
        let settle_duration = settle_duration.max(MIN_SETTLE_DURATION);
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(DebounceState::default()),
                observer: Box::new(observer),
            }),
            settle_duration,
            runtime,
        }
    }

    /// Record one text-input activity event.
    ///
    /// Emits `Typing` immediately if the status was `Typed`, then
    /// (re)schedules the settle timer one settle duration from now.
    pub fn notify_activity(&self) {
        let mut state = self.shared.state.lock();
        if state.disposed {
            tracing::trace!("activity after dispose ignored");
            return;
        }

        if !state.status.is_typing() {
            state.status = ComposingStatus::Typing;
            tracing::debug!("composing status -> typing");
            self.shared.observer.on_status_change(ComposingStatus::Typing);
        }

        if let Some(previous) = state.pending.take() {
            previous.abort();
        }
        state.generation = state.generation.wrapping_add(1);
        let generation = state.generation;
        let deadline = Instant::now() + self.settle_duration;
        let shared = Arc::clone(&self.shared);
        state.pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            shared.settle(generation);
        }));
    }

    /// Cancel the pending settle timer and stop emitting notifications.
    ///
    /// Safe to call more than once. A debouncer disposed while `Typing`
    /// silently reverts to `Typed` without notifying the observer.
    pub fn dispose(&self) {
        let mut state = self.shared.state.lock();
        if state.disposed {
            return;
        }
        state.disposed = true;
        if let Some(pending) = state.pending.take() {
            pending.abort();
        }
        state.status = ComposingStatus::Typed;
        tracing::debug!("typing debouncer disposed");
    }

    /// The current composing status.
    #[must_use]
    pub fn status(&self) -> ComposingStatus {
        self.shared.state.lock().status
    }

    /// The effective settle duration, after normalization.
    #[must_use]
    pub const fn settle_duration(&self) -> Duration {
        self.settle_duration
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.shared.state.lock().disposed
    }

    /// Whether a settle timer is currently outstanding.
    #[must_use]
    pub fn has_pending_timer(&self) -> bool {
        self.shared.state.lock().pending.is_some()
    }
}

impl Drop for TypingDebouncer {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for TypingDebouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("TypingDebouncer")
            .field("status", &state.status)
            .field("settle_duration", &self.settle_duration)
            .field("pending", &state.pending.is_some())
            .field("disposed", &state.disposed)
            .finish_non_exhaustive()
    }
}
