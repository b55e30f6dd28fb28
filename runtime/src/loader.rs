//! Simulated-progress driver for perceived loading.
//!
//! The booking UI shows a progress bar while search results are fetched. The
//! bar does not track real transfer progress; a [`Loader`] walks the
//! published percent from 0 toward a target over a fixed duration on a 10 ms
//! tick, then overwrites it with the exact target when the duration elapses.
//!
//! The driver is a small state machine:
//!
//! ```text
//! Idle ──set_progress──▶ Running ──duration elapsed──▶ Completed
//!                           │
//!                           └──────stop (advisory)────▶ Completed
//! ```
//!
//! `stop` signals the run's cancellation token; the tick task observes it at
//! the next tick boundary and publishes nothing further. A fresh
//! `set_progress` cancels any active run and restarts from zero.

use crate::store::{Store, Subscription};
use crate::ticker::{CancelHandle, CancelToken, Ticker, cancellation};
use flightdeck_core::error::StoreError;
use flightdeck_core::snapshot::{FieldPatch, Snapshot};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;

/// Period of the loader's simulated-progress tick.
pub const TICK_PERIOD: Duration = Duration::from_millis(10);

/// Errors reported synchronously by [`Loader::set_progress`].
///
/// No timer is started when validation fails; an active run, if any, keeps
/// running untouched.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderError {
    /// The requested target lies outside `0..=100`.
    #[error("progress target must be within 0..=100, got {target}")]
    TargetOutOfRange {
        /// The rejected target value
        target: u8,
    },

    /// The requested duration was zero.
    #[error("progress duration must be greater than zero")]
    ZeroDuration,
}

/// Published progress of a loader run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Simulated completion percent, `0..=100`. Monotonically
    /// non-decreasing within one run; reset only by an explicit restart.
    pub percent: u8,
}

impl ProgressSnapshot {
    /// Field name of the percent value.
    pub const PERCENT: &'static str = "percent";
}

impl Snapshot for ProgressSnapshot {
    const NAME: &'static str = "progress";

    fn apply(&mut self, patch: &FieldPatch) -> Result<(), StoreError> {
        match patch.field() {
            Self::PERCENT => {
                let raw = patch.expect_integer(Self::NAME)?;
                self.percent = u8::try_from(raw)
                    .ok()
                    .filter(|percent| *percent <= 100)
                    .ok_or_else(|| {
                        StoreError::type_mismatch(Self::NAME, patch.field(), "integer in 0..=100")
                    })?;
            },
            _ => return Err(StoreError::unknown_field(Self::NAME, patch.field())),
        }
        Ok(())
    }
}

/// Lifecycle of a loader run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderPhase {
    /// No run has been started yet
    Idle,

    /// A tick task is driving the percent toward its target
    Running,

    /// The last run finished or was stopped
    Completed,
}

impl LoaderPhase {
    const fn decode(raw: u8) -> Self {
        match raw {
            1 => Self::Running,
            2 => Self::Completed,
            _ => Self::Idle, // Includes 0 and any unexpected values
        }
    }
}

impl std::fmt::Display for LoaderPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Drives a simulated progress value from 0 to a target over a duration.
///
/// The loader owns a [`Store<ProgressSnapshot>`] and is its single writer;
/// consumers subscribe through [`Loader::subscribe`] and get replay-one plus
/// every published percent.
///
/// # Example
///
/// ```ignore
/// let loader = Loader::new();
/// let subscription = loader.subscribe(|p| render_bar(p.percent));
///
/// loader.set_progress(75, Duration::from_millis(600))?;
/// // ... percent climbs toward 75 in 10 ms steps ...
/// loader.stop(); // or let the run finalize at exactly 75
/// ```
#[derive(Debug)]
pub struct Loader {
    progress: Store<ProgressSnapshot>,
    current: Mutex<RunState>,
}

/// Phase cell and cancellation handle of the current run.
///
/// Each run owns its own phase cell: a cancelled run that winds down late
/// writes `Completed` into its stale cell, never into a successor's.
#[derive(Debug)]
struct RunState {
    phase: Arc<AtomicU8>,
    cancel: Option<CancelHandle>,
}

impl Loader {
    /// Create an idle loader publishing zero percent.
    #[must_use]
    pub fn new() -> Self {
        Self {
            progress: Store::new(ProgressSnapshot::default()),
            current: Mutex::new(RunState {
                phase: Arc::new(AtomicU8::new(LoaderPhase::Idle as u8)),
                cancel: None,
            }),
        }
    }

    /// Start (or restart) a simulated run toward `target` percent.
    ///
    /// Resets the published percent to 0, transitions to
    /// [`LoaderPhase::Running`], and spawns a tick task that publishes
    /// `round(counter × target / total_ticks)` every 10 ms while the value
    /// stays below 100. When the duration has elapsed the task publishes
    /// `target` exactly once, regardless of the last incremental value, and
    /// transitions to [`LoaderPhase::Completed`]. An active run is cancelled
    /// first; its in-flight tick may still fire once.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::TargetOutOfRange`] or
    /// [`LoaderError::ZeroDuration`] without starting a timer or touching an
    /// active run.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn set_progress(&self, target: u8, duration: Duration) -> Result<(), LoaderError> {
        if target > 100 {
            return Err(LoaderError::TargetOutOfRange { target });
        }
        if duration.is_zero() {
            return Err(LoaderError::ZeroDuration);
        }

        // Whole ticks that fit in the duration; a sub-tick duration skips
        // straight to finalization.
        let total_ticks =
            u64::try_from(duration.as_millis() / TICK_PERIOD.as_millis()).unwrap_or(u64::MAX);

        let (handle, token) = cancellation();
        let phase = Arc::new(AtomicU8::new(LoaderPhase::Running as u8));
        {
            let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(previous) = current.cancel.replace(handle) {
                previous.cancel();
            }
            current.phase = Arc::clone(&phase);
        }

        let _ = self
            .progress
            .update([FieldPatch::integer(ProgressSnapshot::PERCENT, 0)]);

        metrics::counter!("loader.runs").increment(1);
        tracing::debug!(target_percent = target, ?duration, total_ticks, "loader run started");

        let progress = self.progress.clone();
        tokio::spawn(drive(progress, phase, token, target, total_ticks));

        Ok(())
    }

    /// Request cancellation of the active run.
    ///
    /// Advisory: the tick task observes the token at its next tick boundary,
    /// transitions to [`LoaderPhase::Completed`] without reaching the
    /// target, and publishes nothing further. A no-op when no run is active.
    pub fn stop(&self) {
        let handle = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel
            .take();
        if let Some(handle) = handle {
            handle.cancel();
            metrics::counter!("loader.stopped").increment(1);
            tracing::debug!("loader stop requested");
        }
    }

    /// Current phase of the loader state machine.
    #[must_use]
    pub fn phase(&self) -> LoaderPhase {
        let current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        LoaderPhase::decode(current.phase.load(Ordering::Acquire))
    }

    /// Currently published percent.
    #[must_use]
    pub fn percent(&self) -> u8 {
        self.progress.read(|p| p.percent)
    }

    /// Subscribe to published progress (replay-one, then every update).
    pub fn subscribe<F>(&self, callback: F) -> Subscription<ProgressSnapshot>
    where
        F: Fn(&ProgressSnapshot) + Send + Sync + 'static,
    {
        self.progress.subscribe(callback)
    }

    /// The underlying progress store, for consumers that compose stores.
    #[must_use]
    pub const fn progress_store(&self) -> &Store<ProgressSnapshot> {
        &self.progress
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Tick task for one run.
///
/// Publication is gated below 100: a value pushed to 100 by rounding is
/// withheld until the finalization overwrite. Cancellation is observed at
/// tick boundaries only.
async fn drive(
    progress: Store<ProgressSnapshot>,
    phase: Arc<AtomicU8>,
    token: CancelToken,
    target: u8,
    total_ticks: u64,
) {
    let mut ticker = Ticker::new(TICK_PERIOD, token);
    let mut counter: u64 = 0;

    while counter < total_ticks {
        if !ticker.tick().await {
            phase.store(LoaderPhase::Completed as u8, Ordering::Release);
            metrics::counter!("loader.cancelled").increment(1);
            tracing::debug!(ticks = counter, "loader run cancelled");
            return;
        }
        counter += 1;
        metrics::counter!("loader.ticks").increment(1);

        // round(counter * target / total_ticks) in integer arithmetic
        let value = (counter * u64::from(target) + total_ticks / 2) / total_ticks;
        let value = u8::try_from(value).unwrap_or(u8::MAX);
        if value < 100 {
            let _ = progress.update([FieldPatch::integer(
                ProgressSnapshot::PERCENT,
                i64::from(value),
            )]);
        }
    }

    let _ = progress.update([FieldPatch::integer(
        ProgressSnapshot::PERCENT,
        i64::from(target),
    )]);
    phase.store(LoaderPhase::Completed as u8, Ordering::Release);
    tracing::debug!(target_percent = target, "loader run completed");
}

#[cfg(test)]
#[allow(clippy::expect_used)] // Test code can use expect
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;
    use std::time::Instant;

    /// Poll until `condition` holds or `timeout` elapses.
    async fn wait_for(condition: impl Fn() -> bool, timeout: Duration) -> bool {
        let started = Instant::now();
        while started.elapsed() < timeout {
            if condition() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        condition()
    }

    #[test]
    fn rejects_target_above_one_hundred() {
        let loader = Loader::new();
        let err = loader
            .set_progress(101, Duration::from_millis(100))
            .expect_err("target out of range");
        assert_eq!(err, LoaderError::TargetOutOfRange { target: 101 });
        assert_eq!(loader.phase(), LoaderPhase::Idle);
    }

    #[test]
    fn rejects_zero_duration() {
        let loader = Loader::new();
        let err = loader
            .set_progress(50, Duration::ZERO)
            .expect_err("zero duration");
        assert_eq!(err, LoaderError::ZeroDuration);
        assert_eq!(loader.phase(), LoaderPhase::Idle);
    }

    #[tokio::test]
    async fn run_finalizes_at_exact_target() {
        let loader = Loader::new();
        let published = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&published);
        let _subscription = loader.subscribe(move |p: &ProgressSnapshot| {
            sink.lock().expect("test mutex").push(p.percent);
        });

        loader
            .set_progress(50, Duration::from_millis(200))
            .expect("valid run");
        assert!(
            wait_for(
                || loader.phase() == LoaderPhase::Completed,
                Duration::from_secs(5),
            )
            .await
        );

        assert_eq!(loader.percent(), 50);
        let values = published.lock().expect("test mutex").clone();
        // Final publication is the exact target, and the climb never
        // decreases within the run (after the restart reset to 0).
        assert_eq!(values.last().copied(), Some(50));
        let run = &values[1..]; // skip the replay-one of the idle snapshot
        assert!(run.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[tokio::test]
    async fn stop_halts_publication_at_next_tick_boundary() {
        let loader = Loader::new();
        loader
            .set_progress(80, Duration::from_secs(5))
            .expect("valid run");

        tokio::time::sleep(Duration::from_millis(100)).await;
        loader.stop();
        assert!(
            wait_for(
                || loader.phase() == LoaderPhase::Completed,
                Duration::from_secs(2),
            )
            .await
        );

        // Any in-flight tick has fired by now; the percent must not move
        // again and the target is never force-published.
        tokio::time::sleep(Duration::from_millis(50)).await;
        let frozen = loader.percent();
        assert!(frozen < 80);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(loader.percent(), frozen);
    }

    #[tokio::test]
    async fn sub_tick_duration_skips_to_finalization() {
        let loader = Loader::new();
        loader
            .set_progress(30, Duration::from_millis(5))
            .expect("valid run");
        assert!(
            wait_for(
                || loader.phase() == LoaderPhase::Completed,
                Duration::from_secs(2),
            )
            .await
        );
        assert_eq!(loader.percent(), 30);
    }

    #[tokio::test]
    async fn restart_resets_progress_and_cancels_previous_run() {
        let loader = Loader::new();
        loader
            .set_progress(90, Duration::from_secs(10))
            .expect("valid run");
        tokio::time::sleep(Duration::from_millis(50)).await;

        loader
            .set_progress(40, Duration::from_millis(200))
            .expect("restart");
        assert!(
            wait_for(
                || loader.phase() == LoaderPhase::Completed,
                Duration::from_secs(5),
            )
            .await
        );
        assert_eq!(loader.percent(), 40);
    }

    #[tokio::test]
    async fn target_one_hundred_is_published_by_finalization() {
        let loader = Loader::new();
        let published = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&published);
        let _subscription = loader.subscribe(move |p: &ProgressSnapshot| {
            sink.lock().expect("test mutex").push(p.percent);
        });

        loader
            .set_progress(100, Duration::from_millis(100))
            .expect("valid run");
        assert!(
            wait_for(
                || loader.phase() == LoaderPhase::Completed,
                Duration::from_secs(5),
            )
            .await
        );

        let values = published.lock().expect("test mutex").clone();
        // Incremental publication is gated below 100; the single 100 comes
        // from the finalization overwrite.
        assert_eq!(values.iter().filter(|v| **v == 100).count(), 1);
        assert_eq!(values.last().copied(), Some(100));
        assert_eq!(loader.percent(), 100);
    }
}
