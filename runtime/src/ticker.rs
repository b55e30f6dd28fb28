//! Cancellable repeating-tick primitive.
//!
//! The loader's simulated progress is driven by a periodic tick that must be
//! stoppable from outside the driving task. Cancellation is explicit and
//! cooperative: the controlling side holds a [`CancelHandle`], the driven
//! side polls a [`CancelToken`] at tick boundaries. A tick already in flight
//! when the handle cancels may still be observed once; nothing is interrupted
//! mid-callback.

use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{self, Interval, MissedTickBehavior};

/// Create a linked cancellation pair.
///
/// The [`CancelHandle`] side requests cancellation; every clone of the
/// [`CancelToken`] side observes it. Dropping the handle counts as
/// cancellation, so an abandoned run can never tick forever.
#[must_use]
pub fn cancellation() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

/// Controlling side of a cancellation pair.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Request cancellation.
    ///
    /// Advisory: the token side observes it at its next check, typically the
    /// next tick boundary.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Observing side of a cancellation pair.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until cancellation is requested.
    ///
    /// Completes immediately if the handle has already cancelled or been
    /// dropped.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            // A dropped handle counts as cancellation.
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}

/// A periodic tick that stops when its token cancels.
///
/// The first tick fires one full period after construction. Missed ticks are
/// delayed, not burst: the observable tick rate never exceeds one per period.
///
/// # Example
///
/// ```ignore
/// let (handle, token) = cancellation();
/// let mut ticker = Ticker::new(Duration::from_millis(10), token);
/// while ticker.tick().await {
///     // one unit of periodic work
/// }
/// // handle.cancel() ends the loop at the next tick boundary
/// ```
#[derive(Debug)]
pub struct Ticker {
    interval: Interval,
    token: CancelToken,
}

impl Ticker {
    /// Create a ticker firing every `period` until `token` cancels.
    #[must_use]
    pub fn new(period: Duration, token: CancelToken) -> Self {
        let mut interval = time::interval_at(time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval, token }
    }

    /// Wait for the next tick boundary.
    ///
    /// Returns `true` when a tick fired, `false` once the token is
    /// cancelled. After the first `false` every subsequent call returns
    /// `false` immediately.
    pub async fn tick(&mut self) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        tokio::select! {
            () = self.token.cancelled() => false,
            _ = self.interval.tick() => true,
        }
    }
}
