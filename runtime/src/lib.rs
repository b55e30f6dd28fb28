//! # Flightdeck Runtime
//!
//! Runtime implementation for the Flightdeck state layer.
//!
//! This crate provides the [`Store`] container that owns a versioned snapshot
//! and fans change notifications out to subscribers, plus the [`Loader`]
//! progress driver built on a cancellable repeating tick.
//!
//! ## Core Components
//!
//! - **Store**: single-writer snapshot container with atomic merge updates
//!   and synchronous publish/subscribe notification
//! - **Loader**: simulated-progress driver (`Idle → Running → Completed`)
//! - **Ticker**: cancellable repeating-task primitive with an explicit token
//!
//! ## Example
//!
//! ```
//! use flightdeck_core::snapshot::{FieldPatch, Snapshot};
//! use flightdeck_core::error::StoreError;
//! use flightdeck_runtime::Store;
//!
//! #[derive(Debug, Clone, Default)]
//! struct PanelState {
//!     open: bool,
//! }
//!
//! impl Snapshot for PanelState {
//!     const NAME: &'static str = "panel";
//!
//!     fn apply(&mut self, patch: &FieldPatch) -> Result<(), StoreError> {
//!         match patch.field() {
//!             "open" => self.open = patch.expect_bool(Self::NAME)?,
//!             _ => return Err(StoreError::unknown_field(Self::NAME, patch.field())),
//!         }
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> Result<(), StoreError> {
//! let store = Store::new(PanelState::default());
//! let subscription = store.subscribe(|state: &PanelState| {
//!     // re-render from the fresh snapshot
//!     let _ = state.open;
//! });
//!
//! store.update([FieldPatch::bool("open", true)])?;
//! assert!(store.read(|s| s.open));
//! assert_eq!(store.version(), 1);
//!
//! subscription.unsubscribe();
//! # Ok(())
//! # }
//! ```

/// Loader progress driver
pub mod loader;

/// Prometheus metrics for observability
pub mod metrics;

/// Cancellable repeating-tick primitive
pub mod ticker;

/// Store module - single-writer snapshot containers with subscription fan-out.
///
/// A store owns its snapshot exclusively. Consumers read cloned views and
/// mutate only through [`Store::update`], which merges an ordered batch of
/// field patches into a copy of the current snapshot and publishes the copy
/// as one atomic replacement. Every accepted batch notifies all current
/// subscribers exactly once, in subscription order.
pub mod store {
    use flightdeck_core::error::StoreError;
    use flightdeck_core::snapshot::{FieldPatch, Snapshot, Versioned};
    use smallvec::SmallVec;
    use std::panic::AssertUnwindSafe;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

    /// Callback invoked with each published snapshot.
    type SubscriberFn<S> = dyn Fn(&S) + Send + Sync;

    struct Subscriber<S: Snapshot> {
        id: u64,
        callback: Arc<SubscriberFn<S>>,
    }

    struct Inner<S: Snapshot> {
        snapshot: RwLock<Versioned<S>>,
        subscribers: Mutex<Vec<Subscriber<S>>>,
        /// Serializes merge + broadcast so no two updates interleave and a
        /// new subscriber's replay cannot race a concurrent update.
        order: Mutex<()>,
        next_subscriber_id: AtomicU64,
    }

    /// A single-writer, multi-reader state container.
    ///
    /// Cloning a `Store` clones a handle to the same shared state, so a
    /// store can be constructed once and injected into every consumer that
    /// needs it. There is no global registry; ownership is explicit.
    ///
    /// # Reentrancy
    ///
    /// Subscriber callbacks run synchronously on the updating thread. A
    /// callback may read the store, but it must not call [`Store::update`]
    /// or [`Store::subscribe`] before returning: both serialize on the same
    /// internal order lock and would deadlock.
    pub struct Store<S: Snapshot> {
        inner: Arc<Inner<S>>,
    }

    impl<S: Snapshot> Store<S> {
        /// Create a store publishing `initial` at version zero.
        #[must_use]
        pub fn new(initial: S) -> Self {
            Self {
                inner: Arc::new(Inner {
                    snapshot: RwLock::new(Versioned::initial(initial)),
                    subscribers: Mutex::new(Vec::new()),
                    order: Mutex::new(()),
                    next_subscriber_id: AtomicU64::new(0),
                }),
            }
        }

        /// Clone of the current snapshot.
        #[must_use]
        pub fn snapshot(&self) -> S {
            self.inner
                .snapshot
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .value
                .clone()
        }

        /// Current publication version (number of accepted update batches).
        #[must_use]
        pub fn version(&self) -> u64 {
            self.inner
                .snapshot
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .version
        }

        /// Project a value out of the current snapshot without cloning it.
        ///
        /// ```ignore
        /// let open = store.read(|s| s.menu_open);
        /// ```
        pub fn read<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let guard = self
                .inner
                .snapshot
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            f(&guard.value)
        }

        /// Merge an ordered batch of field patches and publish the result.
        ///
        /// Patches are applied left-to-right onto a scratch copy of the
        /// current snapshot; a later patch for the same field wins. The copy
        /// replaces the published snapshot in one step and every current
        /// subscriber is notified exactly once, in subscription order.
        ///
        /// # Errors
        ///
        /// Returns the first patch's [`StoreError`] (unknown field or type
        /// mismatch). The batch is rejected atomically: nothing is merged,
        /// the version does not advance, and no notification is sent.
        pub fn update<I>(&self, patches: I) -> Result<(), StoreError>
        where
            I: IntoIterator<Item = FieldPatch>,
        {
            let _order = self
                .inner
                .order
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            let mut next = self.snapshot();
            let mut patch_count = 0usize;
            for patch in patches {
                if let Err(error) = next.apply(&patch) {
                    metrics::counter!("store.updates.rejected", "store" => S::NAME).increment(1);
                    tracing::warn!(
                        store = S::NAME,
                        field = patch.field(),
                        error = %error,
                        "update batch rejected"
                    );
                    return Err(error);
                }
                patch_count += 1;
            }

            let (published, version) = {
                let mut slot = self
                    .inner
                    .snapshot
                    .write()
                    .unwrap_or_else(PoisonError::into_inner);
                slot.version += 1;
                slot.value = next;
                (slot.value.clone(), slot.version)
            };

            metrics::counter!("store.updates.total", "store" => S::NAME).increment(1);
            tracing::debug!(
                store = S::NAME,
                version,
                patches = patch_count,
                "snapshot replaced"
            );

            self.broadcast(&published);
            Ok(())
        }

        /// Register a subscriber and replay the latest snapshot to it.
        ///
        /// The callback is invoked once immediately with the current
        /// snapshot (replay-one), then once per subsequent accepted update,
        /// until the returned [`Subscription`] is unsubscribed. Dropping the
        /// handle does **not** detach the subscriber; the lifecycle is
        /// explicit.
        pub fn subscribe<F>(&self, callback: F) -> Subscription<S>
        where
            F: Fn(&S) + Send + Sync + 'static,
        {
            let id = self.inner.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
            let callback: Arc<SubscriberFn<S>> = Arc::new(callback);

            // The order lock makes replay + registration one atomic step:
            // no update can slip between them, so the subscriber sees the
            // latest snapshot followed by every later one.
            let _order = self
                .inner
                .order
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            let current = self.snapshot();
            Self::deliver(id, callback.as_ref(), &current);

            self.inner
                .subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(Subscriber { id, callback });

            metrics::gauge!("store.subscribers", "store" => S::NAME).increment(1.0);
            tracing::debug!(store = S::NAME, subscriber = id, "subscriber registered");

            Subscription {
                id,
                inner: Arc::downgrade(&self.inner),
            }
        }

        /// Number of currently registered subscribers.
        #[must_use]
        pub fn subscriber_count(&self) -> usize {
            self.inner
                .subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }

        /// Notify every current subscriber, in subscription order.
        ///
        /// The subscriber list is copied out before delivery so callbacks
        /// run without the list lock held; a subscriber may therefore
        /// unsubscribe (itself or another) from within its callback.
        fn broadcast(&self, snapshot: &S) {
            let callbacks: SmallVec<[(u64, Arc<SubscriberFn<S>>); 4]> = {
                let subscribers = self
                    .inner
                    .subscribers
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                subscribers
                    .iter()
                    .map(|s| (s.id, Arc::clone(&s.callback)))
                    .collect()
            };

            for (id, callback) in callbacks {
                Self::deliver(id, callback.as_ref(), snapshot);
            }
        }

        /// Invoke one subscriber, isolating panics.
        ///
        /// A panicking subscriber is logged and counted; delivery continues
        /// with the next subscriber and store state is unaffected.
        fn deliver(id: u64, callback: &SubscriberFn<S>, snapshot: &S) {
            let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| callback(snapshot)));
            if outcome.is_err() {
                metrics::counter!("store.notify.panics", "store" => S::NAME).increment(1);
                tracing::error!(
                    store = S::NAME,
                    subscriber = id,
                    "subscriber panicked during notification"
                );
            }
        }
    }

    impl<S: Snapshot> Clone for Store<S> {
        fn clone(&self) -> Self {
            Self {
                inner: Arc::clone(&self.inner),
            }
        }
    }

    impl<S: Snapshot + Default> Default for Store<S> {
        fn default() -> Self {
            Self::new(S::default())
        }
    }

    impl<S: Snapshot> std::fmt::Debug for Store<S> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Store")
                .field("name", &S::NAME)
                .field("version", &self.version())
                .field("subscribers", &self.subscriber_count())
                .finish()
        }
    }

    /// Handle identifying one registered subscriber.
    ///
    /// Call [`Subscription::unsubscribe`] to stop delivery. Dropping the
    /// handle without unsubscribing leaves the subscriber attached.
    pub struct Subscription<S: Snapshot> {
        id: u64,
        inner: Weak<Inner<S>>,
    }

    impl<S: Snapshot> Subscription<S> {
        /// Remove this subscriber from the store.
        ///
        /// Delivery to other subscribers is unaffected. A no-op if the
        /// store has already been dropped.
        pub fn unsubscribe(self) {
            let Some(inner) = self.inner.upgrade() else {
                return;
            };
            let mut subscribers = inner
                .subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let before = subscribers.len();
            subscribers.retain(|s| s.id != self.id);
            if subscribers.len() < before {
                metrics::gauge!("store.subscribers", "store" => S::NAME).decrement(1.0);
                tracing::debug!(store = S::NAME, subscriber = self.id, "subscriber removed");
            }
        }

        /// Whether this subscriber is still registered.
        #[must_use]
        pub fn is_active(&self) -> bool {
            self.inner.upgrade().is_some_and(|inner| {
                inner
                    .subscribers
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .iter()
                    .any(|s| s.id == self.id)
            })
        }
    }

    impl<S: Snapshot> std::fmt::Debug for Subscription<S> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Subscription")
                .field("store", &S::NAME)
                .field("id", &self.id)
                .finish()
        }
    }
}

// Re-export for convenience
pub use loader::{Loader, LoaderError, LoaderPhase, ProgressSnapshot};
pub use store::{Store, Subscription};
pub use ticker::{CancelHandle, CancelToken, Ticker, cancellation};
