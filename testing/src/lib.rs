//! # Flightdeck Testing
//!
//! Testing utilities and helpers for the Flightdeck state layer.
//!
//! This crate provides:
//! - [`Recorder`]: a subscriber mock that collects every delivered snapshot
//! - [`SnapshotTest`]: a fluent Given-When-Then harness for snapshot stores
//!
//! ## Example
//!
//! ```ignore
//! use flightdeck_testing::{Recorder, SnapshotTest};
//!
//! let recorder = Recorder::new();
//! let store = Store::new(UiStateSnapshot::default());
//! let subscription = store.subscribe(recorder.callback());
//!
//! store.update([FieldPatch::bool("menu_open", true)])?;
//! assert_eq!(recorder.len(), 2); // replay + update
//! ```


/// Mock subscribers for testing notification fan-out.
///
/// Mock implementations for testing.
pub mod mocks {
    use flightdeck_core::snapshot::Snapshot;
    use std::sync::{Arc, Mutex, PoisonError};

    /// Collects every snapshot delivered to a subscription.
    ///
    /// Hand [`Recorder::callback`] to `Store::subscribe` and assert on the
    /// recorded sequence afterwards. Clones share the same buffer, so the
    /// recorder stays usable after the callback moved into the store.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let recorder = Recorder::new();
    /// let _subscription = store.subscribe(recorder.callback());
    /// store.update([FieldPatch::bool("menu_open", true)])?;
    /// assert_eq!(recorder.snapshots().len(), 2); // replay + update
    /// ```
    #[derive(Debug)]
    pub struct Recorder<S> {
        seen: Arc<Mutex<Vec<S>>>,
    }

    impl<S: Snapshot> Recorder<S> {
        /// Create an empty recorder.
        #[must_use]
        pub fn new() -> Self {
            Self {
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// A subscription callback that appends every delivery.
        #[must_use]
        pub fn callback(&self) -> impl Fn(&S) + Send + Sync + 'static + use<S> {
            let seen = Arc::clone(&self.seen);
            move |snapshot: &S| {
                seen.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(snapshot.clone());
            }
        }

        /// All recorded snapshots, in delivery order.
        #[must_use]
        pub fn snapshots(&self) -> Vec<S> {
            self.seen
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// The most recently delivered snapshot, if any.
        #[must_use]
        pub fn last(&self) -> Option<S> {
            self.seen
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .last()
                .cloned()
        }

        /// Number of deliveries recorded so far.
        #[must_use]
        pub fn len(&self) -> usize {
            self.seen
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }

        /// Whether nothing has been delivered yet.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        /// Forget everything recorded so far.
        pub fn clear(&self) {
            self.seen
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clear();
        }
    }

    impl<S: Snapshot> Default for Recorder<S> {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<S> Clone for Recorder<S> {
        fn clone(&self) -> Self {
            Self {
                seen: Arc::clone(&self.seen),
            }
        }
    }
}

// Re-export commonly used items
pub use mocks::Recorder;
pub use store_test::SnapshotTest;

#[cfg(test)]
#[allow(clippy::expect_used)] // Test code can use expect
mod tests {
    use super::*;
    use flightdeck_core::error::StoreError;
    use flightdeck_core::snapshot::{FieldPatch, Snapshot};
    use flightdeck_runtime::Store;

    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    struct FlagState {
        on: bool,
    }

    impl Snapshot for FlagState {
        const NAME: &'static str = "flag";

        fn apply(&mut self, patch: &FieldPatch) -> Result<(), StoreError> {
            match patch.field() {
                "on" => self.on = patch.expect_bool(Self::NAME)?,
                _ => return Err(StoreError::unknown_field(Self::NAME, patch.field())),
            }
            Ok(())
        }
    }

    #[test]
    fn recorder_collects_replay_and_updates() {
        let store = Store::new(FlagState::default());
        let recorder = Recorder::new();
        let _subscription = store.subscribe(recorder.callback());

        assert_eq!(recorder.len(), 1); // replay-one
        store
            .update([FieldPatch::bool("on", true)])
            .expect("known field");

        assert_eq!(
            recorder.snapshots(),
            vec![FlagState { on: false }, FlagState { on: true }]
        );
        assert_eq!(recorder.last(), Some(FlagState { on: true }));
    }

    #[test]
    fn recorder_clear_resets_the_buffer() {
        let store = Store::new(FlagState::default());
        let recorder = Recorder::new();
        let _subscription = store.subscribe(recorder.callback());

        recorder.clear();
        assert!(recorder.is_empty());
    }
}
