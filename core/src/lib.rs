//! # Flightdeck Core
//!
//! Core types for the Flightdeck state layer.
//!
//! This crate provides the fundamental abstractions for the reactive UI-state
//! stores of the booking frontend: snapshots, field patches, and the errors a
//! store can report when an update batch is malformed.
//!
//! ## Core Concepts
//!
//! - **Snapshot**: an immutable point-in-time value of a store's state
//! - **Field patch**: a partial update addressing one named field
//! - **Versioned snapshot**: snapshot plus a monotonically increasing version
//! - **Store** (in `flightdeck-runtime`): single-writer container that merges
//!   patch batches atomically and notifies subscribers
//!
//! ## Architecture Principles
//!
//! - Single-writer, multi-reader state containers
//! - Copy-on-write merge: consumers never mutate shared state
//! - Explicit subscribe/unsubscribe lifecycle (no hidden global streams)
//! - Explicitly constructed store instances, injected into consumers
//!
//! ## Example
//!
//! ```
//! use flightdeck_core::snapshot::{FieldPatch, Snapshot};
//! use flightdeck_core::error::StoreError;
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
//! let mut state = PanelState::default();
//! state.apply(&FieldPatch::bool("open", true))?;
//! assert!(state.open);
//! # Ok(())
//! # }
//! ```

// Re-export commonly used types
pub use chrono::NaiveDate;
pub use serde::{Deserialize, Serialize};

pub mod error;
pub mod snapshot;

pub use error::StoreError;
pub use snapshot::{FieldPatch, FieldValue, Snapshot, Versioned};
