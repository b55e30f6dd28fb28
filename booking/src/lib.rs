//! # Flightdeck Booking
//!
//! Booking-domain state for the Flightdeck layer.
//!
//! This crate defines the snapshots the booking frontend actually renders
//! from, and wires them into one explicitly constructed [`BookingStores`]
//! bundle:
//!
//! - [`UiStateSnapshot`]: UI chrome flags (menu, filter panel, search panel,
//!   date picker)
//! - [`FlightSearchSnapshot`]: the in-progress search form
//! - [`FiltersSnapshot`]: result filters
//! - a [`Loader`](flightdeck_runtime::Loader) for perceived search progress
//!
//! The search/booking backend is an out-of-scope collaborator, represented
//! only by the [`FlightSearchGateway`] interface.
//!
//! ## Example
//!
//! ```
//! use flightdeck_booking::BookingStores;
//! use flightdeck_core::snapshot::FieldPatch;
//!
//! # fn main() -> Result<(), flightdeck_core::error::StoreError> {
//! let stores = BookingStores::new();
//!
//! stores.toggle_menu()?;
//! assert!(stores.ui.read(|s| s.menu_open));
//!
//! stores.search.update([FieldPatch::text(
//!     flightdeck_booking::FlightSearchSnapshot::ORIGIN,
//!     "LIS",
//! )])?;
//! # Ok(())
//! # }
//! ```

pub mod filters;
pub mod gateway;
pub mod search;
pub mod stores;
pub mod ui;

pub use filters::FiltersSnapshot;
pub use gateway::{Airport, FlightOffer, FlightSearchGateway, GatewayError};
pub use search::FlightSearchSnapshot;
pub use stores::BookingStores;
pub use ui::UiStateSnapshot;
