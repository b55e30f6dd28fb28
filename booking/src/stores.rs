//! Store wiring for the booking frontend.
//!
//! One bundle, constructed once at startup and injected into every
//! component that renders or mutates booking state. There is no global
//! registry; a test constructs its own bundle and throws it away.

use crate::filters::FiltersSnapshot;
use crate::search::FlightSearchSnapshot;
use crate::ui::UiStateSnapshot;
use flightdeck_core::error::StoreError;
use flightdeck_core::snapshot::FieldPatch;
use flightdeck_runtime::{Loader, Store};

/// The booking frontend's stores, as one injected bundle.
#[derive(Debug)]
pub struct BookingStores {
    /// UI chrome flags (menu, panels, date picker)
    pub ui: Store<UiStateSnapshot>,

    /// The in-progress search form
    pub search: Store<FlightSearchSnapshot>,

    /// Result filters
    pub filters: Store<FiltersSnapshot>,

    /// Simulated search progress
    pub loader: Loader,
}

impl BookingStores {
    /// Create all stores with their default initial snapshots.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ui: Store::new(UiStateSnapshot::default()),
            search: Store::new(FlightSearchSnapshot::default()),
            filters: Store::new(FiltersSnapshot::default()),
            loader: Loader::new(),
        }
    }

    /// Flip the navigation-menu flag.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the signature propagates the store's
    /// [`StoreError`] like any other update.
    pub fn toggle_menu(&self) -> Result<(), StoreError> {
        self.flip(UiStateSnapshot::MENU_OPEN, |s| s.menu_open)
    }

    /// Flip the result-filter panel flag.
    ///
    /// # Errors
    ///
    /// See [`BookingStores::toggle_menu`].
    pub fn toggle_filters(&self) -> Result<(), StoreError> {
        self.flip(UiStateSnapshot::FILTERS_OPEN, |s| s.filters_open)
    }

    /// Flip the flight-search panel flag.
    ///
    /// # Errors
    ///
    /// See [`BookingStores::toggle_menu`].
    pub fn toggle_search(&self) -> Result<(), StoreError> {
        self.flip(UiStateSnapshot::SEARCH_OPEN, |s| s.search_open)
    }

    /// Flip the date-picker flag.
    ///
    /// # Errors
    ///
    /// See [`BookingStores::toggle_menu`].
    pub fn toggle_date_picker(&self) -> Result<(), StoreError> {
        self.flip(UiStateSnapshot::DATE_PICKER_OPEN, |s| s.date_picker_open)
    }

    fn flip(
        &self,
        field: &'static str,
        current: impl FnOnce(&UiStateSnapshot) -> bool,
    ) -> Result<(), StoreError> {
        let value = self.ui.read(current);
        self.ui.update([FieldPatch::bool(field, !value)])
    }
}

impl Default for BookingStores {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)] // Test code can use expect
mod tests {
    use super::*;

    #[test]
    fn toggles_flip_only_their_own_flag() {
        let stores = BookingStores::new();

        stores.toggle_menu().expect("known field");
        stores.toggle_search().expect("known field");
        let ui = stores.ui.snapshot();
        assert!(ui.menu_open);
        assert!(ui.search_open);
        assert!(!ui.filters_open);
        assert!(!ui.date_picker_open);

        stores.toggle_menu().expect("known field");
        assert!(!stores.ui.read(|s| s.menu_open));
        assert!(stores.ui.read(|s| s.search_open));
    }

    #[test]
    fn stores_are_independent() {
        let stores = BookingStores::new();
        stores.toggle_menu().expect("known field");

        assert_eq!(stores.search.version(), 0);
        assert_eq!(stores.filters.version(), 0);
        assert_eq!(stores.ui.version(), 1);
    }
}
