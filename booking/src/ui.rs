//! UI chrome flags.
//!
//! One snapshot for the transient view state of the booking shell: which of
//! the overlay panels is currently open. All flags exist from initialization
//! and updates merge into the existing snapshot, so a component toggling the
//! menu never disturbs the filter panel.

use flightdeck_core::error::StoreError;
use flightdeck_core::snapshot::{FieldPatch, Snapshot};
use serde::{Deserialize, Serialize};

/// Transient chrome flags of the booking shell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiStateSnapshot {
    /// Navigation menu overlay is open
    pub menu_open: bool,

    /// Result-filter panel is open
    pub filters_open: bool,

    /// Flight-search panel is open
    pub search_open: bool,

    /// Travel-date picker is open
    pub date_picker_open: bool,
}

impl UiStateSnapshot {
    /// Field name of [`UiStateSnapshot::menu_open`].
    pub const MENU_OPEN: &'static str = "menu_open";

    /// Field name of [`UiStateSnapshot::filters_open`].
    pub const FILTERS_OPEN: &'static str = "filters_open";

    /// Field name of [`UiStateSnapshot::search_open`].
    pub const SEARCH_OPEN: &'static str = "search_open";

    /// Field name of [`UiStateSnapshot::date_picker_open`].
    pub const DATE_PICKER_OPEN: &'static str = "date_picker_open";
}

impl Snapshot for UiStateSnapshot {
    const NAME: &'static str = "ui_state";

    fn apply(&mut self, patch: &FieldPatch) -> Result<(), StoreError> {
        match patch.field() {
            Self::MENU_OPEN => self.menu_open = patch.expect_bool(Self::NAME)?,
            Self::FILTERS_OPEN => self.filters_open = patch.expect_bool(Self::NAME)?,
            Self::SEARCH_OPEN => self.search_open = patch.expect_bool(Self::NAME)?,
            Self::DATE_PICKER_OPEN => self.date_picker_open = patch.expect_bool(Self::NAME)?,
            _ => return Err(StoreError::unknown_field(Self::NAME, patch.field())),
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)] // Test code can use expect
mod tests {
    use super::*;

    #[test]
    fn all_flags_start_closed() {
        let state = UiStateSnapshot::default();
        assert!(!state.menu_open);
        assert!(!state.filters_open);
        assert!(!state.search_open);
        assert!(!state.date_picker_open);
    }

    #[test]
    fn partial_update_preserves_other_flags() {
        let mut state = UiStateSnapshot::default();

        state
            .apply(&FieldPatch::bool(UiStateSnapshot::MENU_OPEN, true))
            .expect("known field");
        assert_eq!(
            state,
            UiStateSnapshot {
                menu_open: true,
                ..UiStateSnapshot::default()
            }
        );

        state
            .apply(&FieldPatch::bool(UiStateSnapshot::FILTERS_OPEN, true))
            .expect("known field");
        assert!(state.menu_open);
        assert!(state.filters_open);
    }

    #[test]
    fn non_boolean_value_is_rejected() {
        let mut state = UiStateSnapshot::default();
        let err = state
            .apply(&FieldPatch::text(UiStateSnapshot::MENU_OPEN, "yes"))
            .expect_err("wrong type");
        assert_eq!(
            err,
            StoreError::type_mismatch("ui_state", "menu_open", "boolean")
        );
    }
}
