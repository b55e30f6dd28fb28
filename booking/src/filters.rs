//! Result filters.

use flightdeck_core::error::StoreError;
use flightdeck_core::snapshot::{FieldPatch, Snapshot};
use serde::{Deserialize, Serialize};

/// Filters applied to a search's result list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiltersSnapshot {
    /// Show direct flights only
    pub direct_only: bool,

    /// Restrict results to one carrier code
    pub airline: Option<String>,

    /// Maximum number of stops to show
    pub max_stops: Option<u8>,
}

impl FiltersSnapshot {
    /// Field name of [`FiltersSnapshot::direct_only`].
    pub const DIRECT_ONLY: &'static str = "direct_only";

    /// Field name of [`FiltersSnapshot::airline`].
    pub const AIRLINE: &'static str = "airline";

    /// Field name of [`FiltersSnapshot::max_stops`].
    pub const MAX_STOPS: &'static str = "max_stops";
}

impl Snapshot for FiltersSnapshot {
    const NAME: &'static str = "filters";

    fn apply(&mut self, patch: &FieldPatch) -> Result<(), StoreError> {
        match patch.field() {
            Self::DIRECT_ONLY => self.direct_only = patch.expect_bool(Self::NAME)?,
            Self::AIRLINE => self.airline = Some(patch.expect_text(Self::NAME)?),
            Self::MAX_STOPS => {
                let raw = patch.expect_integer(Self::NAME)?;
                let stops = u8::try_from(raw).map_err(|_| {
                    StoreError::type_mismatch(Self::NAME, patch.field(), "integer in 0..=255")
                })?;
                self.max_stops = Some(stops);
            },
            _ => return Err(StoreError::unknown_field(Self::NAME, patch.field())),
        }
        Ok(())
    }
}
