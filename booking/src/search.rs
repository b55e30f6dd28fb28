//! The in-progress flight-search form.
//!
//! Components write the form field by field as the traveller fills it in;
//! nothing is validated here beyond value types. Whether the combination of
//! fields makes a searchable query is the search gateway's concern.

use chrono::NaiveDate;
use flightdeck_core::error::StoreError;
use flightdeck_core::snapshot::{FieldPatch, Snapshot};
use serde::{Deserialize, Serialize};

/// The search form as the traveller has filled it in so far.
///
/// Date and airport fields start empty; `one_way` defaults to a return
/// trip. A stale `return_date` may survive switching to one-way — the form
/// keeps whatever was entered, and the gateway ignores it for one-way
/// queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightSearchSnapshot {
    /// Outbound travel date
    pub depart_date: Option<NaiveDate>,

    /// Return travel date (ignored for one-way trips)
    pub return_date: Option<NaiveDate>,

    /// Whether the traveller wants a one-way trip
    pub one_way: bool,

    /// Origin airport code
    pub origin: Option<String>,

    /// Destination airport code
    pub destination: Option<String>,
}

impl FlightSearchSnapshot {
    /// Field name of [`FlightSearchSnapshot::depart_date`].
    pub const DEPART_DATE: &'static str = "depart_date";

    /// Field name of [`FlightSearchSnapshot::return_date`].
    pub const RETURN_DATE: &'static str = "return_date";

    /// Field name of [`FlightSearchSnapshot::one_way`].
    pub const ONE_WAY: &'static str = "one_way";

    /// Field name of [`FlightSearchSnapshot::origin`].
    pub const ORIGIN: &'static str = "origin";

    /// Field name of [`FlightSearchSnapshot::destination`].
    pub const DESTINATION: &'static str = "destination";
}

impl Snapshot for FlightSearchSnapshot {
    const NAME: &'static str = "flight_search";

    fn apply(&mut self, patch: &FieldPatch) -> Result<(), StoreError> {
        match patch.field() {
            Self::DEPART_DATE => self.depart_date = Some(patch.expect_date(Self::NAME)?),
            Self::RETURN_DATE => self.return_date = Some(patch.expect_date(Self::NAME)?),
            Self::ONE_WAY => self.one_way = patch.expect_bool(Self::NAME)?,
            Self::ORIGIN => self.origin = Some(patch.expect_text(Self::NAME)?),
            Self::DESTINATION => self.destination = Some(patch.expect_text(Self::NAME)?),
            _ => return Err(StoreError::unknown_field(Self::NAME, patch.field())),
        }
        Ok(())
    }
}
