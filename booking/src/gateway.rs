//! Search gateway interface.
//!
//! The backend that actually finds flights is an external collaborator; the
//! state layer only needs its shape. Implementations live with the HTTP
//! client, stubs live with the tests.
//!
//! # Dyn Compatibility
//!
//! The trait uses explicit `Pin<Box<dyn Future>>` returns instead of
//! `async fn` to enable trait object usage (`Arc<dyn FlightSearchGateway>`),
//! which is how consumers hold the gateway alongside their stores.

use crate::search::FlightSearchSnapshot;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors that can occur talking to the search backend.
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    /// The backend could not be reached
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend's response could not be decoded
    #[error("decode error: {0}")]
    Decode(String),
}

/// An airport the traveller can pick as origin or destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airport {
    /// IATA code, e.g. `LIS`
    pub code: String,
    /// City served by the airport
    pub city: String,
    /// Country of the airport
    pub country: String,
}

/// One flight offer returned by the search backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightOffer {
    /// Operating carrier code
    pub airline: String,
    /// Origin airport code
    pub origin: String,
    /// Destination airport code
    pub destination: String,
    /// Departure date
    pub departs: NaiveDate,
    /// Number of stops (0 for a direct flight)
    pub stops: u8,
    /// Total price in cents
    pub price_cents: u64,
}

/// Interface to the flight-search backend.
///
/// The state layer never implements this itself; it is injected next to the
/// stores so components can launch a search from the current
/// [`FlightSearchSnapshot`].
pub trait FlightSearchGateway: Send + Sync {
    /// List the airports available to the search form.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the backend cannot be reached or its
    /// response cannot be decoded.
    fn airports(&self)
    -> Pin<Box<dyn Future<Output = Result<Vec<Airport>, GatewayError>> + Send + '_>>;

    /// Search flights matching the current form.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the backend cannot be reached or its
    /// response cannot be decoded.
    fn search(
        &self,
        criteria: FlightSearchSnapshot,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<FlightOffer>, GatewayError>> + Send + '_>>;
}
