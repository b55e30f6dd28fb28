//! Integration tests for the booking stores
//!
//! These tests exercise the full flow a booking screen drives: chrome
//! toggles, form fill, filter changes, and a loader run with subscribed
//! observers.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use chrono::NaiveDate;
use flightdeck_booking::{
    Airport, BookingStores, FiltersSnapshot, FlightOffer, FlightSearchGateway,
    FlightSearchSnapshot, GatewayError, UiStateSnapshot,
};
use flightdeck_core::snapshot::FieldPatch;
use flightdeck_runtime::LoaderPhase;
use flightdeck_testing::{Recorder, SnapshotTest};
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

// ============================================================================
// Test Fixtures
// ============================================================================

fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).expect("valid date")
}

/// Canned gateway: two airports, one offer per search.
struct StubGateway;

impl FlightSearchGateway for StubGateway {
    fn airports(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Airport>, GatewayError>> + Send + '_>> {
        Box::pin(async {
            Ok(vec![
                Airport {
                    code: "LIS".to_string(),
                    city: "Lisbon".to_string(),
                    country: "Portugal".to_string(),
                },
                Airport {
                    code: "JFK".to_string(),
                    city: "New York".to_string(),
                    country: "United States".to_string(),
                },
            ])
        })
    }

    fn search(
        &self,
        criteria: FlightSearchSnapshot,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<FlightOffer>, GatewayError>> + Send + '_>> {
        Box::pin(async move {
            let origin = criteria.origin.ok_or_else(|| {
                GatewayError::Transport("search submitted without an origin".to_string())
            })?;
            let destination = criteria.destination.ok_or_else(|| {
                GatewayError::Transport("search submitted without a destination".to_string())
            })?;
            let departs = criteria.depart_date.ok_or_else(|| {
                GatewayError::Transport("search submitted without a departure date".to_string())
            })?;
            Ok(vec![FlightOffer {
                airline: "TP".to_string(),
                origin,
                destination,
                departs,
                stops: 0,
                price_cents: 42_000,
            }])
        })
    }
}

/// Poll until `condition` holds or `timeout` elapses.
async fn wait_for(condition: impl Fn() -> bool, timeout: Duration) -> bool {
    let started = Instant::now();
    while started.elapsed() < timeout {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}

// ============================================================================
// Tests
// ============================================================================

/// Two chrome updates merge into one snapshot, observed by a subscriber.
#[test]
fn chrome_toggles_merge_and_notify() {
    let stores = BookingStores::new();
    let recorder = Recorder::new();
    let _subscription = stores.ui.subscribe(recorder.callback());

    stores.toggle_menu().unwrap();
    stores.toggle_filters().unwrap();

    assert_eq!(
        recorder.snapshots(),
        vec![
            UiStateSnapshot::default(),
            UiStateSnapshot {
                menu_open: true,
                ..UiStateSnapshot::default()
            },
            UiStateSnapshot {
                menu_open: true,
                filters_open: true,
                ..UiStateSnapshot::default()
            },
        ]
    );
}

/// A subscriber added mid-session starts from the current form, not from
/// the beginning of time.
#[test]
fn late_form_subscriber_sees_current_form() {
    let stores = BookingStores::new();
    stores
        .search
        .update([
            FieldPatch::text(FlightSearchSnapshot::ORIGIN, "LIS"),
            FieldPatch::date(FlightSearchSnapshot::DEPART_DATE, june(1)),
        ])
        .unwrap();

    let recorder = Recorder::new();
    let _subscription = stores.search.subscribe(recorder.callback());

    let replayed = recorder.last().expect("replay-one on subscribe");
    assert_eq!(replayed.origin.as_deref(), Some("LIS"));
    assert_eq!(replayed.depart_date, Some(june(1)));
}

/// The whole-batch rejection contract, via the fluent harness.
#[test]
fn misspelled_field_rejects_whole_batch() {
    SnapshotTest::new()
        .given_snapshot(FiltersSnapshot::default())
        .when_patches([
            FieldPatch::bool(FiltersSnapshot::DIRECT_ONLY, true),
            FieldPatch::text("carrier", "TP"),
        ])
        .then_rejected(|error| {
            assert_eq!(
                *error,
                flightdeck_core::error::StoreError::unknown_field("filters", "carrier")
            );
        })
        .then_snapshot(|filters| {
            assert!(!filters.direct_only);
        })
        .then_version(0)
        .run();
}

/// A full date-selection flow: open the picker, pick dates, run the loader
/// while results load, and land on the exact target.
#[tokio::test]
async fn date_selection_with_loader_run() {
    let stores = BookingStores::new();
    let progress = Recorder::new();
    let _subscription = stores.loader.subscribe(progress.callback());

    stores.toggle_date_picker().unwrap();
    stores
        .search
        .update([
            FieldPatch::date(FlightSearchSnapshot::DEPART_DATE, june(1)),
            FieldPatch::date(FlightSearchSnapshot::RETURN_DATE, june(14)),
        ])
        .unwrap();
    stores.toggle_date_picker().unwrap();

    stores
        .loader
        .set_progress(100, Duration::from_millis(150))
        .unwrap();
    assert!(
        wait_for(
            || stores.loader.phase() == LoaderPhase::Completed,
            Duration::from_secs(5),
        )
        .await
    );

    assert_eq!(stores.loader.percent(), 100);
    let percents: Vec<u8> = progress.snapshots().iter().map(|p| p.percent).collect();
    assert_eq!(percents.last().copied(), Some(100));
    assert!(!stores.ui.read(|s| s.date_picker_open));
}

/// Stopping the loader mid-run freezes the published percent below target.
#[tokio::test]
async fn abandoned_search_stops_loader_early() {
    let stores = BookingStores::new();
    stores
        .loader
        .set_progress(95, Duration::from_secs(10))
        .unwrap();
    tokio::time::sleep(Duration::from_millis(80)).await;

    stores.loader.stop();
    assert!(
        wait_for(
            || stores.loader.phase() == LoaderPhase::Completed,
            Duration::from_secs(2),
        )
        .await
    );
    assert!(stores.loader.percent() < 95);
}

/// The gateway seam: a stub implementation is reachable through the trait
/// object the components would hold.
#[tokio::test]
async fn gateway_answers_through_trait_object() {
    let gateway: std::sync::Arc<dyn FlightSearchGateway> = std::sync::Arc::new(StubGateway);

    let airports = gateway.airports().await.unwrap();
    assert_eq!(airports.len(), 2);
    assert_eq!(airports[0].code, "LIS");

    let stores = BookingStores::new();
    stores
        .search
        .update([
            FieldPatch::text(FlightSearchSnapshot::ORIGIN, "LIS"),
            FieldPatch::text(FlightSearchSnapshot::DESTINATION, "JFK"),
            FieldPatch::date(FlightSearchSnapshot::DEPART_DATE, june(1)),
        ])
        .unwrap();

    let offers = gateway.search(stores.search.snapshot()).await.unwrap();
    assert_eq!(offers.len(), 1);
    assert_eq!(offers[0].origin, "LIS");
    assert_eq!(offers[0].destination, "JFK");
    assert_eq!(offers[0].departs, june(1));
}

/// An incomplete form is the gateway's error, not the store's.
#[tokio::test]
async fn gateway_rejects_incomplete_form() {
    let gateway = StubGateway;
    let err = gateway
        .search(FlightSearchSnapshot::default())
        .await
        .expect_err("empty form");
    assert!(matches!(err, GatewayError::Transport(_)));
}
