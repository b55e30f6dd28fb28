//! Booking UI demo binary
//!
//! Wires the booking stores together the way the frontend shell would:
//! subscriptions render state changes, toggles and form edits dispatch
//! updates, and a loader run simulates search progress.

use anyhow::Result;
use chrono::NaiveDate;
use flightdeck_booking::{BookingStores, FlightSearchSnapshot};
use flightdeck_core::snapshot::FieldPatch;
use flightdeck_runtime::LoaderPhase;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "booking_ui=debug,flightdeck_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Booking UI: Flightdeck state layer ===\n");

    let stores = BookingStores::new();

    // Components subscribe and re-render from every published snapshot;
    // each gets the current snapshot immediately (replay-one).
    let _chrome = stores.ui.subscribe(|ui| {
        println!(
            "  [chrome]   menu={} filters={} search={} dates={}",
            ui.menu_open, ui.filters_open, ui.search_open, ui.date_picker_open
        );
    });
    let _form = stores.search.subscribe(|form| {
        println!(
            "  [form]     {:?} -> {:?}, depart {:?}, one-way {}",
            form.origin, form.destination, form.depart_date, form.one_way
        );
    });
    let _bar = stores.loader.subscribe(|progress| {
        println!("  [progress] {}%", progress.percent);
    });

    println!("\n>>> Opening the search panel");
    stores.toggle_search()?;

    println!("\n>>> Filling in the search form");
    let depart = NaiveDate::from_ymd_opt(2025, 6, 1)
        .ok_or_else(|| anyhow::anyhow!("invalid demo date"))?;
    stores.search.update([
        FieldPatch::text(FlightSearchSnapshot::ORIGIN, "LIS"),
        FieldPatch::text(FlightSearchSnapshot::DESTINATION, "JFK"),
        FieldPatch::date(FlightSearchSnapshot::DEPART_DATE, depart),
        FieldPatch::bool(FlightSearchSnapshot::ONE_WAY, true),
    ])?;

    println!("\n>>> Simulating search progress to 90% over 300ms");
    stores.loader.set_progress(90, Duration::from_millis(300))?;
    while stores.loader.phase() != LoaderPhase::Completed {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    println!("\n>>> Restarting the loader, then abandoning the search");
    stores.loader.set_progress(100, Duration::from_secs(5))?;
    tokio::time::sleep(Duration::from_millis(120)).await;
    stores.loader.stop();
    tokio::time::sleep(Duration::from_millis(40)).await;
    println!(
        "  loader stopped at {}% ({})",
        stores.loader.percent(),
        stores.loader.phase()
    );

    println!("\n>>> Closing the search panel");
    stores.toggle_search()?;

    println!("\n=== Done ===");
    println!("  ui version: {}", stores.ui.version());
    println!("  form version: {}", stores.search.version());

    Ok(())
}
