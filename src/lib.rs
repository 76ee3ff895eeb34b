//! # spotmap
//!
//! Local store for map annotations ("spots") with a one-time GeoJSON seed.
//!
//! This library provides:
//! - A [`SpotStore`] trait with SQLite and in-memory implementations
//! - Validating GeoJSON seed import (point features only) and export
//! - [`SpotController`], which seeds the store exactly once and keeps the
//!   UI's copy of the spots in step with the store
//!
//! ## Features
//!
//! - **`persistence`** (default) - SQLite store
//! - **`http`** - fetch the seed file over HTTP
//! - **`ffi`** - UniFFI bindings for the mobile map widget
//! - **`full`** - everything
//!
//! ## Quick Start
//!
//! ```rust
//! use spotmap::{BundledSeed, MemorySpotStore, NewSpot, SpotController, StartupOutcome};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let mut controller = SpotController::new(MemorySpotStore::new(), BundledSeed);
//!
//! // First run imports the bundled seed file
//! let outcome = controller.startup().await.unwrap();
//! assert!(matches!(outcome, StartupOutcome::Seeded { .. }));
//!
//! let spot = controller.add_spot(NewSpot::at(34.426, 132.743)).unwrap();
//! assert!(controller.spots().iter().any(|s| s.id == spot.id));
//! # });
//! ```

// Unified error handling
pub mod error;
pub use error::{Result, SpotError};

// Spot, category and timestamp helpers
pub mod types;
pub use types::{NewSpot, Spot, SpotCategory};

// Configuration
pub mod config;
pub use config::{MapViewConfig, SeedConfig, SpotMapConfig};

// Local store (trait + implementations)
pub mod store;
#[cfg(feature = "persistence")]
pub use store::SqliteSpotStore;
pub use store::{MemorySpotStore, SpotStore};

#[cfg(feature = "persistence")]
pub mod migrations;

// Seed parsing, conversion and sources
pub mod seed;
#[cfg(feature = "http")]
pub use seed::HttpSeed;
pub use seed::{
    BundledSeed, ConfiguredSeed, FileSeed, SeedDocument, SeedSource, StaticSeed, geojson_to_spots,
    spots_to_geojson_string,
};

// Draft state machine
pub mod draft;
pub use draft::{DraftState, SpotDraft};

// Seed/sync controller
pub mod controller;
pub use controller::{SpotController, StartupOutcome};

// FFI bindings for mobile platforms (iOS/Android)
#[cfg(feature = "ffi")]
pub mod ffi;

#[cfg(feature = "ffi")]
uniffi::setup_scaffolding!();

/// Open the SQLite store and seed source described by `config`.
#[cfg(feature = "persistence")]
pub fn open_from_config(
    config: &SpotMapConfig,
) -> Result<SpotController<SqliteSpotStore, ConfiguredSeed>> {
    config.validate()?;
    let store = SqliteSpotStore::open(&config.db_path)?;
    let seed = ConfiguredSeed::from_config(&config.seed)?;
    Ok(SpotController::new(store, seed))
}

/// Initialize logging for Android
#[cfg(target_os = "android")]
pub fn init_logging() {
    use android_logger::Config;
    use log::LevelFilter;

    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("spotmap"),
    );
}

#[cfg(not(target_os = "android"))]
pub fn init_logging() {
    // No-op on non-Android platforms
}
