//! FFI bindings for mobile platforms (iOS/Android).
//!
//! Exposes a [`SpotMap`] object to Kotlin and Swift. The map widget owns one
//! handle, feeds it location picks and draft edits, and renders whatever
//! `spots()` returns. Types crossing the boundary are prefixed with `Ffi`.

use std::sync::{Arc, Mutex, MutexGuard};

use log::{error, info};

use crate::config::{MapViewConfig, SpotMapConfig};
use crate::controller::{SpotController, StartupOutcome};
use crate::draft::SpotDraft;
use crate::error::SpotError;
use crate::init_logging;
use crate::seed::{ConfiguredSeed, SeedSource};
use crate::store::SqliteSpotStore;
use crate::types::{Spot, SpotCategory};

// ============================================================================
// Boundary Types
// ============================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum FfiSpotError {
    #[error("Storage unavailable: {message}")]
    Init { message: String },
    #[error("Storage error: {message}")]
    Storage { message: String },
    #[error("Invalid configuration: {message}")]
    Config { message: String },
    #[error("No draft is being edited")]
    NoDraft,
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<SpotError> for FfiSpotError {
    fn from(e: SpotError) -> Self {
        match e {
            SpotError::Init { message } => FfiSpotError::Init { message },
            SpotError::Config { message } => FfiSpotError::Config { message },
            SpotError::Serialization(e) => FfiSpotError::Config {
                message: e.to_string(),
            },
            SpotError::NoDraft => FfiSpotError::NoDraft,
            other => FfiSpotError::Storage {
                message: other.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiSpotCategory {
    Wait,
    Shortcut,
    Danger,
}

impl From<SpotCategory> for FfiSpotCategory {
    fn from(c: SpotCategory) -> Self {
        match c {
            SpotCategory::Wait => FfiSpotCategory::Wait,
            SpotCategory::Shortcut => FfiSpotCategory::Shortcut,
            SpotCategory::Danger => FfiSpotCategory::Danger,
        }
    }
}

impl From<FfiSpotCategory> for SpotCategory {
    fn from(c: FfiSpotCategory) -> Self {
        match c {
            FfiSpotCategory::Wait => SpotCategory::Wait,
            FfiSpotCategory::Shortcut => SpotCategory::Shortcut,
            FfiSpotCategory::Danger => SpotCategory::Danger,
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiSpot {
    pub id: String,
    pub title: String,
    pub memo: String,
    pub category: FfiSpotCategory,
    pub lat: f64,
    pub lng: f64,
    /// ISO-8601 creation timestamp
    pub created_at: String,
}

impl From<Spot> for FfiSpot {
    fn from(s: Spot) -> Self {
        Self {
            id: s.id,
            title: s.title,
            memo: s.memo,
            category: s.category.into(),
            lat: s.lat,
            lng: s.lng,
            created_at: s.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiSpotDraft {
    pub lat: f64,
    pub lng: f64,
    pub title: String,
    pub memo: String,
    pub category: Option<FfiSpotCategory>,
}

impl From<&SpotDraft> for FfiSpotDraft {
    fn from(d: &SpotDraft) -> Self {
        Self {
            lat: d.lat,
            lng: d.lng,
            title: d.title.clone(),
            memo: d.memo.clone(),
            category: d.category.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiStartupOutcome {
    Loaded { count: u32 },
    AlreadySeeded,
    Seeded { count: u32 },
}

impl From<StartupOutcome> for FfiStartupOutcome {
    fn from(o: StartupOutcome) -> Self {
        match o {
            StartupOutcome::Loaded { count } => FfiStartupOutcome::Loaded {
                count: count as u32,
            },
            StartupOutcome::AlreadySeeded => FfiStartupOutcome::AlreadySeeded,
            StartupOutcome::Seeded { count } => FfiStartupOutcome::Seeded {
                count: count as u32,
            },
        }
    }
}

// ============================================================================
// Handle
// ============================================================================

type Controller = SpotController<SqliteSpotStore, ConfiguredSeed>;

/// One open spot database plus its seed source, owned by the map widget.
///
/// The controller lock is never held across the seed fetch, so `spots()`
/// and the draft calls answer while `startup()` waits on the network.
#[derive(uniffi::Object)]
pub struct SpotMap {
    controller: Mutex<Controller>,
    seed: ConfiguredSeed,
    runtime: tokio::runtime::Runtime,
    map_view: MapViewConfig,
}

impl SpotMap {
    fn from_config(config: SpotMapConfig) -> Result<Arc<Self>, FfiSpotError> {
        init_logging();
        info!("[SpotMap] Opening {}", config.db_path);

        let controller = crate::open_from_config(&config).inspect_err(|e| {
            error!("[SpotMap] Failed to open: {}", e);
        })?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| FfiSpotError::Internal {
                message: format!("Failed to create runtime: {}", e),
            })?;

        let seed = controller.seed_source().clone();
        Ok(Arc::new(Self {
            controller: Mutex::new(controller),
            seed,
            runtime,
            map_view: config.map,
        }))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Controller>, FfiSpotError> {
        self.controller.lock().map_err(|_| FfiSpotError::Internal {
            message: "spot controller lock poisoned".to_string(),
        })
    }
}

#[uniffi::export]
impl SpotMap {
    /// Open with a JSON configuration (see `SpotMapConfig`).
    #[uniffi::constructor]
    pub fn new(config_json: String) -> Result<Arc<Self>, FfiSpotError> {
        Self::from_config(SpotMapConfig::from_json_str(&config_json)?)
    }

    /// Open a database with default settings and the bundled seed.
    #[uniffi::constructor]
    pub fn with_db_path(db_path: String) -> Result<Arc<Self>, FfiSpotError> {
        Self::from_config(SpotMapConfig::with_db_path(db_path))
    }

    /// Load stored spots, seeding on first run. Blocks the calling thread
    /// until the seed fetch completes; other calls on the handle do not wait
    /// for it.
    pub fn startup(&self) -> Result<FfiStartupOutcome, FfiSpotError> {
        let settled = self.lock()?.begin_startup()?;
        let outcome = match settled {
            Some(outcome) => outcome,
            None => {
                let fetched = self.runtime.block_on(self.seed.fetch());
                self.lock()?.complete_seeding(fetched)?
            }
        };
        info!("[SpotMap] Startup: {:?}", outcome);
        Ok(outcome.into())
    }

    pub fn spots(&self) -> Vec<FfiSpot> {
        self.lock()
            .map(|c| c.spots().iter().cloned().map(FfiSpot::from).collect())
            .unwrap_or_default()
    }

    pub fn refresh(&self) -> Result<Vec<FfiSpot>, FfiSpotError> {
        let mut controller = self.lock()?;
        let spots = controller.refresh()?;
        Ok(spots.iter().cloned().map(FfiSpot::from).collect())
    }

    pub fn map_view(&self) -> MapViewConfig {
        self.map_view
    }

    /// Start a draft at a picked map location.
    pub fn pick_location(&self, lat: f64, lng: f64) -> Result<FfiSpotDraft, FfiSpotError> {
        let mut controller = self.lock()?;
        let draft = controller.pick_location(lat, lng);
        Ok(FfiSpotDraft::from(&*draft))
    }

    pub fn current_draft(&self) -> Option<FfiSpotDraft> {
        self.lock()
            .ok()
            .and_then(|c| c.draft().as_draft().map(FfiSpotDraft::from))
    }

    /// Edit the draft. `None` leaves a field unchanged.
    pub fn update_draft(
        &self,
        title: Option<String>,
        memo: Option<String>,
        category: Option<FfiSpotCategory>,
    ) -> Result<FfiSpotDraft, FfiSpotError> {
        let mut controller = self.lock()?;
        let draft = controller.draft_mut().ok_or(FfiSpotError::NoDraft)?;
        if let Some(title) = title {
            draft.title = title;
        }
        if let Some(memo) = memo {
            draft.memo = memo;
        }
        if let Some(category) = category {
            draft.category = Some(category.into());
        }
        Ok(FfiSpotDraft::from(&*draft))
    }

    /// Persist the draft. The draft survives a failed save.
    pub fn save_draft(&self) -> Result<FfiSpot, FfiSpotError> {
        let mut controller = self.lock()?;
        Ok(controller.save_draft()?.into())
    }

    /// Discard the draft. Returns whether there was one.
    pub fn cancel_draft(&self) -> bool {
        self.lock()
            .map(|mut c| c.cancel_draft().is_some())
            .unwrap_or(false)
    }

    pub fn remove_spot(&self, id: String) -> Result<bool, FfiSpotError> {
        let mut controller = self.lock()?;
        Ok(controller.remove_spot(&id)?)
    }

    /// Cached spots as a GeoJSON feature collection.
    pub fn export_geojson(&self) -> String {
        self.lock()
            .map(|c| c.export_geojson())
            .unwrap_or_default()
    }
}
