//! # Seed/Sync Controller
//!
//! Reconciles the local store with the seed file exactly once and mediates
//! every state change the UI can see.
//!
//! The controller keeps a derived copy of the stored spots for rendering.
//! That copy is a cache: it is repopulated from the store after every
//! mutating call, so it cannot show a spot the store does not hold. The one
//! exception is a committed add whose re-read fails; the new spot is then
//! appended so the UI still shows what was saved.

use log::{info, warn};

use crate::draft::{DraftState, SpotDraft};
use crate::error::{Result, SpotError};
use crate::seed::{SeedDocument, SeedSource, parse_seed, spots_to_geojson_string};
use crate::store::SpotStore;
use crate::types::{NewSpot, Spot};

/// What `startup` found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupOutcome {
    /// The store already held spots; the seed was not consulted.
    Loaded { count: usize },
    /// The store was empty but seeding had already run; nothing was imported.
    AlreadySeeded,
    /// The seed was imported. `count` is what the store holds afterwards.
    Seeded { count: usize },
}

/// Owns the store handle, the seed source, the UI cache and the draft.
pub struct SpotController<S, F> {
    store: S,
    seed: F,
    spots: Vec<Spot>,
    draft: DraftState,
}

impl<S: SpotStore, F: SeedSource> SpotController<S, F> {
    pub fn new(store: S, seed: F) -> Self {
        Self {
            store,
            seed,
            spots: Vec::new(),
            draft: DraftState::default(),
        }
    }

    // ========================================================================
    // Startup
    // ========================================================================

    /// Load spots, seeding the store on first run.
    ///
    /// Storage failures are returned. Seed fetch or parse failures are not:
    /// they count as an empty seed and the flag is still set, so a broken
    /// seed file is never retried. Any other error from the seed source is
    /// returned and the flag stays unset.
    pub async fn startup(&mut self) -> Result<StartupOutcome> {
        if let Some(outcome) = self.begin_startup()? {
            return Ok(outcome);
        }
        let fetched = self.seed.fetch().await;
        self.import_seed(fetched)
    }

    /// First half of [`startup`](Self::startup): everything up to the seed
    /// fetch. Returns the outcome when no seeding is needed, `None` when the
    /// caller must fetch the seed and pass it to
    /// [`complete_seeding`](Self::complete_seeding).
    pub fn begin_startup(&mut self) -> Result<Option<StartupOutcome>> {
        let saved = self.store.get_all()?;
        if !saved.is_empty() {
            info!("[SpotController] Loaded {} stored spots", saved.len());
            let count = saved.len();
            self.spots = saved;
            return Ok(Some(StartupOutcome::Loaded { count }));
        }

        if self.store.is_seeded()? {
            info!("[SpotController] Store is empty and already seeded, not re-seeding");
            self.spots = saved;
            return Ok(Some(StartupOutcome::AlreadySeeded));
        }

        Ok(None)
    }

    /// Second half of [`startup`](Self::startup), given the result of a seed
    /// fetch made elsewhere.
    ///
    /// The store is checked again first, so a seed fetched by a caller that
    /// lost a race with another startup is dropped instead of imported twice.
    pub fn complete_seeding(&mut self, fetched: Result<String>) -> Result<StartupOutcome> {
        if let Some(outcome) = self.begin_startup()? {
            info!("[SpotController] Seeding already settled, dropping fetched seed");
            return Ok(outcome);
        }
        self.import_seed(fetched)
    }

    fn import_seed(&mut self, fetched: Result<String>) -> Result<StartupOutcome> {
        let initial = seed_spots(fetched)?;
        self.store.put_bulk(&initial)?;
        self.store.set_seeded(true)?;

        // Re-read so the cache reflects what the store actually kept
        self.refresh()?;
        info!(
            "[SpotController] Seeded {} spots from {}",
            self.spots.len(),
            self.seed.describe()
        );
        Ok(StartupOutcome::Seeded {
            count: self.spots.len(),
        })
    }

    // ========================================================================
    // Cache
    // ========================================================================

    /// Spots as of the last store read.
    pub fn spots(&self) -> &[Spot] {
        &self.spots
    }

    /// Repopulate the cache from the store.
    pub fn refresh(&mut self) -> Result<&[Spot]> {
        self.spots = self.store.get_all()?;
        Ok(&self.spots)
    }

    // ========================================================================
    // Mutations (write through, then refresh)
    // ========================================================================

    /// Store a new spot and refresh the cache.
    ///
    /// If the write fails the error is returned and the cache is untouched.
    /// Once the write is committed the add succeeds: a failed re-read is
    /// logged and the spot is appended to the cache instead.
    pub fn add_spot(&mut self, new: NewSpot) -> Result<Spot> {
        let spot = Spot::from_new(new);
        self.store.put(&spot)?;
        info!("[SpotController] Added spot {} ({})", spot.id, spot.category);

        if let Err(e) = self.refresh().map(|_| ()) {
            warn!("[SpotController] Re-read after adding {} failed: {}", spot.id, e);
            self.spots.retain(|s| s.id != spot.id);
            self.spots.push(spot.clone());
        }
        Ok(spot)
    }

    /// Delete a spot. Returns whether it existed.
    pub fn remove_spot(&mut self, id: &str) -> Result<bool> {
        let removed = self.store.remove(id)?;
        self.refresh()?;
        Ok(removed)
    }

    /// Delete every spot. The seed flag stays set, so the next startup does
    /// not re-import the seed.
    pub fn clear_spots(&mut self) -> Result<()> {
        self.store.clear()?;
        self.refresh()?;
        Ok(())
    }

    /// The cached spots as a GeoJSON feature collection.
    pub fn export_geojson(&self) -> String {
        spots_to_geojson_string(&self.spots)
    }

    // ========================================================================
    // Draft
    // ========================================================================

    pub fn draft(&self) -> &DraftState {
        &self.draft
    }

    /// Start editing a draft at a picked map location.
    pub fn pick_location(&mut self, lat: f64, lng: f64) -> &mut SpotDraft {
        self.draft.begin(lat, lng)
    }

    pub fn draft_mut(&mut self) -> Option<&mut SpotDraft> {
        self.draft.as_draft_mut()
    }

    /// Persist the draft. On success the draft is cleared; on failure it is
    /// kept for another attempt and the error is returned.
    pub fn save_draft(&mut self) -> Result<Spot> {
        let new = self
            .draft
            .as_draft()
            .map(SpotDraft::to_new_spot)
            .ok_or(SpotError::NoDraft)?;

        let spot = self.add_spot(new)?;
        self.draft.take();
        Ok(spot)
    }

    /// Discard the draft without touching the store.
    pub fn cancel_draft(&mut self) -> Option<SpotDraft> {
        self.draft.take()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn seed_source(&self) -> &F {
        &self.seed
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

/// Turn a seed fetch into the spots to import.
///
/// Seed errors and rejected documents become an empty list. Anything else
/// is returned.
fn seed_spots(fetched: Result<String>) -> Result<Vec<Spot>> {
    let text = match fetched {
        Ok(text) => text,
        Err(e) if e.is_seed_error() => {
            warn!("[SpotController] Seed unavailable, importing nothing: {}", e);
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    match parse_seed(&text) {
        SeedDocument::Invalid { reason } => {
            warn!("[SpotController] Seed rejected, importing nothing: {}", reason);
            Ok(Vec::new())
        }
        document => Ok(document.into_spots()),
    }
}
