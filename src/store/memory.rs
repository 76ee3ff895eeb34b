use std::collections::HashMap;

use super::{SpotStore, sort_by_created};
use crate::error::Result;
use crate::types::Spot;

/// In-memory store. Nothing survives the handle; used for tests and previews.
#[derive(Debug, Clone, Default)]
pub struct MemorySpotStore {
    spots: HashMap<String, Spot>,
    seeded: bool,
}

impl MemorySpotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing spots, e.g. to simulate a store with prior data.
    pub fn with_spots(spots: impl IntoIterator<Item = Spot>) -> Self {
        Self {
            spots: spots.into_iter().map(|s| (s.id.clone(), s)).collect(),
            seeded: false,
        }
    }
}

impl SpotStore for MemorySpotStore {
    fn get_all(&self) -> Result<Vec<Spot>> {
        let mut spots: Vec<Spot> = self.spots.values().cloned().collect();
        sort_by_created(&mut spots);
        Ok(spots)
    }

    fn get(&self, id: &str) -> Result<Option<Spot>> {
        Ok(self.spots.get(id).cloned())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.spots.len())
    }

    fn put(&mut self, spot: &Spot) -> Result<()> {
        self.spots.insert(spot.id.clone(), spot.clone());
        Ok(())
    }

    fn put_bulk(&mut self, spots: &[Spot]) -> Result<()> {
        // Build on a copy and swap so a panic mid-batch leaves the old map
        let mut next = self.spots.clone();
        for spot in spots {
            next.insert(spot.id.clone(), spot.clone());
        }
        self.spots = next;
        Ok(())
    }

    fn remove(&mut self, id: &str) -> Result<bool> {
        Ok(self.spots.remove(id).is_some())
    }

    fn clear(&mut self) -> Result<()> {
        self.spots.clear();
        Ok(())
    }

    fn is_seeded(&self) -> Result<bool> {
        Ok(self.seeded)
    }

    fn set_seeded(&mut self, value: bool) -> Result<()> {
        self.seeded = value;
        Ok(())
    }
}
