//! Local spot store.
//!
//! The store exclusively owns persisted spots and the seed flag. Callers hold
//! an explicit handle; there is no process-wide instance.

use crate::error::Result;
use crate::types::Spot;

mod memory;
pub use memory::MemorySpotStore;

#[cfg(feature = "persistence")]
mod sqlite;
#[cfg(feature = "persistence")]
pub use sqlite::SqliteSpotStore;

/// Key-value persistence for spots and the one-time seed flag.
///
/// Writes take `&mut self`: the controller issues one operation at a time and
/// awaits it before the next.
pub trait SpotStore {
    /// Every stored spot, ordered by creation time. Empty if nothing is stored.
    fn get_all(&self) -> Result<Vec<Spot>>;

    /// Look up one spot by id.
    fn get(&self, id: &str) -> Result<Option<Spot>>;

    /// Number of stored spots.
    fn count(&self) -> Result<usize> {
        Ok(self.get_all()?.len())
    }

    /// Insert or overwrite a spot keyed by its id.
    fn put(&mut self, spot: &Spot) -> Result<()>;

    /// Insert or overwrite many spots as one unit of work.
    ///
    /// Either every record is visible afterwards or none is.
    fn put_bulk(&mut self, spots: &[Spot]) -> Result<()>;

    /// Delete a spot. Returns whether it existed.
    fn remove(&mut self, id: &str) -> Result<bool>;

    /// Delete every spot. The seed flag is left as is.
    fn clear(&mut self) -> Result<()>;

    /// Whether the one-time seed import has run. False if never set.
    fn is_seeded(&self) -> Result<bool>;

    fn set_seeded(&mut self, value: bool) -> Result<()>;
}

/// Order spots the way the stores list them: creation time, then id.
pub(crate) fn sort_by_created(spots: &mut [Spot]) {
    spots.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}
