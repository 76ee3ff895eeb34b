//! SQLite-backed spot store.
//!
//! The connection is opened on first use and migrated to the latest schema.
//! `open` forces that step so a missing or unwritable database surfaces as
//! [`SpotError::Init`] at startup instead of on the first read.

use std::path::{Path, PathBuf};

use log::{debug, info};
use once_cell::unsync::OnceCell;
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::SpotStore;
use crate::error::{Result, SpotError};
use crate::migrations;
use crate::types::{Spot, SpotCategory};

const SEEDED_KEY: &str = "seeded";

const UPSERT_SPOT: &str = "INSERT OR REPLACE INTO spots (id, title, memo, category, lat, lng, created_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

const SELECT_SPOT: &str = "SELECT id, title, memo, category, lat, lng, created_at FROM spots";

/// Spot store persisted in a SQLite database file.
pub struct SqliteSpotStore {
    /// `None` for an in-memory database
    db_path: Option<PathBuf>,
    conn: OnceCell<Connection>,
}

impl SqliteSpotStore {
    /// Create a handle for the database at `db_path`. Nothing is opened yet.
    pub fn new(db_path: impl AsRef<Path>) -> Self {
        Self {
            db_path: Some(db_path.as_ref().to_path_buf()),
            conn: OnceCell::new(),
        }
    }

    /// Create a handle for a private in-memory database (for testing).
    pub fn in_memory() -> Self {
        Self {
            db_path: None,
            conn: OnceCell::new(),
        }
    }

    /// Create a handle and open the database immediately.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let store = Self::new(db_path);
        store.connection()?;
        Ok(store)
    }

    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.conn.get().is_some()
    }

    fn connection(&self) -> Result<&Connection> {
        self.conn.get_or_try_init(|| self.open_connection())
    }

    fn open_connection(&self) -> Result<Connection> {
        let opened = match &self.db_path {
            Some(path) => Connection::open(path),
            None => Connection::open_in_memory(),
        };

        let mut conn = opened.map_err(|e| SpotError::Init {
            message: format!("Failed to open {}: {}", self.describe(), e),
        })?;

        migrations::run(&mut conn).map_err(|e| SpotError::Init {
            message: format!("Failed to prepare {}: {}", self.describe(), e),
        })?;

        info!("[SpotStore] Opened {}", self.describe());
        Ok(conn)
    }

    fn describe(&self) -> String {
        match &self.db_path {
            Some(path) => path.display().to_string(),
            None => ":memory:".to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn raw_connection(&self) -> &Connection {
        self.connection().expect("test database should open")
    }
}

fn spot_from_row(row: &Row<'_>) -> rusqlite::Result<Spot> {
    let category: String = row.get(3)?;
    Ok(Spot {
        id: row.get(0)?,
        title: row.get(1)?,
        memo: row.get(2)?,
        category: SpotCategory::parse_or_default(Some(&category)),
        lat: row.get(4)?,
        lng: row.get(5)?,
        created_at: row.get(6)?,
    })
}

impl SpotStore for SqliteSpotStore {
    fn get_all(&self) -> Result<Vec<Spot>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare_cached(&format!("{SELECT_SPOT} ORDER BY created_at, id"))?;
        let spots = stmt
            .query_map([], spot_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(spots)
    }

    fn get(&self, id: &str) -> Result<Option<Spot>> {
        let conn = self.connection()?;
        let spot = conn
            .query_row(&format!("{SELECT_SPOT} WHERE id = ?1"), params![id], spot_from_row)
            .optional()?;
        Ok(spot)
    }

    fn count(&self) -> Result<usize> {
        let conn = self.connection()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM spots", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn put(&mut self, spot: &Spot) -> Result<()> {
        let conn = self.connection()?;
        conn.execute(
            UPSERT_SPOT,
            params![
                spot.id,
                spot.title,
                spot.memo,
                spot.category.as_str(),
                spot.lat,
                spot.lng,
                spot.created_at,
            ],
        )?;
        debug!("[SpotStore] Stored spot {}", spot.id);
        Ok(())
    }

    fn put_bulk(&mut self, spots: &[Spot]) -> Result<()> {
        let conn = self.connection()?;
        // Dropping the transaction without commit rolls the whole batch back
        let tx = conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(UPSERT_SPOT)?;
            for spot in spots {
                stmt.execute(params![
                    spot.id,
                    spot.title,
                    spot.memo,
                    spot.category.as_str(),
                    spot.lat,
                    spot.lng,
                    spot.created_at,
                ])?;
            }
        }
        tx.commit()?;

        info!("[SpotStore] Stored {} spots in one batch", spots.len());
        Ok(())
    }

    fn remove(&mut self, id: &str) -> Result<bool> {
        let conn = self.connection()?;
        let deleted = conn.execute("DELETE FROM spots WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    fn clear(&mut self) -> Result<()> {
        let conn = self.connection()?;
        let deleted = conn.execute("DELETE FROM spots", [])?;
        info!("[SpotStore] Cleared {} spots", deleted);
        Ok(())
    }

    fn is_seeded(&self) -> Result<bool> {
        let conn = self.connection()?;
        let value: Option<i64> = conn
            .query_row(
                "SELECT value FROM meta WHERE key = ?1",
                params![SEEDED_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.unwrap_or(0) != 0)
    }

    fn set_seeded(&mut self, value: bool) -> Result<()> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES (?1, ?2)",
            params![SEEDED_KEY, value as i64],
        )?;
        info!("[SpotStore] Seed flag set to {}", value);
        Ok(())
    }
}
