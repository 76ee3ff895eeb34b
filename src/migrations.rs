//! Schema migrations for the spot database.
//!
//! Applied in order on every open; `rusqlite_migration` tracks progress in
//! `PRAGMA user_version`, so already-applied steps are skipped.

use log::info;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use rusqlite_migration::{M, Migrations};

use crate::error::{Result, SpotError};

static MIGRATIONS: Lazy<Migrations<'static>> = Lazy::new(|| {
    Migrations::new(vec![
        // v1: spots keyed by id with a created_at access path, plus the meta table
        M::up(
            r#"
            CREATE TABLE spots (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                memo TEXT NOT NULL DEFAULT '',
                category TEXT NOT NULL DEFAULT 'wait'
                    CHECK(category IN ('wait', 'shortcut', 'danger')),
                lat REAL NOT NULL,
                lng REAL NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX idx_spots_created_at ON spots(created_at);

            CREATE TABLE meta (
                key TEXT PRIMARY KEY,
                value INTEGER NOT NULL
            );
            "#,
        ),
        // v2: category filter for map layers
        M::up("CREATE INDEX IF NOT EXISTS idx_spots_category ON spots(category);"),
    ])
});

/// Bring the schema up to date.
pub fn run(conn: &mut Connection) -> Result<()> {
    let before = MIGRATIONS
        .current_version(conn)
        .map_err(|e| SpotError::Migration {
            message: e.to_string(),
        })?;

    MIGRATIONS
        .to_latest(conn)
        .map_err(|e| SpotError::Migration {
            message: e.to_string(),
        })?;

    let after = MIGRATIONS
        .current_version(conn)
        .map_err(|e| SpotError::Migration {
            message: e.to_string(),
        })?;

    if before != after {
        info!("[SpotStore] Migrated schema {:?} -> {:?}", before, after);
    }

    Ok(())
}
