//! Unified error handling for spotmap.
//!
//! Storage failures are fatal to the caller. Seed failures are reported with
//! their own variants so the controller can downgrade them to "zero seed
//! records" instead of aborting startup.

use thiserror::Error;

/// Unified error type for spotmap operations.
#[derive(Debug, Error)]
pub enum SpotError {
    /// Storage engine could not be opened or initialized
    #[error("Storage initialization failed: {message}")]
    Init { message: String },

    /// A statement against the spot database failed
    #[cfg(feature = "persistence")]
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Schema migration failed
    #[error("Migration failed: {message}")]
    Migration { message: String },

    /// The seed file could not be fetched
    #[error("Seed fetch failed: {message}")]
    SeedFetch { message: String },

    /// The seed file is not a usable feature collection
    #[error("Seed parse failed: {message}")]
    SeedParse { message: String },

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A draft operation was requested while no draft is being edited
    #[error("No draft is being edited")]
    NoDraft,

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl SpotError {
    /// Seed errors never abort startup; the controller imports nothing
    /// instead.
    pub fn is_seed_error(&self) -> bool {
        matches!(self, SpotError::SeedFetch { .. } | SpotError::SeedParse { .. })
    }
}

/// Result type alias for spotmap operations.
pub type Result<T> = std::result::Result<T, SpotError>;
