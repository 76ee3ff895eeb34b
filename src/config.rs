//! Configuration for the spot store, the seed source and the map view.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpotError};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotMapConfig {
    /// SQLite database file. Default: "spotmap.db"
    pub db_path: String,

    /// Where the one-time seed comes from. Default: the bundled file
    pub seed: SeedConfig,

    /// Initial view handed to the map widget
    pub map: MapViewConfig,
}

impl Default for SpotMapConfig {
    fn default() -> Self {
        Self {
            db_path: "spotmap.db".to_string(),
            seed: SeedConfig::default(),
            map: MapViewConfig::default(),
        }
    }
}

impl SpotMapConfig {
    /// Default configuration with a specific database path.
    pub fn with_db_path(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            ..Default::default()
        }
    }

    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.db_path.trim().is_empty() {
            return Err(SpotError::Config {
                message: "db_path must not be empty".to_string(),
            });
        }

        match &self.seed {
            SeedConfig::File { path } if path.as_os_str().is_empty() => Err(SpotError::Config {
                message: "seed file path must not be empty".to_string(),
            }),
            SeedConfig::Http { url, .. } if url.trim().is_empty() => Err(SpotError::Config {
                message: "seed url must not be empty".to_string(),
            }),
            _ => self.map.validate(),
        }
    }
}

/// Seed source selection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SeedConfig {
    /// The GeoJSON file compiled into the crate
    #[default]
    Bundled,
    /// A GeoJSON file on disk
    File { path: std::path::PathBuf },
    /// A GeoJSON file served over HTTP. No timeout unless `timeout_secs` is set.
    Http {
        url: String,
        #[serde(default)]
        timeout_secs: Option<u64>,
    },
}

/// Initial map view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[serde(default)]
pub struct MapViewConfig {
    /// Default: 34.426 (Higashi-Hiroshima)
    pub center_lat: f64,
    /// Default: 132.743
    pub center_lng: f64,
    /// Default: 12
    pub zoom: u8,
}

impl Default for MapViewConfig {
    fn default() -> Self {
        Self {
            center_lat: 34.426,
            center_lng: 132.743,
            zoom: 12,
        }
    }
}

impl MapViewConfig {
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.center_lat) || !(-180.0..=180.0).contains(&self.center_lng)
        {
            return Err(SpotError::Config {
                message: format!(
                    "map center ({}, {}) is out of range",
                    self.center_lat, self.center_lng
                ),
            });
        }
        if self.zoom > 22 {
            return Err(SpotError::Config {
                message: format!("zoom {} is out of range", self.zoom),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SpotMapConfig::default();
        assert_eq!(config.seed, SeedConfig::Bundled);
        assert_eq!(config.map.zoom, 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = SpotMapConfig::from_json_str(
            r#"{"db_path": "/tmp/x.db", "seed": {"kind": "http", "url": "https://example.com/spots.geojson"}}"#,
        )
        .unwrap();
        assert_eq!(config.db_path, "/tmp/x.db");
        assert_eq!(
            config.seed,
            SeedConfig::Http {
                url: "https://example.com/spots.geojson".to_string(),
                timeout_secs: None,
            }
        );
        assert_eq!(config.map, MapViewConfig::default());
    }

    #[test]
    fn test_rejects_empty_db_path() {
        let result = SpotMapConfig::from_json_str(r#"{"db_path": "  "}"#);
        assert!(matches!(result, Err(SpotError::Config { .. })));
    }

    #[test]
    fn test_rejects_bad_center() {
        let mut config = SpotMapConfig::default();
        config.map.center_lat = 120.0;
        assert!(config.validate().is_err());
    }
}
