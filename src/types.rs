//! Core spot types shared by the store, the seed importer and the controller.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Title given to spots added from a draft without one.
pub const DEFAULT_DRAFT_TITLE: &str = "New spot";

/// Spot category. Unknown or missing values fall back to [`SpotCategory::Wait`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotCategory {
    /// Somewhere to wait between jobs
    #[default]
    Wait,
    /// A back road or cut-through
    Shortcut,
    /// A place that needs care
    Danger,
}

impl SpotCategory {
    pub const ALL: [SpotCategory; 3] = [
        SpotCategory::Wait,
        SpotCategory::Shortcut,
        SpotCategory::Danger,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpotCategory::Wait => "wait",
            SpotCategory::Shortcut => "shortcut",
            SpotCategory::Danger => "danger",
        }
    }

    /// Parse a category, defaulting to `Wait` for absent or unrecognized input.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for SpotCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown spot category '{}'", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for SpotCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "wait" => Ok(SpotCategory::Wait),
            "shortcut" => Ok(SpotCategory::Shortcut),
            "danger" => Ok(SpotCategory::Danger),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// A point annotation on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    /// Unique, immutable identifier
    pub id: String,
    pub title: String,
    pub memo: String,
    pub category: SpotCategory,
    pub lat: f64,
    pub lng: f64,
    /// ISO-8601 creation timestamp
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl Spot {
    /// Build a fresh spot from user input, assigning a new id and the current time.
    pub fn from_new(new: NewSpot) -> Self {
        let title = if new.title.trim().is_empty() {
            DEFAULT_DRAFT_TITLE.to_string()
        } else {
            new.title
        };

        Self {
            id: new_spot_id(),
            title,
            memo: new.memo,
            category: new.category.unwrap_or_default(),
            lat: new.lat,
            lng: new.lng,
            created_at: current_timestamp_iso(),
        }
    }
}

/// User-entered fields for a spot that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewSpot {
    pub title: String,
    pub memo: String,
    pub category: Option<SpotCategory>,
    pub lat: f64,
    pub lng: f64,
}

impl NewSpot {
    pub fn at(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            ..Default::default()
        }
    }
}

/// Generate an opaque spot identifier.
pub fn new_spot_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current UTC time as an RFC 3339 string with millisecond precision.
pub fn current_timestamp_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Normalize an RFC 3339 timestamp to UTC. Returns `None` if it does not parse.
pub fn normalize_timestamp(value: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true))
}
