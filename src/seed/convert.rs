//! GeoJSON <-> Spot conversion.
//!
//! Parsing is validating but never fails: a document that is not a feature
//! collection becomes [`SeedDocument::Invalid`], and individual features that
//! do not decode are dropped without affecting the rest of the batch.

use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, JsonValue, Value};
use log::{debug, warn};

use crate::types::{Spot, SpotCategory, current_timestamp_iso, new_spot_id, normalize_timestamp};

/// Outcome of parsing a seed file.
#[derive(Debug, Clone)]
pub enum SeedDocument {
    /// A feature collection. `skipped` counts entries that were not valid features.
    Valid {
        features: Vec<Feature>,
        skipped: usize,
    },
    /// Anything else. Seeding treats this as zero records.
    Invalid { reason: String },
}

impl SeedDocument {
    pub fn is_valid(&self) -> bool {
        matches!(self, SeedDocument::Valid { .. })
    }

    /// Convert to spots; an invalid document yields none.
    pub fn into_spots(self) -> Vec<Spot> {
        match self {
            SeedDocument::Valid { features, .. } => features_to_spots(&features),
            SeedDocument::Invalid { .. } => Vec::new(),
        }
    }
}

/// Parse seed text into a feature collection.
pub fn parse_seed(text: &str) -> SeedDocument {
    let root: JsonValue = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            return SeedDocument::Invalid {
                reason: format!("not JSON: {}", e),
            };
        }
    };

    if root.get("type").and_then(JsonValue::as_str) != Some("FeatureCollection") {
        return SeedDocument::Invalid {
            reason: "not a FeatureCollection".to_string(),
        };
    }

    let Some(entries) = root.get("features").and_then(JsonValue::as_array) else {
        return SeedDocument::Invalid {
            reason: "missing features array".to_string(),
        };
    };

    let mut features = Vec::with_capacity(entries.len());
    let mut skipped = 0;
    for (index, entry) in entries.iter().enumerate() {
        match Feature::from_json_value(entry.clone()) {
            Ok(feature) => features.push(feature),
            Err(e) => {
                debug!("[Seed] Skipping feature {}: {}", index, e);
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!("[Seed] Skipped {} malformed features", skipped);
    }

    SeedDocument::Valid { features, skipped }
}

/// Parse seed text and convert it to spots in one step.
pub fn geojson_to_spots(text: &str) -> Vec<Spot> {
    match parse_seed(text) {
        SeedDocument::Invalid { reason } => {
            warn!("[Seed] Invalid seed document: {}", reason);
            Vec::new()
        }
        document => document.into_spots(),
    }
}

/// Convert point features to spots. Non-point geometries are dropped.
///
/// Each spot gets a fresh id. Placeholder titles are numbered by position
/// among the surviving point features, starting at 1.
pub fn features_to_spots(features: &[Feature]) -> Vec<Spot> {
    features
        .iter()
        .filter_map(point_coordinates)
        .enumerate()
        .map(|(index, (feature, lng, lat))| feature_to_spot(feature, index, lat, lng))
        .collect()
}

/// `(feature, lng, lat)` for point features with at least two coordinates.
fn point_coordinates(feature: &Feature) -> Option<(&Feature, f64, f64)> {
    match &feature.geometry.as_ref()?.value {
        Value::Point(position) if position.len() >= 2 => Some((feature, position[0], position[1])),
        _ => None,
    }
}

fn feature_to_spot(feature: &Feature, index: usize, lat: f64, lng: f64) -> Spot {
    let props = feature.properties.as_ref();

    let title = property_string(props, "title").unwrap_or_else(|| format!("Spot {}", index + 1));
    let memo = property_string(props, "memo").unwrap_or_default();
    let category = SpotCategory::parse_or_default(property_string(props, "category").as_deref());
    let created_at = property_string(props, "createdAt")
        .and_then(|raw| normalize_timestamp(&raw))
        .unwrap_or_else(current_timestamp_iso);

    Spot {
        id: new_spot_id(),
        title,
        memo,
        category,
        lat,
        lng,
        created_at,
    }
}

/// Read a property as text. Null or missing is `None`; non-string values are
/// rendered as JSON.
fn property_string(props: Option<&JsonObject>, key: &str) -> Option<String> {
    match props?.get(key)? {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Render spots as a GeoJSON feature collection of points.
pub fn spots_to_feature_collection(spots: &[Spot]) -> FeatureCollection {
    let features = spots
        .iter()
        .map(|spot| {
            let mut properties = JsonObject::new();
            properties.insert("title".to_string(), JsonValue::from(spot.title.clone()));
            properties.insert("memo".to_string(), JsonValue::from(spot.memo.clone()));
            properties.insert("category".to_string(), JsonValue::from(spot.category.as_str()));
            properties.insert("createdAt".to_string(), JsonValue::from(spot.created_at.clone()));

            Feature {
                bbox: None,
                // GeoJSON positions are [lng, lat]
                geometry: Some(Geometry::new(Value::Point(vec![spot.lng, spot.lat]))),
                id: Some(Id::String(spot.id.clone())),
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Serialize spots as a GeoJSON document.
pub fn spots_to_geojson_string(spots: &[Spot]) -> String {
    GeoJson::FeatureCollection(spots_to_feature_collection(spots)).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_POINTS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"title": "Station", "category": "shortcut", "memo": "quiet"},
                "geometry": {"type": "Point", "coordinates": [132.743, 34.426]}
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": {"type": "Point", "coordinates": [132.75, 34.43]}
            }
        ]
    }"#;

    #[test]
    fn test_points_convert_with_defaults() {
        let spots = geojson_to_spots(TWO_POINTS);
        assert_eq!(spots.len(), 2);

        assert_eq!(spots[0].title, "Station");
        assert_eq!(spots[0].category, SpotCategory::Shortcut);
        assert_eq!(spots[0].memo, "quiet");
        assert_eq!(spots[0].lat, 34.426);
        assert_eq!(spots[0].lng, 132.743);

        assert_eq!(spots[1].title, "Spot 2");
        assert_eq!(spots[1].category, SpotCategory::Wait);
        assert_eq!(spots[1].memo, "");
        assert_ne!(spots[0].id, spots[1].id);
    }

    #[test]
    fn test_non_point_features_are_dropped() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": null,
                 "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}},
                {"type": "Feature", "properties": null,
                 "geometry": {"type": "Point", "coordinates": [10.5, 20.25]}}
            ]
        }"#;
        let spots = geojson_to_spots(text);
        assert_eq!(spots.len(), 1);
        assert_eq!(spots[0].lat, 20.25);
        assert_eq!(spots[0].lng, 10.5);
        // Placeholder numbering counts surviving points only
        assert_eq!(spots[0].title, "Spot 1");
    }

    #[test]
    fn test_feature_without_geometry_is_dropped() {
        let text = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"title": "nowhere"}, "geometry": null}
        ]}"#;
        assert!(geojson_to_spots(text).is_empty());
    }

    #[test]
    fn test_malformed_feature_does_not_abort_batch() {
        let text = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "geometry": {"type": "Point"}},
            {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [1, 2]}}
        ]}"#;
        match parse_seed(text) {
            SeedDocument::Valid { features, skipped } => {
                assert_eq!(features.len(), 1);
                assert_eq!(skipped, 1);
            }
            SeedDocument::Invalid { reason } => panic!("unexpected invalid: {reason}"),
        }
    }

    #[test]
    fn test_invalid_documents_yield_nothing() {
        assert!(!parse_seed("not json").is_valid());
        assert!(!parse_seed(r#"{"type": "Feature"}"#).is_valid());
        assert!(!parse_seed(r#"{"type": "FeatureCollection"}"#).is_valid());
        assert!(geojson_to_spots("[1, 2, 3]").is_empty());
    }

    #[test]
    fn test_unknown_category_defaults_to_wait() {
        let text = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"category": "parking"},
             "geometry": {"type": "Point", "coordinates": [0, 0]}}
        ]}"#;
        assert_eq!(geojson_to_spots(text)[0].category, SpotCategory::Wait);
    }

    #[test]
    fn test_created_at_taken_from_seed() {
        let text = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"createdAt": "2024-03-01T12:00:00Z"},
             "geometry": {"type": "Point", "coordinates": [0, 0]}},
            {"type": "Feature", "properties": {"createdAt": "last week"},
             "geometry": {"type": "Point", "coordinates": [0, 0]}}
        ]}"#;
        let spots = geojson_to_spots(text);
        assert_eq!(spots[0].created_at, "2024-03-01T12:00:00.000Z");
        assert!(normalize_timestamp(&spots[1].created_at).is_some());
        assert_ne!(spots[1].created_at, "last week");
    }

    #[test]
    fn test_export_preserves_coordinates_and_fields() {
        let spots = geojson_to_spots(TWO_POINTS);
        let exported = spots_to_geojson_string(&spots);
        let back = geojson_to_spots(&exported);

        assert_eq!(back.len(), spots.len());
        for (original, reparsed) in spots.iter().zip(&back) {
            assert_eq!(original.lat, reparsed.lat);
            assert_eq!(original.lng, reparsed.lng);
            assert_eq!(original.title, reparsed.title);
            assert_eq!(original.category, reparsed.category);
            assert_eq!(original.created_at, reparsed.created_at);
        }
    }

    #[test]
    fn test_non_string_title_is_rendered() {
        let text = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"title": 42},
             "geometry": {"type": "Point", "coordinates": [0, 0]}}
        ]}"#;
        assert_eq!(geojson_to_spots(text)[0].title, "42");
    }
}
