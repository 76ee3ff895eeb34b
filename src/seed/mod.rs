//! One-time seed import.
//!
//! - [`convert`]: validating GeoJSON parse, feature -> spot mapping and export
//! - [`source`]: bundled, file and HTTP seed sources

pub mod convert;
pub mod source;

pub use convert::{
    SeedDocument, features_to_spots, geojson_to_spots, parse_seed, spots_to_feature_collection,
    spots_to_geojson_string,
};
#[cfg(feature = "http")]
pub use source::HttpSeed;
pub use source::{BUNDLED_SEED, BundledSeed, ConfiguredSeed, FileSeed, SeedSource, StaticSeed};
