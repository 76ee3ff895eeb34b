//! Startup and seeding scenarios against an on-disk SQLite store.
//!
//! Each "restart" opens a fresh store handle on the same database file, the
//! way the app does on every launch.

use std::cell::Cell;
use std::path::{Path, PathBuf};

use spotmap::{
    FileSeed, NewSpot, SeedSource, SpotCategory, SpotController, SpotError, SpotMapConfig,
    SpotStore, SqliteSpotStore, StartupOutcome, StaticSeed,
};
use tempfile::TempDir;

const TWO_POINTS: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {"type": "Feature", "properties": {"title": "North exit", "category": "wait"},
         "geometry": {"type": "Point", "coordinates": [132.7431, 34.4263]}},
        {"type": "Feature", "properties": {"category": "danger", "memo": "blind corner"},
         "geometry": {"type": "Point", "coordinates": [132.7518, 34.4312]}}
    ]
}"#;

const POINT_AND_LINE: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {"type": "Feature", "properties": {"title": "Point"},
         "geometry": {"type": "Point", "coordinates": [132.7, 34.4]}},
        {"type": "Feature", "properties": {"title": "Line"},
         "geometry": {"type": "LineString", "coordinates": [[132.7, 34.4], [132.8, 34.5]]}}
    ]
}"#;

/// Seed source that counts fetches.
struct TrackedSeed {
    text: String,
    fetches: Cell<usize>,
}

impl TrackedSeed {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            fetches: Cell::new(0),
        }
    }
}

impl SeedSource for TrackedSeed {
    async fn fetch(&self) -> spotmap::Result<String> {
        self.fetches.set(self.fetches.get() + 1);
        Ok(self.text.clone())
    }

    fn describe(&self) -> String {
        "tracked".to_string()
    }
}

fn temp_db() -> (TempDir, PathBuf) {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = dir.path().join("spots.db");
    (dir, path)
}

fn open(path: &Path) -> SqliteSpotStore {
    SqliteSpotStore::open(path).expect("failed to open store")
}

#[tokio::test]
async fn test_empty_store_seeds_two_points() {
    let (_dir, path) = temp_db();
    let mut controller = SpotController::new(open(&path), TrackedSeed::new(TWO_POINTS));

    let outcome = controller.startup().await.unwrap();
    assert_eq!(outcome, StartupOutcome::Seeded { count: 2 });

    let store = controller.into_store();
    assert_eq!(store.get_all().unwrap().len(), 2);
    assert!(store.is_seeded().unwrap());
}

#[tokio::test]
async fn test_seeded_defaults_and_coordinates() {
    let (_dir, path) = temp_db();
    let mut controller = SpotController::new(open(&path), StaticSeed(TWO_POINTS.to_string()));
    controller.startup().await.unwrap();

    let spots = controller.spots();
    let titled = spots.iter().find(|s| s.title == "North exit").unwrap();
    assert_eq!(titled.lat, 34.4263);
    assert_eq!(titled.lng, 132.7431);

    let untitled = spots.iter().find(|s| s.memo == "blind corner").unwrap();
    assert_eq!(untitled.title, "Spot 2");
    assert_eq!(untitled.category, SpotCategory::Danger);
}

#[tokio::test]
async fn test_seeding_runs_once_across_restarts() {
    let (_dir, path) = temp_db();

    {
        let mut first = SpotController::new(open(&path), TrackedSeed::new(TWO_POINTS));
        first.startup().await.unwrap();
        assert_eq!(first.seed_source().fetches.get(), 1);
        first.clear_spots().unwrap();
    }

    // Empty store, flag set: no fetch, nothing imported
    let mut second = SpotController::new(open(&path), TrackedSeed::new(TWO_POINTS));
    let outcome = second.startup().await.unwrap();
    assert_eq!(outcome, StartupOutcome::AlreadySeeded);
    assert_eq!(second.seed_source().fetches.get(), 0);
    assert!(second.spots().is_empty());
    assert!(second.store().is_seeded().unwrap());
}

#[tokio::test]
async fn test_existing_spot_prevents_seed_fetch() {
    let (_dir, path) = temp_db();
    let existing = {
        let mut store = open(&path);
        let spot = spotmap::Spot::from_new(NewSpot::at(34.0, 132.0));
        store.put(&spot).unwrap();
        spot
    };

    let mut controller = SpotController::new(open(&path), TrackedSeed::new(TWO_POINTS));
    let outcome = controller.startup().await.unwrap();

    assert_eq!(outcome, StartupOutcome::Loaded { count: 1 });
    assert_eq!(controller.seed_source().fetches.get(), 0);
    assert_eq!(controller.store().get_all().unwrap(), vec![existing]);
}

#[tokio::test]
async fn test_line_features_are_not_imported() {
    let (_dir, path) = temp_db();
    let mut controller = SpotController::new(open(&path), StaticSeed(POINT_AND_LINE.to_string()));

    assert_eq!(
        controller.startup().await.unwrap(),
        StartupOutcome::Seeded { count: 1 }
    );
    assert_eq!(controller.spots()[0].title, "Point");
}

#[tokio::test]
async fn test_missing_seed_file_completes_seeding() {
    let (dir, path) = temp_db();
    let seed = FileSeed::new(dir.path().join("absent.geojson"));
    let mut controller = SpotController::new(open(&path), seed);

    assert_eq!(
        controller.startup().await.unwrap(),
        StartupOutcome::Seeded { count: 0 }
    );
    assert!(controller.store().is_seeded().unwrap());
}

#[tokio::test]
async fn test_added_spots_persist_exactly_once() {
    let (_dir, path) = temp_db();
    let mut added = Vec::new();
    {
        let mut controller = SpotController::new(open(&path), StaticSeed::default());
        controller.startup().await.unwrap();

        for i in 0..20 {
            let category = SpotCategory::ALL[i % 3];
            let spot = controller
                .add_spot(NewSpot {
                    title: format!("spot {i}"),
                    memo: format!("memo {i}"),
                    category: Some(category),
                    lat: 34.0 + i as f64 * 0.001,
                    lng: 132.0 - i as f64 * 0.001,
                })
                .unwrap();
            added.push(spot);
        }
    }

    let store = open(&path);
    let stored = store.get_all().unwrap();
    for spot in &added {
        let matches: Vec<_> = stored.iter().filter(|s| s.id == spot.id).collect();
        assert_eq!(matches, vec![spot]);
    }
}

#[tokio::test]
async fn test_draft_without_category_stores_wait() {
    let (_dir, path) = temp_db();
    let mut controller = SpotController::new(open(&path), StaticSeed::default());
    controller.startup().await.unwrap();

    controller.pick_location(34.41, 132.72).category = None;
    let spot = controller.save_draft().unwrap();

    let stored = open(&path).get(&spot.id).unwrap().unwrap();
    assert_eq!(stored.category, SpotCategory::Wait);
}

#[tokio::test]
async fn test_open_from_config_uses_bundled_seed() {
    let (_dir, path) = temp_db();
    let config = SpotMapConfig::with_db_path(path.to_string_lossy());
    let mut controller = spotmap::open_from_config(&config).unwrap();

    match controller.startup().await.unwrap() {
        StartupOutcome::Seeded { count } => assert!(count > 0),
        other => panic!("expected seeding, got {other:?}"),
    }
}

#[test]
fn test_unavailable_storage_is_init_error() {
    let (dir, _path) = temp_db();
    let blocked = dir.path().join("no").join("such").join("spots.db");
    let config = SpotMapConfig::with_db_path(blocked.to_string_lossy());

    let result = spotmap::open_from_config(&config);
    assert!(matches!(result, Err(SpotError::Init { .. })));
}
