use rawgeo::{Config, GeoIndex, Point, RawGeoError};
use std::collections::HashSet;
use tempfile::TempDir;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn paris() -> Point {
    Point::new("paris", 48.864716, 2.349014)
}

/// Three points on the Paris meridian at increasing distances.
fn paris_neighborhood() -> Vec<Point> {
    vec![
        Point::new("500km", 44.36810797040634, 2.349014000000026),
        Point::new("40km", 48.50498735763251, 2.349014000000026),
        Point::new("50km", 48.41505519704064, 2.349014000000026),
    ]
}

fn ids(points: &[Point]) -> Vec<&str> {
    points.iter().map(|p| p.id.as_str()).collect()
}

#[test]
fn test_query_returns_inserted_point() {
    init_logging();
    let mut index = GeoIndex::memory().unwrap();
    index.index(&paris()).unwrap();

    // A 1 meter radius still finds the point at its own coordinates.
    let res = index.query(paris().lat, paris().lon, 1.0).unwrap();
    assert_eq!(res.len(), 1);
    assert_eq!(res[0].id, "paris");
    assert_eq!(res[0].distance as i64, 0);
}

#[test]
fn test_radius_buckets_around_paris() {
    init_logging();
    let mut index = GeoIndex::memory().unwrap();
    for p in paris_neighborhood() {
        index.index(&p).unwrap();
    }

    let res = index.query(paris().lat, paris().lon, 45_000.0).unwrap();
    assert_eq!(ids(&res), vec!["40km"]);

    let res = index.query(paris().lat, paris().lon, 60_000.0).unwrap();
    assert_eq!(ids(&res), vec!["40km", "50km"]);

    let res = index.query(paris().lat, paris().lon, 600_000.0).unwrap();
    assert_eq!(ids(&res), vec!["40km", "50km", "500km"]);

    // Distances are ascending and roughly where the fixture puts them.
    assert!(res[0].distance < res[1].distance);
    assert!(res[1].distance < res[2].distance);
    assert!((res[0].distance - 40_000.0).abs() < 500.0);
    assert!((res[1].distance - 50_000.0).abs() < 500.0);
    assert!((res[2].distance - 500_000.0).abs() < 2_500.0);
}

#[test]
fn test_radius_monotonicity() {
    init_logging();
    let mut index = GeoIndex::memory().unwrap();
    index.index(&paris()).unwrap();
    for p in paris_neighborhood() {
        index.index(&p).unwrap();
    }

    let mut previous: HashSet<String> = HashSet::new();
    for radius in [1.0, 500.0, 45_000.0, 60_000.0, 600_000.0, 2_000_000.0] {
        let res = index.query(paris().lat, paris().lon, radius).unwrap();
        let current: HashSet<String> = res.iter().map(|p| p.id.clone()).collect();
        assert!(
            previous.is_subset(&current),
            "radius {radius}: lost {:?}",
            previous.difference(&current).collect::<Vec<_>>()
        );
        previous = current;
    }
    assert_eq!(previous.len(), 4);
}

#[test]
fn test_point_across_cell_boundary_is_found() {
    init_logging();
    let mut index = GeoIndex::memory().unwrap();

    // A 1000 m radius queries at geohash precision 5, whose cells are
    // 0.0439453125 degrees tall. Place the query just south of a cell
    // boundary and the point just north of it, ~445 m apart.
    let boundary_lat = 48.8671875;
    let query_lat = boundary_lat - 0.002;
    let point_lat = boundary_lat + 0.002;
    let lon = 2.349014;

    let query_cell = rawgeo::geohash::encode(geo::Point::new(lon, query_lat), 5).unwrap();
    let point_cell = rawgeo::geohash::encode(geo::Point::new(lon, point_lat), 5).unwrap();
    assert_ne!(query_cell, point_cell, "fixture must straddle a cell edge");

    index.index(&Point::new("edge", point_lat, lon)).unwrap();

    let res = index.query(query_lat, lon, 1_000.0).unwrap();
    assert_eq!(ids(&res), vec!["edge"]);
    assert!(res[0].distance < 1_000.0);
}

#[test]
fn test_invalid_inputs_are_rejected() {
    let mut index = GeoIndex::memory().unwrap();

    assert!(matches!(
        index.index(&Point::new("a", 0.0, 5.0)),
        Err(RawGeoError::InvalidLatLong)
    ));
    assert!(matches!(
        index.index(&Point::new("b", 5.0, 0.0)),
        Err(RawGeoError::InvalidLatLong)
    ));
    assert!(matches!(
        index.index(&Point::new("", 5.0, 5.0)),
        Err(RawGeoError::MissingId)
    ));
    assert!(matches!(
        index.query(0.0, 5.0, 100.0),
        Err(RawGeoError::InvalidLatLong)
    ));
}

#[test]
fn test_reindexing_is_idempotent() {
    let mut index = GeoIndex::memory().unwrap();
    index.index(&paris()).unwrap();
    index.index(&paris()).unwrap();

    assert_eq!(index.len().unwrap(), 1);
    let res = index.query(paris().lat, paris().lon, 10.0).unwrap();
    assert_eq!(res.len(), 1);
}

#[test]
fn test_empty_result_is_not_an_error() {
    let index = GeoIndex::memory().unwrap();
    let res = index.query(48.864716, 2.349014, 10_000.0).unwrap();
    assert!(res.is_empty());
}

#[test]
fn test_oversized_radius_uses_fallback_precision() {
    let mut index = GeoIndex::memory().unwrap();
    index.index(&paris()).unwrap();
    for p in paris_neighborhood() {
        index.index(&p).unwrap();
    }

    // Beyond the largest table bound the query still runs, at a coarse
    // precision, and stays sorted.
    let res = index
        .query(paris().lat, paris().lon, 5_000_000.0)
        .unwrap();
    assert!(!res.is_empty());
    for pair in res.windows(2) {
        assert!(pair[0].distance <= pair[1].distance);
    }
}

#[test]
fn test_persistence_across_reopen() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cities.idx");

    {
        let mut index = GeoIndex::open(&path).unwrap();
        index.index(&paris()).unwrap();
        for p in paris_neighborhood() {
            index.index(&p).unwrap();
        }
        index.sync().unwrap();
    }

    let index = GeoIndex::open(&path).unwrap();
    assert_eq!(index.len().unwrap(), 4);

    let res = index.query(paris().lat, paris().lon, 45_000.0).unwrap();
    assert_eq!(ids(&res), vec!["paris", "40km"]);
}

#[test]
fn test_destroy_removes_persisted_state() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cities.idx");

    let mut index = GeoIndex::open(&path).unwrap();
    index.index(&paris()).unwrap();
    index.sync().unwrap();
    assert!(path.exists());

    index.destroy().unwrap();
    assert!(!path.exists());
}

#[test]
fn test_configured_precision_round_trip() {
    let config = Config::default().with_geohash_precision(9);
    let mut index = GeoIndex::memory_with_config(config).unwrap();
    index.index(&paris()).unwrap();

    let res = index.query(paris().lat, paris().lon, 100.0).unwrap();
    assert_eq!(res.len(), 1);
    assert_eq!(res[0].geohash.len(), 9);
    // Stored at 9 characters, the recovered coordinate is within a few
    // meters of the input.
    assert!(res[0].distance < 5.0);
}
