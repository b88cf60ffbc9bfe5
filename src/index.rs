//! The index engine: geohash-keyed writes and radius queries over an
//! ordered store.
//!
//! Every indexed point becomes a single key `geohash ++ ":" ++ id` with an
//! empty value; the key itself carries all indexed information. Keys sort
//! lexicographically by geohash first, so all points sharing a geohash prefix
//! are contiguous in the key space. Geohash strings only approximate spatial
//! locality (two physically adjacent points can have divergent prefixes near
//! a cell boundary), so a radius query fans out over the target cell and its
//! eight neighbors rather than trusting a single prefix scan.

use crate::builder::IndexBuilder;
use crate::distance;
use crate::error::{RawGeoError, Result};
use crate::geohash::{self, Direction};
use crate::precision;
use crate::storage::{LogBackend, MemoryBackend, OrderedStore, StorageStats};
use crate::types::{Config, Point};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::path::Path;

/// Separator between the geohash and the point id within an index key. The
/// geohash alphabet cannot contain it, so splitting on the first occurrence
/// is unambiguous.
const KEY_SEPARATOR: char = ':';

/// A geospatial index over an ordered key-value store.
///
/// `GeoIndex` is not thread-safe by itself: writes take `&mut self`, queries
/// take `&self`, and the borrow checker enforces the single-writer
/// discipline within one thread. For shared multi-threaded access wrap it in
/// [`SyncIndex`](crate::SyncIndex), which serializes writes behind a global
/// write lock and leaves queries concurrent.
///
/// # Examples
///
/// ```rust
/// use rawgeo::{GeoIndex, Point};
///
/// let mut index = GeoIndex::memory()?;
/// index.index(&Point::new("paris", 48.864716, 2.349014))?;
///
/// let nearby = index.query(48.864716, 2.349014, 1_000.0)?;
/// assert_eq!(nearby.len(), 1);
/// assert_eq!(nearby[0].id, "paris");
/// # Ok::<(), rawgeo::RawGeoError>(())
/// ```
pub struct GeoIndex {
    store: Box<dyn OrderedStore>,
    config: Config,
    /// Keyspace prefix prepended to every index key, empty by default.
    prefix: String,
    closed: bool,
}

impl GeoIndex {
    /// Open a persistent index at `path`, creating the backing log file if
    /// absent. The sentinel path `":memory:"` yields a purely in-memory
    /// index.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(path, Config::default())
    }

    /// Open a persistent index with a custom configuration.
    pub fn open_with_config<P: AsRef<Path>>(path: P, config: Config) -> Result<Self> {
        let path = path.as_ref();
        if path.to_str() == Some(":memory:") {
            return Ok(Self::with_store(Box::new(MemoryBackend::new()), config));
        }
        let store = LogBackend::open(path)?;
        Ok(Self::with_store(Box::new(store), config))
    }

    /// Create an in-memory index with default configuration.
    pub fn memory() -> Result<Self> {
        Self::open(":memory:")
    }

    /// Create an in-memory index with a custom configuration.
    pub fn memory_with_config(config: Config) -> Result<Self> {
        Self::open_with_config(":memory:", config)
    }

    /// Build an index on a caller-supplied store. The engine depends only on
    /// the `set`/`seek` semantics of [`OrderedStore`], so any conforming
    /// backend works.
    pub fn with_store(store: Box<dyn OrderedStore>, config: Config) -> Self {
        let prefix = match &config.keyspace {
            Some(keyspace) => format!("{keyspace}/"),
            None => String::new(),
        };
        Self {
            store,
            config,
            prefix,
            closed: false,
        }
    }

    /// Create an index builder for advanced configuration.
    pub fn builder() -> IndexBuilder {
        IndexBuilder::new()
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Register a point in the index.
    ///
    /// The point's geohash is computed at the configured precision when not
    /// already set. Re-indexing the same `(geohash, id)` pair is an
    /// idempotent overwrite; re-indexing the same `id` at a different
    /// coordinate creates an additional, independent entry and leaves the old
    /// one live; callers that move points must track and remove stale keys
    /// themselves.
    ///
    /// # Errors
    ///
    /// `InvalidLatLong` if latitude or longitude is zero, `MissingId` if the
    /// id is empty, `IndexClosed` after [`close`](Self::close), or any store
    /// write failure.
    pub fn index(&mut self, point: &Point) -> Result<()> {
        if self.closed {
            return Err(RawGeoError::IndexClosed);
        }
        if point.lat == 0.0 || point.lon == 0.0 {
            log::warn!(
                "rejecting point {:?}: zero latitude or longitude",
                point.id
            );
            return Err(RawGeoError::InvalidLatLong);
        }
        if point.id.is_empty() {
            return Err(RawGeoError::MissingId);
        }

        let hash = if point.geohash.is_empty() {
            geohash::encode(point.location(), self.config.geohash_precision)?
        } else {
            point.geohash.clone()
        };

        let key = self.index_key(&hash, &point.id);
        self.store.set(key.as_bytes(), b"")?;
        log::debug!("indexed {} at {}", point.id, hash);
        Ok(())
    }

    /// Return all indexed points within roughly `radius_meters` of the query
    /// coordinate, sorted ascending by distance.
    ///
    /// The radius selects a geohash precision whose cell size covers it; the
    /// query then scans the target cell and its reachable neighbors (up to
    /// nine cells), reconstructs each candidate from its stored geohash cell
    /// center, and filters by the equirectangular distance. Candidate
    /// coordinates are cell centers, not original inputs, so distances carry
    /// a precision-dependent error. An empty result is not an error.
    ///
    /// Ties in distance are broken by id so result order is deterministic.
    pub fn query(&self, lat: f64, lon: f64, radius_meters: f64) -> Result<Vec<Point>> {
        if self.closed {
            return Err(RawGeoError::IndexClosed);
        }
        if lat == 0.0 || lon == 0.0 {
            return Err(RawGeoError::InvalidLatLong);
        }

        let center = geo::Point::new(lon, lat);
        let precision = precision::for_radius(radius_meters);
        let target = geohash::encode(center, precision)?;
        let cells = self.search_cells(&target);
        log::debug!(
            "query lat={lat} lon={lon} radius={radius_meters}m precision={precision} cells={}",
            cells.len()
        );

        let mut results = Vec::new();
        for cell in &cells {
            self.scan_cell(cell, &center, radius_meters, &mut results)?;
        }

        results.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(results)
    }

    /// Flush pending writes to the backing store.
    pub fn sync(&mut self) -> Result<()> {
        self.store.sync()
    }

    /// Close the index. Pending writes are flushed; further operations
    /// return `IndexClosed`.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Err(RawGeoError::IndexClosed);
        }
        self.closed = true;
        self.store.close()
    }

    /// Close the index and remove all persisted state.
    pub fn destroy(mut self) -> Result<()> {
        self.closed = true;
        self.store.destroy()
    }

    /// Number of index keys in the store.
    pub fn len(&self) -> Result<usize> {
        self.store.len()
    }

    /// Whether the index holds no keys.
    pub fn is_empty(&self) -> Result<bool> {
        self.store.is_empty()
    }

    /// Statistics of the backing store.
    pub fn stats(&self) -> Result<StorageStats> {
        self.store.stats()
    }

    fn index_key(&self, hash: &str, id: &str) -> String {
        format!("{}{hash}{KEY_SEPARATOR}{id}", self.prefix)
    }

    /// The target cell plus its reachable neighbors, de-duplicated.
    ///
    /// Directions that cannot be computed (the border carry runs off the
    /// grid at the poles or the ±180° meridian) are skipped, so the fan-out
    /// may cover fewer than nine cells.
    fn search_cells(&self, target: &str) -> SmallVec<[String; 9]> {
        let mut seen = FxHashSet::default();
        let mut cells: SmallVec<[String; 9]> = SmallVec::new();
        seen.insert(target.to_string());
        cells.push(target.to_string());

        for direction in Direction::ALL {
            match geohash::adjacent(target, direction) {
                Ok(hash) => {
                    if seen.insert(hash.clone()) {
                        cells.push(hash);
                    }
                }
                Err(err) => {
                    log::debug!("skipping {direction:?} neighbor of {target}: {err}");
                }
            }
        }
        cells
    }

    /// Prefix-scan one cell and collect candidates within the radius.
    ///
    /// The store's ordering guarantees all keys of the cell are contiguous,
    /// so iteration stops at the first non-matching key. The geohash cell is
    /// a rectangle while the query region is a circle; candidates inside the
    /// cell but beyond the radius are filtered here.
    fn scan_cell(
        &self,
        cell: &str,
        center: &geo::Point<f64>,
        radius_meters: f64,
        out: &mut Vec<Point>,
    ) -> Result<()> {
        let prefix = format!("{}{cell}", self.prefix);
        for (key, _value) in self.store.seek(prefix.as_bytes())? {
            if !key.starts_with(prefix.as_bytes()) {
                break;
            }
            let mut point = self.parse_index_key(&key)?;
            let dist = distance::equirectangular(center, &point.location());
            if dist > radius_meters {
                log::trace!("discarding {} at {dist:.1}m", point.id);
                continue;
            }
            point.distance = dist;
            out.push(point);
        }
        Ok(())
    }

    /// Rebuild a candidate point from its index key. The coordinate is the
    /// center of the stored geohash cell; the original input coordinate is
    /// not recoverable from the key.
    fn parse_index_key(&self, key: &[u8]) -> Result<Point> {
        let key = std::str::from_utf8(key)
            .map_err(|_| RawGeoError::CorruptEntry(format!("non-utf8 key {key:?}")))?;
        let unprefixed = key
            .strip_prefix(&self.prefix)
            .ok_or_else(|| RawGeoError::CorruptEntry(format!("key {key:?} outside keyspace")))?;
        let (hash, id) = unprefixed
            .split_once(KEY_SEPARATOR)
            .ok_or_else(|| RawGeoError::CorruptEntry(format!("missing separator in {key:?}")))?;
        if id.is_empty() {
            return Err(RawGeoError::CorruptEntry(format!("empty id in {key:?}")));
        }

        let location = geohash::decode(hash)?;
        Ok(Point {
            id: id.to_string(),
            lat: location.y(),
            lon: location.x(),
            geohash: hash.to_string(),
            distance: 0.0,
        })
    }
}

/// Best-effort flush when the index goes out of scope without an explicit
/// `close`. Errors are ignored.
impl Drop for GeoIndex {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        let _ = self.store.sync();
    }
}
