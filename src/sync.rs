//! Thread-safe wrapper for concurrent index access.
//!
//! The engine itself holds no lock: writes take `&mut self`, queries take
//! `&self`. `SyncIndex` makes the concurrency contract explicit for shared
//! multi-threaded use by wrapping the engine in `Arc<RwLock<..>>`: `index`
//! takes the write lock (single-writer discipline), `query` takes the read
//! lock, so read-only queries run in parallel.

use crate::error::Result;
use crate::index::GeoIndex;
use crate::storage::StorageStats;
use crate::types::{Config, Point};
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;

/// Thread-safe wrapper around [`GeoIndex`] using `Arc<RwLock<GeoIndex>>`.
///
/// Cloning is cheap and clones share the same underlying index.
///
/// # Examples
///
/// ```rust
/// use rawgeo::{Point, SyncIndex};
/// use std::thread;
///
/// let index = SyncIndex::memory()?;
/// let writer = index.clone();
///
/// let handle = thread::spawn(move || {
///     writer.index(&Point::new("paris", 48.864716, 2.349014)).unwrap();
/// });
/// handle.join().unwrap();
///
/// let nearby = index.query(48.864716, 2.349014, 1_000.0)?;
/// assert_eq!(nearby.len(), 1);
/// # Ok::<(), rawgeo::RawGeoError>(())
/// ```
#[derive(Clone)]
pub struct SyncIndex {
    inner: Arc<RwLock<GeoIndex>>,
}

impl SyncIndex {
    /// Create an in-memory index with default configuration.
    pub fn memory() -> Result<Self> {
        Ok(Self::from_index(GeoIndex::memory()?))
    }

    /// Create an in-memory index with a custom configuration.
    pub fn memory_with_config(config: Config) -> Result<Self> {
        Ok(Self::from_index(GeoIndex::memory_with_config(config)?))
    }

    /// Open a persistent index at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_index(GeoIndex::open(path)?))
    }

    /// Open a persistent index with a custom configuration.
    pub fn open_with_config<P: AsRef<Path>>(path: P, config: Config) -> Result<Self> {
        Ok(Self::from_index(GeoIndex::open_with_config(path, config)?))
    }

    /// Wrap an already-constructed engine.
    pub fn from_index(index: GeoIndex) -> Self {
        Self {
            inner: Arc::new(RwLock::new(index)),
        }
    }

    /// Register a point. Takes the write lock.
    pub fn index(&self, point: &Point) -> Result<()> {
        self.inner.write().index(point)
    }

    /// Radius query sorted by distance. Takes the read lock, so concurrent
    /// queries do not block each other.
    pub fn query(&self, lat: f64, lon: f64, radius_meters: f64) -> Result<Vec<Point>> {
        self.inner.read().query(lat, lon, radius_meters)
    }

    /// Flush pending writes.
    pub fn sync(&self) -> Result<()> {
        self.inner.write().sync()
    }

    /// Close the index.
    pub fn close(&self) -> Result<()> {
        self.inner.write().close()
    }

    /// Number of index keys.
    pub fn len(&self) -> Result<usize> {
        self.inner.read().len()
    }

    /// Whether the index holds no keys.
    pub fn is_empty(&self) -> Result<bool> {
        self.inner.read().is_empty()
    }

    /// Statistics of the backing store.
    pub fn stats(&self) -> Result<StorageStats> {
        self.inner.read().stats()
    }

    /// Active configuration.
    pub fn config(&self) -> Config {
        self.inner.read().config().clone()
    }
}

// Ensure SyncIndex is Send + Sync
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    let _ = assert_send_sync::<SyncIndex>;
};
