//! Index builder for flexible configuration.

use crate::error::Result;
use crate::index::GeoIndex;
use crate::storage::{LogBackend, MemoryBackend, OrderedStore};
use crate::types::Config;
use std::path::PathBuf;

/// Builder assembling a [`GeoIndex`] from a path, a configuration, and
/// optionally a caller-supplied storage backend.
///
/// # Examples
///
/// ```rust
/// use rawgeo::{Config, GeoIndex};
///
/// let index = GeoIndex::builder()
///     .in_memory()
///     .config(Config::default().with_keyspace("cities"))
///     .build()?;
/// assert!(index.is_empty()?);
/// # Ok::<(), rawgeo::RawGeoError>(())
/// ```
pub struct IndexBuilder {
    path: Option<PathBuf>,
    store: Option<Box<dyn OrderedStore>>,
    config: Config,
}

impl IndexBuilder {
    /// Create a new builder with default in-memory configuration.
    pub fn new() -> Self {
        Self {
            path: None,
            store: None,
            config: Config::default(),
        }
    }

    /// Persist the index in a log file at `path`, created if needed and
    /// replayed on startup.
    pub fn path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.path = Some(path.into());
        self.store = None;
        self
    }

    /// Keep the index purely in memory.
    pub fn in_memory(mut self) -> Self {
        self.path = None;
        self.store = None;
        self
    }

    /// Use a caller-supplied storage backend. Takes precedence over `path`.
    pub fn store(mut self, store: Box<dyn OrderedStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the index configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Build the index, opening the backing store if configured.
    pub fn build(self) -> Result<GeoIndex> {
        let store: Box<dyn OrderedStore> = match (self.store, self.path) {
            (Some(store), _) => store,
            (None, Some(path)) => Box::new(LogBackend::open(path)?),
            (None, None) => Box::new(MemoryBackend::new()),
        };
        Ok(GeoIndex::with_store(store, self.config))
    }
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}
