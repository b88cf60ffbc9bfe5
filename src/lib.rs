//! Embedded geohash-based geospatial index over an ordered key-value store.
//!
//! Register points (id + latitude/longitude) and retrieve, sorted by
//! distance, everything within an approximate radius of a coordinate:
//!
//! ```rust
//! use rawgeo::{GeoIndex, Point};
//!
//! let mut index = GeoIndex::memory()?;
//! index.index(&Point::new("paris", 48.864716, 2.349014))?;
//! index.index(&Point::new("melun", 48.539876, 2.655210))?;
//!
//! let nearby = index.query(48.864716, 2.349014, 50_000.0)?;
//! assert_eq!(nearby[0].id, "paris");
//! # Ok::<(), rawgeo::RawGeoError>(())
//! ```
//!
//! Each point is persisted as a single `geohash:id` key; a radius query maps
//! the radius to a geohash precision, scans the target cell plus its eight
//! neighbors, and ranks the surviving candidates by equirectangular
//! distance. Only the cell center is recoverable from a key, so returned
//! coordinates carry a precision-dependent error; callers that need exact
//! positions should resolve ids against their own dataset.

pub mod builder;
pub mod distance;
pub mod error;
pub mod geohash;
pub mod index;
pub mod precision;
pub mod storage;
pub mod sync;
pub mod types;

pub use builder::IndexBuilder;
pub use error::{RawGeoError, Result};
pub use index::GeoIndex;
pub use sync::SyncIndex;
pub use types::{Config, Point};

pub use storage::{LogBackend, MemoryBackend, OrderedStore, StorageStats};

pub use self::geohash::{Direction, MAX_PRECISION, Neighbors};

/// Alias kept for callers that prefer the crate name as the entry type.
pub type RawGeo = GeoIndex;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{GeoIndex, IndexBuilder, Point, RawGeoError, Result, SyncIndex};

    pub use crate::{Config, MAX_PRECISION};

    pub use crate::{LogBackend, MemoryBackend, OrderedStore};
}
