//! Error types for rawgeo.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RawGeoError>;

/// Errors returned by the index engine, the geohash codec, and the storage
/// backends.
///
/// All failures are surfaced to the caller as values; nothing is retried
/// internally. A multi-cell query fails as a whole on the first cell-scan
/// error, without partial results.
#[derive(Debug, Error)]
pub enum RawGeoError {
    /// Latitude or longitude is zero, which the index treats as "unset".
    #[error("latitude and longitude must be non-zero")]
    InvalidLatLong,

    /// A point was submitted for indexing without an identifier.
    #[error("point is missing an id")]
    MissingId,

    /// Reserved for direct key lookups. `query` never raises this; it
    /// returns an empty result set instead.
    #[error("key does not exist")]
    NotFound,

    /// The index has been closed; no further operations are accepted.
    #[error("index is closed")]
    IndexClosed,

    /// A coordinate outside the valid latitude/longitude ranges.
    #[error("coordinate out of range: lat={lat}, lon={lon}")]
    InvalidCoordinate {
        /// Latitude in degrees.
        lat: f64,
        /// Longitude in degrees.
        lon: f64,
    },

    /// A geohash string that cannot be encoded, decoded, or shifted to a
    /// neighboring cell.
    #[error("invalid geohash: {0}")]
    InvalidGeohash(String),

    /// A persisted index entry that does not parse back into a point.
    #[error("corrupted index entry: {0}")]
    CorruptEntry(String),

    /// An I/O failure in a storage backend, surfaced unmodified.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other storage backend failure.
    #[error("storage error: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            RawGeoError::InvalidLatLong.to_string(),
            "latitude and longitude must be non-zero"
        );
        assert_eq!(RawGeoError::MissingId.to_string(), "point is missing an id");
        assert_eq!(RawGeoError::NotFound.to_string(), "key does not exist");

        let err = RawGeoError::InvalidCoordinate {
            lat: 91.0,
            lon: 0.5,
        };
        assert!(err.to_string().contains("91"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file gone");
        let err: RawGeoError = io_err.into();
        assert!(matches!(err, RawGeoError::Io(_)));
    }
}
