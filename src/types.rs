//! Public data types and configuration.

use crate::geohash::MAX_PRECISION;
use serde::de::Error;
use serde::{Deserialize, Serialize};

/// A single indexable location.
///
/// `id` is an opaque caller-supplied identifier; uniqueness is the caller's
/// responsibility. `geohash` is derived at index time (at the configured
/// precision) when not supplied and is immutable for the point's lifetime in
/// the index. `distance` is a query-time annotation only and is never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Caller-supplied identifier.
    pub id: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Derived geohash; empty until the point is indexed.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub geohash: String,
    /// Distance in meters from the query coordinate, filled in by `query`.
    #[serde(default)]
    pub distance: f64,
}

impl Point {
    /// Create a point ready for indexing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rawgeo::Point;
    ///
    /// let paris = Point::new("paris", 48.864716, 2.349014);
    /// assert_eq!(paris.id, "paris");
    /// ```
    pub fn new(id: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lon,
            geohash: String::new(),
            distance: 0.0,
        }
    }

    /// The coordinate as a `geo` point (`x` = longitude, `y` = latitude).
    pub fn location(&self) -> geo::Point<f64> {
        geo::Point::new(self.lon, self.lat)
    }
}

/// Index configuration.
///
/// Serializable so deployments can load it from JSON alongside their own
/// settings.
///
/// # Example
///
/// ```rust
/// use rawgeo::Config;
///
/// let config = Config::from_json(r#"{ "geohash_precision": 9 }"#).unwrap();
/// assert_eq!(config.geohash_precision, 9);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Geohash precision for stored index keys (1-12, default: 12).
    ///
    /// Stored keys are encoded at this precision; it bounds how closely a
    /// candidate's coordinate can be recovered at query time, since only the
    /// cell center is recoverable from a key.
    #[serde(default = "Config::default_geohash_precision")]
    pub geohash_precision: usize,

    /// Optional key prefix isolating this index's keys from other users of
    /// the same store.
    #[serde(default)]
    pub keyspace: Option<String>,
}

impl Config {
    const fn default_geohash_precision() -> usize {
        MAX_PRECISION
    }

    /// Set the stored-key geohash precision.
    ///
    /// # Panics
    ///
    /// Panics if `precision` is outside 1-12.
    pub fn with_geohash_precision(mut self, precision: usize) -> Self {
        assert!(
            (1..=MAX_PRECISION).contains(&precision),
            "Geohash precision must be between 1 and 12"
        );
        self.geohash_precision = precision;
        self
    }

    /// Set the keyspace prefix.
    pub fn with_keyspace(mut self, keyspace: impl Into<String>) -> Self {
        self.keyspace = Some(keyspace.into());
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.geohash_precision < 1 || self.geohash_precision > MAX_PRECISION {
            return Err("Geohash precision must be between 1 and 12".to_string());
        }
        Ok(())
    }

    /// Load configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geohash_precision: Self::default_geohash_precision(),
            keyspace: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_location() {
        let p = Point::new("paris", 48.864716, 2.349014);
        assert_eq!(p.location().x(), 2.349014);
        assert_eq!(p.location().y(), 48.864716);
        assert!(p.geohash.is_empty());
        assert_eq!(p.distance, 0.0);
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.geohash_precision, MAX_PRECISION);
        assert!(config.keyspace.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builders() {
        let config = Config::default()
            .with_geohash_precision(9)
            .with_keyspace("cities");
        assert_eq!(config.geohash_precision, 9);
        assert_eq!(config.keyspace.as_deref(), Some("cities"));
    }

    #[test]
    #[should_panic(expected = "Geohash precision must be between 1 and 12")]
    fn test_config_invalid_precision() {
        let _ = Config::default().with_geohash_precision(15);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default()
            .with_geohash_precision(10)
            .with_keyspace("poi");
        let json = config.to_json().unwrap();
        let restored = Config::from_json(&json).unwrap();
        assert_eq!(restored.geohash_precision, 10);
        assert_eq!(restored.keyspace.as_deref(), Some("poi"));
    }

    #[test]
    fn test_config_rejects_invalid_json() {
        assert!(Config::from_json(r#"{ "geohash_precision": 0 }"#).is_err());
        assert!(Config::from_json(r#"{ "geohash_precision": 42 }"#).is_err());
    }
}
