//! Geohash codec: base-32 cell encoding, cell-center decoding, and
//! same-precision neighbor computation.
//!
//! A geohash is produced by interleaved binary subdivision of the longitude
//! range `[-180, 180]` and the latitude range `[-90, 90]`, five bits per
//! character, longitude first. Longer hashes denote smaller cells. The codec
//! is pure and deterministic; `decode` recovers the **center** of a cell, not
//! the coordinate that produced the hash.

use crate::error::{RawGeoError, Result};
use geo::{Point, Rect};

/// Maximum supported geohash length in characters.
pub const MAX_PRECISION: usize = 12;

/// The geohash base-32 alphabet (digits plus lowercase letters, excluding
/// `a`, `i`, `l`, and `o`).
const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// The eight compass directions used for adjacent-cell computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Direction {
    /// All directions, clockwise from north.
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];
}

/// The eight cells surrounding a geohash, at the same precision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighbors {
    pub n: String,
    pub ne: String,
    pub e: String,
    pub se: String,
    pub s: String,
    pub sw: String,
    pub w: String,
    pub nw: String,
}

/// Encode a coordinate (`x` = longitude, `y` = latitude, degrees) into a
/// geohash of `len` characters.
///
/// # Errors
///
/// Fails if `len` is zero or exceeds [`MAX_PRECISION`], or if the coordinate
/// lies outside the valid longitude/latitude ranges.
///
/// # Examples
///
/// ```rust
/// use geo::Point;
///
/// let hash = rawgeo::geohash::encode(Point::new(-5.6, 42.6), 5)?;
/// assert_eq!(hash, "ezs42");
/// # Ok::<(), rawgeo::RawGeoError>(())
/// ```
pub fn encode(point: Point<f64>, len: usize) -> Result<String> {
    if len == 0 || len > MAX_PRECISION {
        return Err(RawGeoError::InvalidGeohash(format!(
            "precision {len} out of range 1..={MAX_PRECISION}"
        )));
    }

    let (lon, lat) = (point.x(), point.y());
    if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
        return Err(RawGeoError::InvalidCoordinate { lat, lon });
    }

    let mut out = String::with_capacity(len);
    let mut lon_range = (-180.0_f64, 180.0_f64);
    let mut lat_range = (-90.0_f64, 90.0_f64);
    let mut even_bit = true;
    let mut bits = 0u8;
    let mut ch = 0usize;

    while out.len() < len {
        let (range, value) = if even_bit {
            (&mut lon_range, lon)
        } else {
            (&mut lat_range, lat)
        };
        let mid = (range.0 + range.1) / 2.0;
        ch <<= 1;
        if value >= mid {
            ch |= 1;
            range.0 = mid;
        } else {
            range.1 = mid;
        }
        even_bit = !even_bit;

        bits += 1;
        if bits == 5 {
            out.push(BASE32[ch] as char);
            bits = 0;
            ch = 0;
        }
    }

    Ok(out)
}

/// Decode a geohash into its bounding cell.
pub fn decode_bbox(hash: &str) -> Result<Rect<f64>> {
    if hash.is_empty() || hash.len() > MAX_PRECISION {
        return Err(RawGeoError::InvalidGeohash(format!(
            "length of {hash:?} out of range 1..={MAX_PRECISION}"
        )));
    }

    let mut lon_range = (-180.0_f64, 180.0_f64);
    let mut lat_range = (-90.0_f64, 90.0_f64);
    let mut even_bit = true;

    for c in hash.chars() {
        let index = BASE32
            .iter()
            .position(|&b| b as char == c)
            .ok_or_else(|| RawGeoError::InvalidGeohash(format!("unexpected character {c:?}")))?;
        for shift in (0..5).rev() {
            let range = if even_bit {
                &mut lon_range
            } else {
                &mut lat_range
            };
            let mid = (range.0 + range.1) / 2.0;
            if (index >> shift) & 1 == 1 {
                range.0 = mid;
            } else {
                range.1 = mid;
            }
            even_bit = !even_bit;
        }
    }

    Ok(Rect::new(
        (lon_range.0, lat_range.0),
        (lon_range.1, lat_range.1),
    ))
}

/// Decode a geohash into the **center** of its bounding cell.
///
/// This is lossy by design: the coordinate that produced the hash is not
/// recoverable, only a position within half a cell of it.
pub fn decode(hash: &str) -> Result<Point<f64>> {
    Ok(decode_bbox(hash)?.center().into())
}

/// Compute the adjacent geohash in the given direction, at the same
/// precision.
///
/// Diagonal directions are composed from the two cardinal moves. At the north
/// and south poles the border carry runs off the top of the hash and this
/// returns an error rather than wrapping; the same applies to east/west at
/// the ±180° meridian. Callers that fan out over neighbors should treat such
/// directions as unreachable.
pub fn adjacent(hash: &str, direction: Direction) -> Result<String> {
    match direction {
        Direction::N | Direction::E | Direction::S | Direction::W => shift(hash, direction),
        Direction::NE => shift(&shift(hash, Direction::N)?, Direction::E),
        Direction::SE => shift(&shift(hash, Direction::S)?, Direction::E),
        Direction::SW => shift(&shift(hash, Direction::S)?, Direction::W),
        Direction::NW => shift(&shift(hash, Direction::N)?, Direction::W),
    }
}

/// Compute all eight neighbors of a geohash.
///
/// Strict: fails if any single neighbor cannot be computed (see
/// [`adjacent`]).
pub fn neighbors(hash: &str) -> Result<Neighbors> {
    Ok(Neighbors {
        n: adjacent(hash, Direction::N)?,
        ne: adjacent(hash, Direction::NE)?,
        e: adjacent(hash, Direction::E)?,
        se: adjacent(hash, Direction::SE)?,
        s: adjacent(hash, Direction::S)?,
        sw: adjacent(hash, Direction::SW)?,
        w: adjacent(hash, Direction::W)?,
        nw: adjacent(hash, Direction::NW)?,
    })
}

/// Single-cell move in a cardinal direction.
///
/// The per-character lookup tables depend on bit parity: characters at odd
/// and even positions interleave longitude and latitude bits differently, so
/// each (direction, parity) pair has its own neighbor and border table. When
/// the last character sits on the cell border in the requested direction the
/// move carries into the parent cell, recursively.
fn shift(hash: &str, direction: Direction) -> Result<String> {
    if !hash.is_ascii() {
        return Err(RawGeoError::InvalidGeohash(format!(
            "non-ascii geohash {hash:?}"
        )));
    }
    let Some(last) = hash.chars().last() else {
        return Err(RawGeoError::InvalidGeohash("empty geohash".to_string()));
    };

    let odd = hash.len() % 2 == 1;
    let parent = &hash[..hash.len() - 1];

    let mut base = if border_table(direction, odd).contains(last) {
        if parent.is_empty() {
            return Err(RawGeoError::InvalidGeohash(format!(
                "no {direction:?} neighbor beyond the edge of {hash:?}"
            )));
        }
        shift(parent, direction)?
    } else {
        parent.to_string()
    };

    let position = neighbor_table(direction, odd)
        .find(last)
        .ok_or_else(|| RawGeoError::InvalidGeohash(format!("unexpected character {last:?}")))?;
    base.push(BASE32[position] as char);
    Ok(base)
}

fn neighbor_table(direction: Direction, odd: bool) -> &'static str {
    match (direction, odd) {
        (Direction::N, false) => "p0r21436x8zb9dcf5h7kjnmqesgutwvy",
        (Direction::N, true) => "bc01fg45238967deuvhjyznpkmstqrwx",
        (Direction::S, false) => "14365h7k9dcfesgujnmqp0r2twvyx8zb",
        (Direction::S, true) => "238967debc01fg45kmstqrwxuvhjyznp",
        (Direction::E, false) => "bc01fg45238967deuvhjyznpkmstqrwx",
        (Direction::E, true) => "p0r21436x8zb9dcf5h7kjnmqesgutwvy",
        (Direction::W, false) => "238967debc01fg45kmstqrwxuvhjyznp",
        (Direction::W, true) => "14365h7k9dcfesgujnmqp0r2twvyx8zb",
        // Diagonals are composed in `adjacent` and never reach the tables.
        _ => unreachable!(),
    }
}

fn border_table(direction: Direction, odd: bool) -> &'static str {
    match (direction, odd) {
        (Direction::N, false) => "prxz",
        (Direction::N, true) => "bcfguvyz",
        (Direction::S, false) => "028b",
        (Direction::S, true) => "0145hjnp",
        (Direction::E, false) => "bcfguvyz",
        (Direction::E, true) => "prxz",
        (Direction::W, false) => "0145hjnp",
        (Direction::W, true) => "028b",
        _ => unreachable!(),
    }
}
