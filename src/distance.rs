//! Approximate surface distance between coordinates.

use geo::Point;

/// WGS-84 equatorial radius in meters.
pub const EARTH_EQUATORIAL_RADIUS_METERS: f64 = 6_378_137.0;

/// Equirectangular (flat-projection) distance between two coordinates, in
/// meters.
///
/// The longitude delta is scaled by the cosine of the mean latitude and the
/// result by the equatorial radius. This is cheaper than a great-circle
/// formula and accurate enough for the short-to-medium ranges a "nearby"
/// search operates on; it degrades at continental scales. Ranking behavior
/// depends on this exact formula, so it must not be swapped for haversine.
///
/// # Examples
///
/// ```rust
/// use geo::Point;
/// use rawgeo::distance::equirectangular;
///
/// let paris = Point::new(2.349014, 48.864716);
/// let melun = Point::new(2.349014, 48.504987);
/// let d = equirectangular(&paris, &melun);
/// assert!((d - 40_000.0).abs() < 500.0);
/// ```
pub fn equirectangular(p1: &Point<f64>, p2: &Point<f64>) -> f64 {
    let lat1 = p1.y().to_radians();
    let lat2 = p2.y().to_radians();
    let x = (p2.x().to_radians() - p1.x().to_radians()) * ((lat1 + lat2) / 2.0).cos();
    let y = lat2 - lat1;
    (x * x + y * y).sqrt() * EARTH_EQUATORIAL_RADIUS_METERS
}
