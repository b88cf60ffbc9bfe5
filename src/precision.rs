//! Radius-to-precision selection for query fan-out.

/// Maximum search radius (meters) safely covered by a cell of each geohash
/// precision, ascending by radius. Coarser precisions yield larger cells that
/// bracket larger radii, at the cost of scanning more candidates per cell.
const RADIUS_TO_PRECISION: &[(f64, usize)] = &[
    (0.074, 11),
    (0.6, 10),
    (2.4, 9),
    (19.0, 8),
    (76.0, 7),
    (610.0, 6),
    (2_400.0, 5),
    (20_000.0, 4),
    (78_000.0, 3),
    (630_000.0, 2),
    (2_500_000.0, 1),
];

/// Precision returned when the radius exceeds every table bound. Bounds the
/// worst-case fan-out cost instead of failing or scanning everything.
const FALLBACK_PRECISION: usize = 2;

/// Select the geohash precision whose cell size safely covers `radius_meters`.
///
/// Scans the table from the smallest bound upward and returns the precision
/// of the first entry whose bound is at least the requested radius. Never
/// fails: oversized radii fall back to a coarse fixed precision.
pub fn for_radius(radius_meters: f64) -> usize {
    for &(bound, precision) in RADIUS_TO_PRECISION {
        if bound >= radius_meters {
            return precision;
        }
    }
    FALLBACK_PRECISION
}
