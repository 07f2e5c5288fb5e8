//! Nearest grid cell lookup.

use crate::grid::axis::GridAxis;
use crate::types::data_point::DataPoint;

/// Index of the value in `axis` closest to `coordinate` by absolute
/// difference, or `None` for an empty axis.
///
/// Values are scanned in index order and only a strictly smaller distance
/// replaces the current best, so a coordinate halfway between two values
/// resolves to the lower index. Coordinates outside the axis resolve to the
/// nearest end.
///
/// # Examples
///
/// ```
/// use climgrid::nearest_index;
///
/// let axis = [7.5, 8.5, 9.5];
/// assert_eq!(nearest_index(&axis, 8.4), Some(1));
/// assert_eq!(nearest_index(&axis, 8.0), Some(0));
/// assert_eq!(nearest_index(&axis, 42.0), Some(2));
/// ```
pub fn nearest_index(axis: &[f64], coordinate: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, value) in axis.iter().enumerate() {
        let distance = (value - coordinate).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((index, distance)),
        }
    }
    best.map(|(index, _)| index)
}

/// The grid cell a query point resolved to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedCell {
    pub lat_index: usize,
    pub lon_index: usize,
    /// Axis value at `lat_index`.
    pub latitude: f64,
    /// Axis value at `lon_index`.
    pub longitude: f64,
}

/// Resolves latitude and longitude independently against their axes.
pub fn resolve_cell(latitudes: &GridAxis, longitudes: &GridAxis, point: &DataPoint) -> ResolvedCell {
    let lat_index = latitudes.nearest_index(point.latitude);
    let lon_index = longitudes.nearest_index(point.longitude);
    ResolvedCell {
        lat_index,
        lon_index,
        latitude: latitudes.values()[lat_index],
        longitude: longitudes.values()[lon_index],
    }
}
