use crate::grid::axis::GridAxis;
use crate::grid::error::GridError;
use crate::grid::time_axis::TimeAxis;
use crate::types::dataset_kind::DatasetKind;

/// One source file decoded into memory: a `[time, lat, lon]` array plus its
/// axes. Missing observations are `None`; no sentinel survives decoding.
///
/// Immutable once built, so a single instance can be shared between all
/// points extracted for the same year.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedGrid {
    kind: DatasetKind,
    year: i32,
    latitudes: GridAxis,
    longitudes: GridAxis,
    times: TimeAxis,
    values: Vec<Option<f32>>,
}

impl DecodedGrid {
    /// Fails with [`GridError::ShapeMismatch`] unless `values` holds exactly
    /// `times x latitudes x longitudes` entries.
    pub fn new(
        kind: DatasetKind,
        year: i32,
        latitudes: GridAxis,
        longitudes: GridAxis,
        times: TimeAxis,
        values: Vec<Option<f32>>,
    ) -> Result<Self, GridError> {
        if times.is_empty() {
            return Err(GridError::EmptyGrid);
        }
        let expected = times.len() * latitudes.len() * longitudes.len();
        if values.len() != expected {
            return Err(GridError::ShapeMismatch {
                variable: kind.value_column().to_string(),
                expected: vec![times.len(), latitudes.len(), longitudes.len()],
                found: vec![values.len()],
            });
        }
        Ok(Self {
            kind,
            year,
            latitudes,
            longitudes,
            times,
            values,
        })
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn latitudes(&self) -> &GridAxis {
        &self.latitudes
    }

    pub fn longitudes(&self) -> &GridAxis {
        &self.longitudes
    }

    pub fn times(&self) -> &TimeAxis {
        &self.times
    }

    /// `(time, lat, lon)` dimensions.
    pub fn shape(&self) -> (usize, usize, usize) {
        (
            self.times.len(),
            self.latitudes.len(),
            self.longitudes.len(),
        )
    }

    /// The value at one `(time, lat, lon)` position, `None` when missing or
    /// out of bounds.
    pub fn value(&self, time: usize, lat: usize, lon: usize) -> Option<f32> {
        let (times, lats, lons) = self.shape();
        if time >= times || lat >= lats || lon >= lons {
            return None;
        }
        self.values[(time * lats + lat) * lons + lon]
    }

    /// All values of one cell along the time dimension.
    ///
    /// Yields exactly `times().len()` items when both indices are in range
    /// and nothing otherwise.
    pub fn cell_series(&self, lat: usize, lon: usize) -> impl Iterator<Item = Option<f32>> + '_ {
        let (times, lats, lons) = self.shape();
        let in_range = lat < lats && lon < lons;
        let start = if in_range { lat * lons + lon } else { self.values.len() };
        self.values[start..]
            .iter()
            .step_by(lats * lons)
            .take(if in_range { times } else { 0 })
            .copied()
    }
}
