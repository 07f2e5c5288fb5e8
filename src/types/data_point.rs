use crate::batch::error::RequestError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A query target: the geographic point a series is extracted for.
///
/// Any finite pair is accepted. Points outside a grid's coverage resolve to
/// the nearest edge cell rather than failing.
///
/// # Examples
///
/// ```
/// use climgrid::DataPoint;
///
/// let mumbai = DataPoint::new(19.0, 73.0);
/// assert_eq!(mumbai.latitude, 19.0);
/// assert_eq!(mumbai.longitude, 73.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl DataPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Rejects NaN and infinite coordinates. `row` is the table row the point
    /// came from, when it came from a table.
    pub(crate) fn validate(&self, row: Option<usize>) -> Result<(), RequestError> {
        for (field, value) in [("latitude", self.latitude), ("longitude", self.longitude)] {
            if !value.is_finite() {
                return Err(RequestError::NonFiniteCoordinate { field, value, row });
            }
        }
        Ok(())
    }
}

impl From<(f64, f64)> for DataPoint {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

impl fmt::Display for DataPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}
