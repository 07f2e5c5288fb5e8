use crate::grid::error::GridError;
use crate::spatial::resolver::nearest_index;
use crate::types::config::AxisSpec;

/// Ordered coordinate values along one spatial dimension of a grid.
///
/// Never empty, all values finite and strictly monotonic.
#[derive(Debug, Clone, PartialEq)]
pub struct GridAxis {
    name: String,
    values: Vec<f64>,
}

impl GridAxis {
    /// Builds an evenly spaced axis from its bounds and length.
    ///
    /// Values are computed as `start + i * step` with the last value pinned
    /// to `end`, so the result matches `numpy.linspace`.
    ///
    /// # Examples
    ///
    /// ```
    /// use climgrid::{AxisSpec, GridAxis};
    ///
    /// let lat = GridAxis::linear("latitude", &AxisSpec::new(7.5, 37.5, 31)).unwrap();
    /// assert_eq!(lat.len(), 31);
    /// assert_eq!(lat.values()[1], 8.5);
    /// assert_eq!(lat.values()[30], 37.5);
    /// ```
    pub fn linear(name: &str, spec: &AxisSpec) -> Result<Self, GridError> {
        if spec.count == 0 {
            return Err(GridError::InvalidAxis {
                axis: name.to_string(),
                reason: "axis has zero length".to_string(),
            });
        }
        let values = if spec.count == 1 {
            vec![spec.start]
        } else {
            let step = (spec.end - spec.start) / (spec.count - 1) as f64;
            let mut values: Vec<f64> = (0..spec.count)
                .map(|i| spec.start + i as f64 * step)
                .collect();
            values[spec.count - 1] = spec.end;
            values
        };
        Self::from_values(name, values)
    }

    /// Wraps coordinate values read from a file.
    pub fn from_values(name: &str, values: Vec<f64>) -> Result<Self, GridError> {
        let invalid = |reason: &str| GridError::InvalidAxis {
            axis: name.to_string(),
            reason: reason.to_string(),
        };

        if values.is_empty() {
            return Err(invalid("axis has zero length"));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(invalid("axis contains non-finite values"));
        }
        let ascending = values.windows(2).all(|w| w[0] < w[1]);
        let descending = values.windows(2).all(|w| w[0] > w[1]);
        if !ascending && !descending {
            return Err(invalid("axis values are not strictly monotonic"));
        }

        Ok(Self {
            name: name.to_string(),
            values,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Index of the axis value closest to `coordinate`; ties go to the lower
    /// index and coordinates beyond either end clamp to that end.
    pub fn nearest_index(&self, coordinate: f64) -> usize {
        // The axis is never empty.
        nearest_index(&self.values, coordinate).unwrap_or(0)
    }
}
