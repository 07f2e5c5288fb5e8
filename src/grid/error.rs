use crate::types::dataset_kind::DatasetKind;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Failures locating or decoding one source grid.
///
/// Cloneable so a failed decode can be cached once per year and reported to
/// every unit of that year.
#[derive(Debug, Clone, Error)]
pub enum GridError {
    #[error("No {kind} source file for {year}")]
    SourceNotFound {
        kind: DatasetKind,
        year: i32,
        /// The path that was tried, when there was one.
        path: Option<PathBuf>,
    },

    #[error("Failed to read source file '{0}'")]
    Io(PathBuf, #[source] Arc<std::io::Error>),

    #[error("Payload of {len} bytes is not a whole number of {value_size}-byte values")]
    TruncatedPayload { len: usize, value_size: usize },

    #[error("{values} values do not divide into daily layers of {cells_per_day} cells")]
    NonIntegerDayCount { values: usize, cells_per_day: usize },

    #[error("Grid contains no time steps")]
    EmptyGrid,

    #[error("Variable '{variable}' has shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        variable: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("Variable '{0}' not found in container")]
    MissingVariable(String),

    #[error("Attribute '{attribute}' not found on variable '{variable}'")]
    MissingAttribute { variable: String, attribute: String },

    #[error("Axis '{axis}' is invalid: {reason}")]
    InvalidAxis { axis: String, reason: String },

    #[error("Unrecognised time units '{0}'")]
    InvalidTimeUnits(String),

    #[error("Time offset {offset} is not representable with units '{units}'")]
    InvalidTimeValue { units: String, offset: f64 },

    #[error("Grid for {year} starts on {first_date}")]
    WrongYear { year: i32, first_date: NaiveDate },

    #[error("Failed to read container '{path}': {message}")]
    Container { path: PathBuf, message: String },

    #[error("Reading {kind} grids requires the `{feature}` feature")]
    Unsupported {
        kind: DatasetKind,
        feature: &'static str,
    },

    #[error("Background decode of {kind} {year} failed: {message}")]
    TaskJoin {
        kind: DatasetKind,
        year: i32,
        message: String,
    },
}

impl GridError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GridError::Io(path.into(), Arc::new(source))
    }

    pub fn is_source_not_found(&self) -> bool {
        matches!(self, GridError::SourceNotFound { .. })
    }

    /// True for the outcomes a batch absorbs by skipping the unit: a year
    /// without a source file, or a file that does not decode. Anything else
    /// fails the whole batch.
    pub fn is_unit_recoverable(&self) -> bool {
        self.is_source_not_found() || self.is_decode_error()
    }

    /// True when a file existed but its layout did not match expectations.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            GridError::TruncatedPayload { .. }
                | GridError::NonIntegerDayCount { .. }
                | GridError::EmptyGrid
                | GridError::ShapeMismatch { .. }
                | GridError::MissingVariable(_)
                | GridError::MissingAttribute { .. }
                | GridError::InvalidAxis { .. }
                | GridError::InvalidTimeUnits(_)
                | GridError::InvalidTimeValue { .. }
                | GridError::WrongYear { .. }
                | GridError::Container { .. }
        )
    }
}
