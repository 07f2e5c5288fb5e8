use crate::grid::error::GridError;
use crate::types::dataset_kind::DatasetKind;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// A request that is structurally invalid. Raised before any extraction
/// work begins and never silently defaulted.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Field '{field}' is not a number: '{value}'")]
    NonNumeric { field: &'static str, value: String },

    #[error("{}", describe_non_finite(.field, .value, .row))]
    NonFiniteCoordinate {
        field: &'static str,
        value: f64,
        /// Zero-based table row, for points read from a table.
        row: Option<usize>,
    },

    #[error("Field '{field}' is not a valid year: '{value}'")]
    MalformedYear { field: &'static str, value: String },

    #[error("Year {year} is outside the supported calendar")]
    YearOutOfRange { year: i32 },

    #[error("Request expands to {units} units, more than the limit of {limit}")]
    TooManyUnits { units: usize, limit: usize },

    #[error("Year range starts after it ends ({start} > {end})")]
    ReversedYearRange { start: i32, end: i32 },

    #[error("Coordinate table contains no rows")]
    EmptyCoordinateTable,

    #[error("Coordinate table has no '{0}' column")]
    MissingColumn(String),

    #[error("Coordinate table row {} has no value in column '{column}'", .row + 1)]
    NullCell { column: String, row: usize },

    #[error("Unknown {field} '{value}'")]
    UnknownMode { field: &'static str, value: String },

    #[error("A coordinate table was requested but none was supplied")]
    MissingCoordinateTable,

    #[error("Failed to read coordinate table '{path}'")]
    CoordinateTable {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
}

fn describe_non_finite(field: &str, value: &f64, row: &Option<usize>) -> String {
    match row {
        Some(row) => format!(
            "Coordinate table row {} has non-finite {} ({})",
            row + 1,
            field,
            value
        ),
        None => format!("Non-finite {} ({})", field, value),
    }
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Invalid request")]
    InvalidRequest(#[from] RequestError),

    /// A failure no single unit can absorb, such as an unreadable data
    /// directory or a dataset this build cannot decode.
    #[error("Batch aborted")]
    Grid(#[source] GridError),

    /// Every unit of the batch produced zero rows.
    #[error("No {kind} data found for any of the {units} requested units")]
    EmptyResult { kind: DatasetKind, units: usize },
}
