use crate::batch::error::{BatchError, RequestError};
use crate::export::error::ExportError;
use crate::grid::error::GridError;
use crate::types::dataset_kind::DatasetKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClimGridError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Export(#[from] ExportError),

    /// No unit of the request produced a single row. A "no data" outcome
    /// rather than a failure of the system.
    #[error("No {kind} data found for any of the {units} requested units")]
    EmptyResult { kind: DatasetKind, units: usize },

    #[error("Failed to read config file '{0}'")]
    ConfigRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse config file '{0}'")]
    ConfigParse(PathBuf, #[source] serde_json::Error),

    #[error("Failed to create data directory '{0}'")]
    DataDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine data directory")]
    DataDirResolution(#[source] std::io::Error),
}

impl From<BatchError> for ClimGridError {
    fn from(err: BatchError) -> Self {
        match err {
            BatchError::InvalidRequest(e) => ClimGridError::Request(e),
            BatchError::Grid(e) => ClimGridError::Grid(e),
            BatchError::EmptyResult { kind, units } => ClimGridError::EmptyResult { kind, units },
        }
    }
}

impl ClimGridError {
    /// True for the "no data found" outcome, which callers usually report to
    /// the user instead of treating as an error.
    pub fn is_no_data(&self) -> bool {
        matches!(self, ClimGridError::EmptyResult { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_errors_flatten_into_crate_error() {
        let empty: ClimGridError = BatchError::EmptyResult {
            kind: DatasetKind::Rainfall,
            units: 4,
        }
        .into();
        assert!(empty.is_no_data());
        assert_eq!(
            empty.to_string(),
            "No rainfall data found for any of the 4 requested units"
        );

        let invalid: ClimGridError =
            BatchError::InvalidRequest(RequestError::EmptyCoordinateTable).into();
        assert!(matches!(
            invalid,
            ClimGridError::Request(RequestError::EmptyCoordinateTable)
        ));
        assert!(!invalid.is_no_data());

        let failed: ClimGridError = BatchError::Grid(GridError::Unsupported {
            kind: DatasetKind::Rainfall,
            feature: "netcdf",
        })
        .into();
        assert!(matches!(failed, ClimGridError::Grid(GridError::Unsupported { .. })));
        assert!(!failed.is_no_data());
    }
}
