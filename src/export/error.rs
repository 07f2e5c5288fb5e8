use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export")]
    NoTables,

    #[error("Failed to build table '{table}'")]
    Frame {
        table: String,
        #[source]
        source: PolarsError,
    },

    #[error("Failed to encode table '{table}' as {format}")]
    Encode {
        table: String,
        format: &'static str,
        #[source]
        source: PolarsError,
    },

    #[error("Failed to create output directory '{0}'")]
    DestinationCreation(PathBuf, #[source] std::io::Error),

    #[error("I/O error writing '{0}'")]
    WriteIo(PathBuf, #[source] std::io::Error),

    #[error("Failed to move finished artifact into place at '{0}'")]
    Persist(PathBuf, #[source] std::io::Error),

    #[error("Background write task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
