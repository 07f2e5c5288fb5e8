use crate::grid::decoded::DecodedGrid;
use crate::grid::error::GridError;
use crate::grid::raw_binary::decode_raw_grid;
use crate::types::config::{ClimGridConfig, RawGridLayout, SelfDescribingLayout};
use crate::types::dataset_kind::DatasetKind;
use log::debug;
use std::io::ErrorKind;
use std::path::Path;

/// Picks the decoding strategy for a dataset kind.
#[derive(Debug, Clone, PartialEq)]
pub enum GridDecoder {
    /// Axes and time read from the file itself (rainfall).
    SelfDescribing(SelfDescribingLayout),
    /// Headerless floats shaped by the configured layout (temperature).
    RawBinary(RawGridLayout),
}

impl GridDecoder {
    pub fn for_kind(kind: DatasetKind, config: &ClimGridConfig) -> Self {
        match kind {
            DatasetKind::Rainfall => GridDecoder::SelfDescribing(config.rainfall.clone()),
            DatasetKind::Temperature => GridDecoder::RawBinary(config.temperature.clone()),
        }
    }

    /// Fails with [`GridError::Unsupported`] when this build cannot decode
    /// `kind` at all.
    pub fn ensure_supported(kind: DatasetKind) -> Result<(), GridError> {
        match kind {
            DatasetKind::Rainfall if !cfg!(feature = "netcdf") => Err(GridError::Unsupported {
                kind,
                feature: "netcdf",
            }),
            _ => Ok(()),
        }
    }

    /// Decodes the file at `path` as the `year` grid of `kind`.
    ///
    /// Blocking. A missing file maps to [`GridError::SourceNotFound`] so
    /// callers can tell absent years apart from unreadable ones.
    pub fn decode_file(
        &self,
        kind: DatasetKind,
        year: i32,
        path: &Path,
    ) -> Result<DecodedGrid, GridError> {
        if !path.is_file() {
            return Err(GridError::SourceNotFound {
                kind,
                year,
                path: Some(path.to_path_buf()),
            });
        }
        debug!("Decoding {} {} from {}", kind, year, path.display());

        match self {
            GridDecoder::RawBinary(layout) => {
                let bytes = std::fs::read(path).map_err(|e| match e.kind() {
                    ErrorKind::NotFound => GridError::SourceNotFound {
                        kind,
                        year,
                        path: Some(path.to_path_buf()),
                    },
                    _ => GridError::io(path, e),
                })?;
                decode_raw_grid(&bytes, layout, kind, year)
            }
            GridDecoder::SelfDescribing(layout) => decode_self_describing(layout, kind, year, path),
        }
    }
}

#[cfg(feature = "netcdf")]
fn decode_self_describing(
    layout: &SelfDescribingLayout,
    kind: DatasetKind,
    year: i32,
    path: &Path,
) -> Result<DecodedGrid, GridError> {
    let container = crate::grid::netcdf_container::NetcdfContainer::open(path)?;
    crate::grid::self_describing::decode_container(&container, layout, kind, year)
}

#[cfg(not(feature = "netcdf"))]
fn decode_self_describing(
    _layout: &SelfDescribingLayout,
    kind: DatasetKind,
    _year: i32,
    _path: &Path,
) -> Result<DecodedGrid, GridError> {
    Err(GridError::Unsupported {
        kind,
        feature: "netcdf",
    })
}
