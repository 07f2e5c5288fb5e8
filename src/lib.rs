mod batch;
mod climgrid;
mod coordinates;
mod error;
mod export;
mod extract;
mod grid;
mod spatial;
mod types;
mod utils;

pub use climgrid::*;
pub use error::ClimGridError;

pub use types::config::*;
pub use types::data_point::DataPoint;
pub use types::dataset_kind::DatasetKind;
pub use types::selection::{PointSelection, YearSelection};
pub use types::series::*;

pub use batch::enumerate::enumerate_units;
pub use batch::error::{BatchError, RequestError};
pub use batch::orchestrator::BatchOrchestrator;
pub use batch::request::{BatchRequest, RequestParams, MAX_UNITS};

pub use coordinates::read_coordinate_table;

pub use export::assembler::{assemble, series_frame, AssembledExport, ExportLayout, ExportTable};
pub use export::error::ExportError;
pub use export::naming::{artifact_stem, format_coordinate, unit_identifier};
pub use export::writer::{write_export, ExportFormat};

pub use extract::extractor::SeriesExtractor;
pub use extract::grid_cache::GridCache;

pub use grid::axis::GridAxis;
pub use grid::container::{GriddedContainer, MemoryContainer};
pub use grid::decoded::DecodedGrid;
pub use grid::decoder::GridDecoder;
pub use grid::error::GridError;
pub use grid::locator::{DirectoryLocator, FileLocator, StaticLocator};
#[cfg(feature = "netcdf")]
pub use grid::netcdf_container::NetcdfContainer;
pub use grid::raw_binary::decode_raw_grid;
pub use grid::self_describing::decode_container;
pub use grid::time_axis::{TimeAxis, TimeUnits};

pub use spatial::resolver::{nearest_index, resolve_cell, ResolvedCell};
