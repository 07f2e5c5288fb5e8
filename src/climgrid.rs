//! The main entry point: a client bound to one directory of source grids.

use crate::batch::orchestrator::BatchOrchestrator;
use crate::batch::request::{BatchRequest, RequestParams};
use crate::coordinates::read_coordinate_table;
use crate::error::ClimGridError;
use crate::export::assembler::{assemble, ExportLayout};
use crate::export::naming::artifact_stem;
use crate::export::writer::{write_export, ExportFormat};
use crate::grid::locator::{DirectoryLocator, FileLocator};
use crate::types::config::ClimGridConfig;
use crate::types::dataset_kind::DatasetKind;
use crate::types::selection::{PointSelection, YearSelection};
use crate::types::series::BatchResult;
use crate::utils::{ensure_data_dir_exists, get_data_dir};
use bon::bon;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

/// Client for extracting point series from gridded rainfall and temperature
/// archives.
///
/// Create one with [`ClimGrid::new()`] to use the default data directory,
/// [`ClimGrid::with_data_folder()`] to point at a directory of source files
/// with default layouts, or [`ClimGrid::with_config()`] for full control.
///
/// # Examples
///
/// ```rust,no_run
/// # use climgrid::{ClimGrid, ClimGridError, DataPoint, DatasetKind};
/// # async fn run() -> Result<(), ClimGridError> {
/// let client = ClimGrid::with_data_folder("/srv/grids".into()).await?;
///
/// let batch = client
///     .extract()
///     .kind(DatasetKind::Temperature)
///     .points(DataPoint::new(19.0, 73.0))
///     .years(2010..=2012)
///     .call()
///     .await?;
/// println!("{} units extracted", batch.len());
/// # Ok(())
/// # }
/// ```
pub struct ClimGrid {
    orchestrator: BatchOrchestrator,
}

#[bon]
impl ClimGrid {
    /// Creates a client using `config`, creating its data directory when
    /// missing. Source files are found with a [`DirectoryLocator`].
    ///
    /// # Errors
    ///
    /// [`ClimGridError::DataDirCreation`] if the data directory cannot be
    /// created.
    pub async fn with_config(config: ClimGridConfig) -> Result<Self, ClimGridError> {
        ensure_data_dir_exists(&config.data_dir)
            .await
            .map_err(|e| ClimGridError::DataDirCreation(config.data_dir.clone(), e))?;
        let locator = DirectoryLocator::from_config(&config);
        Ok(Self::with_locator(config, Arc::new(locator)))
    }

    /// Creates a client reading source files from `data_folder` with the
    /// default dataset layouts.
    pub async fn with_data_folder(data_folder: PathBuf) -> Result<Self, ClimGridError> {
        Self::with_config(ClimGridConfig::builder().data_dir(data_folder).build()).await
    }

    /// Creates a client using the default data directory
    /// (`climgrid_data` inside the platform data directory).
    ///
    /// # Errors
    ///
    /// [`ClimGridError::DataDirResolution`] if the platform has no data
    /// directory, [`ClimGridError::DataDirCreation`] if it cannot be created.
    pub async fn new() -> Result<Self, ClimGridError> {
        let data_folder = get_data_dir().map_err(ClimGridError::DataDirResolution)?;
        Self::with_data_folder(data_folder).await
    }

    /// Creates a client that resolves source files through `locator`, for
    /// callers that fetch or cache files themselves.
    pub fn with_locator(config: ClimGridConfig, locator: Arc<dyn FileLocator>) -> Self {
        Self {
            orchestrator: BatchOrchestrator::new(Arc::new(config), locator),
        }
    }

    pub fn config(&self) -> &ClimGridConfig {
        self.orchestrator.config()
    }

    /// Extracts one series per `(year, point)` unit.
    ///
    /// Units whose year has no source file, or whose file cannot be decoded,
    /// are logged and skipped.
    ///
    /// # Arguments
    ///
    /// * `.kind(DatasetKind)`: **Required.** Rainfall or temperature.
    /// * `.points(impl Into<PointSelection>)`: **Required.** A [`crate::DataPoint`]
    ///   or a `Vec` of them in table order.
    /// * `.years(impl Into<YearSelection>)`: **Required.** A year or an
    ///   inclusive range such as `2010..=2012`.
    ///
    /// # Errors
    ///
    /// [`ClimGridError::Request`] when the request is invalid, and
    /// [`ClimGridError::EmptyResult`] when no unit yielded any data.
    #[builder]
    pub async fn extract(
        &self,
        kind: DatasetKind,
        #[builder(into)] points: PointSelection,
        #[builder(into)] years: YearSelection,
    ) -> Result<BatchResult, ClimGridError> {
        let request = BatchRequest {
            kind,
            points,
            years,
        };
        Ok(self.orchestrator.run(&request).await?)
    }

    /// Extracts a request and writes it as a single artifact under
    /// `destination`, returning the artifact's path.
    ///
    /// # Arguments
    ///
    /// * `.kind`, `.points`, `.years`: as for [`ClimGrid::extract`].
    /// * `.destination(impl Into<PathBuf>)`: **Required.** Output directory,
    ///   created when missing.
    /// * `.format(ExportFormat)`: Optional. Defaults to CSV.
    /// * `.layout(ExportLayout)`: Optional. Defaults to merged for rainfall
    ///   and one table per unit for temperature.
    /// * `.bundle(bool)`: Optional. Whether per-unit tables are packed into a
    ///   `.tar.gz`. Defaults to `true`.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use climgrid::{ClimGrid, ClimGridError, DataPoint, DatasetKind, ExportFormat};
    /// # async fn run() -> Result<(), ClimGridError> {
    /// let client = ClimGrid::new().await?;
    /// let artifact = client
    ///     .export()
    ///     .kind(DatasetKind::Rainfall)
    ///     .points(DataPoint::new(19.0, 73.0))
    ///     .years(2015)
    ///     .destination("out")
    ///     .format(ExportFormat::Parquet)
    ///     .call()
    ///     .await?;
    /// println!("written to {}", artifact.display());
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn export(
        &self,
        kind: DatasetKind,
        #[builder(into)] points: PointSelection,
        #[builder(into)] years: YearSelection,
        #[builder(into)] destination: PathBuf,
        format: Option<ExportFormat>,
        layout: Option<ExportLayout>,
        bundle: Option<bool>,
    ) -> Result<PathBuf, ClimGridError> {
        let request = BatchRequest {
            kind,
            points,
            years,
        };
        self.export_request(&request, destination, format, layout, bundle)
            .await
    }

    /// Handles one raw form submission end to end: parses and validates the
    /// parameters, reads the coordinate table when the request needs one,
    /// extracts and writes the artifact.
    ///
    /// # Arguments
    ///
    /// * `.params(RequestParams)`: **Required.** The submitted fields.
    /// * `.kind(DatasetKind)`: **Required.** Dataset used when the
    ///   parameters do not name one.
    /// * `.destination(impl Into<PathBuf>)`: **Required.** Output directory.
    /// * `.coordinate_table(impl Into<PathBuf>)`: Optional. CSV with
    ///   `Latitude` and `Longitude` columns, required for table requests.
    /// * `.format(ExportFormat)`: Optional. Defaults to CSV.
    #[builder]
    pub async fn from_params(
        &self,
        params: RequestParams,
        kind: DatasetKind,
        #[builder(into)] destination: PathBuf,
        #[builder(into)] coordinate_table: Option<PathBuf>,
        format: Option<ExportFormat>,
    ) -> Result<PathBuf, ClimGridError> {
        let wants_table = params
            .coord_type
            .as_deref()
            .map(|mode| {
                let mode = mode.trim();
                mode.eq_ignore_ascii_case("excel") || mode.eq_ignore_ascii_case("table")
            })
            .unwrap_or(false);
        let table = match (wants_table, coordinate_table) {
            (true, Some(path)) => Some(read_coordinate_table(&path)?),
            _ => None,
        };

        let request = BatchRequest::from_params(&params, kind, table)?;
        self.export_request(&request, destination, format, None, None)
            .await
    }

    async fn export_request(
        &self,
        request: &BatchRequest,
        destination: PathBuf,
        format: Option<ExportFormat>,
        layout: Option<ExportLayout>,
        bundle: Option<bool>,
    ) -> Result<PathBuf, ClimGridError> {
        let batch = self.orchestrator.run(request).await?;

        let stem = artifact_stem(request.kind, &request.points, &request.years);
        let layout = layout.unwrap_or_else(|| ExportLayout::default_for(request.kind));
        let export = assemble(&batch, stem, layout)?;
        info!(
            "Assembled {} table(s), {} rows, as {:?}",
            export.tables.len(),
            export.total_rows(),
            export.layout
        );

        let artifact = write_export(
            export,
            &destination,
            format.unwrap_or_default(),
            bundle.unwrap_or(true),
        )
        .await?;
        Ok(artifact)
    }
}
