use crate::batch::enumerate::enumerate_units;
use crate::batch::error::BatchError;
use crate::batch::request::BatchRequest;
use crate::extract::extractor::SeriesExtractor;
use crate::extract::grid_cache::GridCache;
use crate::grid::decoder::GridDecoder;
use crate::grid::error::GridError;
use crate::grid::locator::FileLocator;
use crate::types::config::ClimGridConfig;
use crate::types::series::{BatchResult, SeriesResult, UnitKey};
use futures_util::stream::{self, StreamExt, TryStreamExt};
use log::{error, info, warn};
use std::sync::Arc;

/// Runs batch requests against one data directory.
///
/// Every `(year, point)` unit is extracted independently. A unit whose year
/// has no source file, or whose file fails to decode, is logged and left out
/// of the result; it never fails the batch. Any other grid failure aborts
/// the batch with [`BatchError::Grid`].
pub struct BatchOrchestrator {
    config: Arc<ClimGridConfig>,
    locator: Arc<dyn FileLocator>,
}

impl BatchOrchestrator {
    pub fn new(config: Arc<ClimGridConfig>, locator: Arc<dyn FileLocator>) -> Self {
        Self { config, locator }
    }

    pub fn config(&self) -> &ClimGridConfig {
        &self.config
    }

    /// Extracts every unit of `request`.
    ///
    /// Units run concurrently, at most `max_concurrency` at a time, and the
    /// result lists them in enumeration order. Each year is decoded once,
    /// shared by all of its points and dropped when its last point is done.
    ///
    /// # Errors
    ///
    /// - [`BatchError::InvalidRequest`] before any work when the request does
    ///   not validate.
    /// - [`BatchError::Grid`] when this build cannot decode the dataset, or a
    ///   unit fails for a reason other than a missing or undecodable file.
    /// - [`BatchError::EmptyResult`] when no unit produced a single row.
    pub async fn run(&self, request: &BatchRequest) -> Result<BatchResult, BatchError> {
        request.validate()?;
        let kind = request.kind;
        GridDecoder::ensure_supported(kind).map_err(BatchError::Grid)?;

        let units = enumerate_units(&request.points, &request.years);
        let unit_count = units.len();
        let points_per_year = request.points.points().len();
        info!(
            "Extracting {} {} units ({} points x {} years)",
            unit_count,
            kind,
            points_per_year,
            request.years.len()
        );

        // A fresh cache per batch: nothing decoded outlives the request.
        let cache = GridCache::new(Arc::clone(&self.config), Arc::clone(&self.locator))
            .evicting_after(points_per_year);
        let cap = self.config.max_concurrency.max(1);

        let outcomes: Vec<(UnitKey, Result<SeriesResult, GridError>)> = stream::iter(units)
            .map(|key| {
                let cache = &cache;
                async move {
                    let outcome = cache
                        .get(kind, key.year)
                        .await
                        .map(|grid| SeriesExtractor::new(&grid).extract(key.point));
                    cache.release(kind, key.year).await;
                    match outcome {
                        Err(e) if !e.is_unit_recoverable() => Err(e),
                        outcome => Ok((key, outcome)),
                    }
                }
            })
            .buffered(cap)
            .try_collect::<Vec<_>>()
            .await
            .map_err(|e| {
                error!("Aborting {} batch: {}", kind, e);
                BatchError::Grid(e)
            })?;

        let mut result = BatchResult::new(kind);
        for (key, outcome) in outcomes {
            match outcome {
                Ok(series) if series.is_empty() => {
                    warn!(
                        "Skipping {} {} at {}: series is empty",
                        kind, key.year, key.point
                    );
                }
                Ok(series) => {
                    result.push(key, series);
                }
                Err(e) => {
                    warn!("Skipping {} {} at {}: {}", kind, key.year, key.point, e);
                }
            }
        }

        if result.total_rows() == 0 {
            warn!("No {} data found for any of {} units", kind, unit_count);
            return Err(BatchError::EmptyResult {
                kind,
                units: unit_count,
            });
        }

        info!(
            "Extracted {} of {} {} units, {} rows",
            result.len(),
            unit_count,
            kind,
            result.total_rows()
        );
        Ok(result)
    }
}
