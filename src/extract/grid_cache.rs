use crate::grid::decoded::DecodedGrid;
use crate::grid::decoder::GridDecoder;
use crate::grid::error::GridError;
use crate::grid::locator::FileLocator;
use crate::types::config::ClimGridConfig;
use crate::types::dataset_kind::DatasetKind;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tokio::task;

type CachedDecode = Arc<OnceCell<Result<Arc<DecodedGrid>, GridError>>>;

struct CacheEntry {
    cell: CachedDecode,
    /// Releases still expected before the entry is dropped. `None` keeps it
    /// for the life of the cache.
    remaining: Option<usize>,
}

/// Decodes each `(kind, year)` grid at most once.
///
/// Concurrent callers asking for the same year wait on the same decode; the
/// outcome, success or failure, is shared by every caller. One cache is
/// meant to live for one batch. With [`GridCache::evicting_after`] an entry
/// is dropped once its expected number of users have released it, so only
/// the years currently being extracted stay in memory.
pub struct GridCache {
    config: Arc<ClimGridConfig>,
    locator: Arc<dyn FileLocator>,
    uses_per_entry: Option<usize>,
    grids: Mutex<HashMap<(DatasetKind, i32), CacheEntry>>,
}

impl GridCache {
    pub fn new(config: Arc<ClimGridConfig>, locator: Arc<dyn FileLocator>) -> Self {
        Self {
            config,
            locator,
            uses_per_entry: None,
            grids: Mutex::new(HashMap::new()),
        }
    }

    /// Drops each entry after `uses` calls to [`GridCache::release`].
    pub fn evicting_after(mut self, uses: usize) -> Self {
        self.uses_per_entry = Some(uses.max(1));
        self
    }

    pub async fn get(&self, kind: DatasetKind, year: i32) -> Result<Arc<DecodedGrid>, GridError> {
        // Map lock is held only long enough to fetch the cell.
        let cell = {
            let mut grids = self.grids.lock().await;
            let entry = grids.entry((kind, year)).or_insert_with(|| CacheEntry {
                cell: CachedDecode::default(),
                remaining: self.uses_per_entry,
            });
            Arc::clone(&entry.cell)
        };

        if cell.initialized() {
            debug!("Cache hit for {} {}", kind, year);
        }

        cell.get_or_init(|| self.load(kind, year)).await.clone()
    }

    /// Records that one user of `(kind, year)` is done with it. A no-op
    /// unless the cache was built with [`GridCache::evicting_after`].
    pub async fn release(&self, kind: DatasetKind, year: i32) {
        let mut grids = self.grids.lock().await;
        let done = match grids.get_mut(&(kind, year)).and_then(|e| e.remaining.as_mut()) {
            Some(remaining) => {
                *remaining = remaining.saturating_sub(1);
                *remaining == 0
            }
            None => false,
        };
        if done {
            grids.remove(&(kind, year));
            debug!("Evicted {} {} from the grid cache", kind, year);
        }
    }

    /// Number of `(kind, year)` entries populated or in flight.
    pub async fn len(&self) -> usize {
        self.grids.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.grids.lock().await.is_empty()
    }

    async fn load(&self, kind: DatasetKind, year: i32) -> Result<Arc<DecodedGrid>, GridError> {
        let locator = Arc::clone(&self.locator);
        let decoder = GridDecoder::for_kind(kind, &self.config);

        let grid = task::spawn_blocking(move || {
            let path = locator.locate(kind, year)?;
            decoder.decode_file(kind, year, &path)
        })
        .await
        .map_err(|e| GridError::TaskJoin {
            kind,
            year,
            message: e.to_string(),
        })??;

        let (days, lats, lons) = grid.shape();
        info!(
            "Decoded {} grid for {}: {} days of {}x{} cells",
            kind, year, days, lats, lons
        );
        Ok(Arc::new(grid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::locator::StaticLocator;
    use crate::types::config::{AxisSpec, RawGridLayout};
    use std::path::Path;

    fn config(dir: &Path) -> Arc<ClimGridConfig> {
        Arc::new(
            ClimGridConfig::builder()
                .data_dir(dir)
                .temperature(
                    RawGridLayout::builder()
                        .latitude(AxisSpec::new(0.0, 1.0, 2))
                        .longitude(AxisSpec::new(0.0, 1.0, 2))
                        .file_name("t_{year}.bin")
                        .build(),
                )
                .build(),
        )
    }

    fn write_grid(path: &Path, days: usize) {
        let bytes: Vec<u8> = (0..days * 4)
            .flat_map(|i| (i as f32).to_le_bytes())
            .collect();
        std::fs::write(path, bytes).unwrap();
    }

    #[tokio::test]
    async fn shares_one_decode_between_callers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t_2010.bin");
        write_grid(&path, 3);
        let locator = StaticLocator::new().with_file(DatasetKind::Temperature, 2010, &path);
        let cache = GridCache::new(config(dir.path()), Arc::new(locator));

        let (a, b) = tokio::join!(
            cache.get(DatasetKind::Temperature, 2010),
            cache.get(DatasetKind::Temperature, 2010)
        );
        let a = a.unwrap();
        assert!(Arc::ptr_eq(&a, &b.unwrap()));

        // The file is no longer needed once decoded.
        std::fs::remove_file(&path).unwrap();
        let c = cache.get(DatasetKind::Temperature, 2010).await.unwrap();
        assert!(Arc::ptr_eq(&a, &c));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn evicts_each_year_after_its_last_release() {
        let dir = tempfile::tempdir().unwrap();
        let mut locator = StaticLocator::new();
        for year in 2010..=2014 {
            let path = dir.path().join(format!("t_{}.bin", year));
            write_grid(&path, 2);
            locator = locator.with_file(DatasetKind::Temperature, year, path);
        }
        let cache = GridCache::new(config(dir.path()), Arc::new(locator)).evicting_after(3);

        for year in 2010..=2014 {
            for _ in 0..3 {
                cache.get(DatasetKind::Temperature, year).await.unwrap();
                assert_eq!(cache.len().await, 1);
            }
            for _ in 0..3 {
                cache.release(DatasetKind::Temperature, year).await;
            }
            assert!(cache.is_empty().await);
        }
    }

    #[tokio::test]
    async fn entry_survives_until_every_user_released_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t_2010.bin");
        write_grid(&path, 1);
        let locator = StaticLocator::new().with_file(DatasetKind::Temperature, 2010, &path);
        let cache = GridCache::new(config(dir.path()), Arc::new(locator)).evicting_after(2);

        let first = cache.get(DatasetKind::Temperature, 2010).await.unwrap();
        cache.release(DatasetKind::Temperature, 2010).await;
        std::fs::remove_file(&path).unwrap();

        let second = cache.get(DatasetKind::Temperature, 2010).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        cache.release(DatasetKind::Temperature, 2010).await;
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn caches_failures() {
        let dir = tempfile::tempdir().unwrap();
        let cache = GridCache::new(config(dir.path()), Arc::new(StaticLocator::new()));

        let first = cache.get(DatasetKind::Temperature, 2011).await.unwrap_err();
        assert!(first.is_source_not_found());

        // A file appearing later does not change the cached outcome.
        write_grid(&dir.path().join("t_2011.bin"), 1);
        let second = cache.get(DatasetKind::Temperature, 2011).await.unwrap_err();
        assert!(second.is_source_not_found());
    }
}
