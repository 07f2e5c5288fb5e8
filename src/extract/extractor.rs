use crate::grid::decoded::DecodedGrid;
use crate::spatial::resolver::resolve_cell;
use crate::types::data_point::DataPoint;
use crate::types::series::{SeriesResult, SeriesRow};
use log::trace;

/// Pulls single-cell time series out of one decoded grid.
///
/// Borrowing the grid lets every point of a year share a single decode.
///
/// # Examples
///
/// ```
/// use climgrid::{
///     decode_raw_grid, AxisSpec, DataPoint, DatasetKind, RawGridLayout, SeriesExtractor,
/// };
///
/// let layout = RawGridLayout::builder()
///     .latitude(AxisSpec::new(10.0, 11.0, 2))
///     .longitude(AxisSpec::new(70.0, 71.0, 2))
///     .file_name("t_{year}.bin")
///     .build();
/// let bytes: Vec<u8> = [1.0f32, 2.0, 3.0, 4.0]
///     .iter()
///     .flat_map(|v| v.to_le_bytes())
///     .collect();
/// let grid = decode_raw_grid(&bytes, &layout, DatasetKind::Temperature, 2020).unwrap();
///
/// let series = SeriesExtractor::new(&grid).extract(DataPoint::new(10.9, 70.2));
/// assert_eq!(series.rows.len(), 1);
/// assert_eq!(series.rows[0].value, Some(3.0));
/// assert_eq!(series.rows[0].latitude, 10.9);
/// ```
pub struct SeriesExtractor<'a> {
    grid: &'a DecodedGrid,
}

impl<'a> SeriesExtractor<'a> {
    pub fn new(grid: &'a DecodedGrid) -> Self {
        Self { grid }
    }

    /// One row per time step of the grid, labelled with `point` as given.
    pub fn extract(&self, point: DataPoint) -> SeriesResult {
        let cell = resolve_cell(self.grid.latitudes(), self.grid.longitudes(), &point);
        trace!(
            "{} resolved to cell ({}, {}) at ({}, {})",
            point,
            cell.lat_index,
            cell.lon_index,
            cell.latitude,
            cell.longitude
        );

        let rows = self
            .grid
            .times()
            .dates()
            .iter()
            .zip(self.grid.cell_series(cell.lat_index, cell.lon_index))
            .map(|(&date, value)| SeriesRow {
                date,
                latitude: point.latitude,
                longitude: point.longitude,
                value,
            })
            .collect();

        SeriesResult {
            kind: self.grid.kind(),
            year: self.grid.year(),
            point,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::container::MemoryContainer;
    use crate::grid::self_describing::decode_container;
    use crate::types::config::SelfDescribingLayout;
    use crate::types::dataset_kind::DatasetKind;
    use chrono::NaiveDate;

    /// A 2015 rainfall grid on a 0.25 degree mesh around (19, 73) where the
    /// value at day `d` of cell `(i, j)` is `d + i * 1000 + j * 100`.
    fn rainfall_2015() -> DecodedGrid {
        let lats: Vec<f64> = (0..5).map(|i| 18.5 + i as f64 * 0.25).collect();
        let lons: Vec<f64> = (0..5).map(|j| 72.5 + j as f64 * 0.25).collect();
        let times: Vec<f64> = (0..365).map(|d| 42003.0 + d as f64).collect();
        let data: Vec<f64> = (0..365)
            .flat_map(|d| {
                (0..5).flat_map(move |i| (0..5).map(move |j| (d + i * 1000 + j * 100) as f64))
            })
            .collect();
        let container = MemoryContainer::new()
            .with_variable("LATITUDE", vec![5], lats)
            .with_variable("LONGITUDE", vec![5], lons)
            .with_variable("TIME", vec![365], times)
            .with_text_attribute("TIME", "units", "days since 1900-01-01")
            .with_variable("RAINFALL", vec![365, 5, 5], data);
        decode_container(
            &container,
            &SelfDescribingLayout::default(),
            DatasetKind::Rainfall,
            2015,
        )
        .unwrap()
    }

    #[test]
    fn single_point_full_year() {
        let grid = rainfall_2015();
        let series = SeriesExtractor::new(&grid).extract(DataPoint::new(19.0, 73.0));

        assert_eq!(series.len(), 365);
        assert_eq!(series.kind, DatasetKind::Rainfall);
        assert!(series
            .rows
            .iter()
            .all(|row| row.latitude == 19.0 && row.longitude == 73.0));
        assert_eq!(series.rows[0].date, NaiveDate::from_ymd_opt(2015, 1, 1).unwrap());
        assert_eq!(series.rows[364].date, NaiveDate::from_ymd_opt(2015, 12, 31).unwrap());
        // (19.0, 73.0) sits exactly on cell (2, 2)
        assert_eq!(series.rows[0].value, Some(2200.0));
        assert_eq!(series.rows[10].value, Some(2210.0));
    }

    #[test]
    fn labels_rows_with_query_not_cell_coordinates() {
        let grid = rainfall_2015();
        let series = SeriesExtractor::new(&grid).extract(DataPoint::new(50.0, 10.0));

        assert_eq!(series.len(), 365);
        assert_eq!(series.rows[0].latitude, 50.0);
        assert_eq!(series.rows[0].longitude, 10.0);
        // clamped to the north-west corner (4, 0)
        assert_eq!(series.rows[0].value, Some(4000.0));
    }
}
