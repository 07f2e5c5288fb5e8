//! Reading coordinate tables supplied alongside a request.

use crate::batch::error::RequestError;
use crate::types::data_point::DataPoint;
use log::debug;
use polars::prelude::*;
use std::path::Path;

const LATITUDE: &str = "Latitude";
const LONGITUDE: &str = "Longitude";

/// Reads a CSV coordinate table with `Latitude` and `Longitude` columns
/// (matched case-insensitively; other columns are ignored).
///
/// Points come back in row order. Every cell must hold a finite number.
pub fn read_coordinate_table(path: &Path) -> Result<Vec<DataPoint>, RequestError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|source| RequestError::CoordinateTable {
            path: path.to_path_buf(),
            source,
        })?;

    let latitudes = numeric_column(&df, LATITUDE, path)?;
    let longitudes = numeric_column(&df, LONGITUDE, path)?;
    if latitudes.is_empty() {
        return Err(RequestError::EmptyCoordinateTable);
    }

    let points: Vec<DataPoint> = latitudes
        .into_iter()
        .zip(longitudes)
        .map(|(lat, lon)| DataPoint::new(lat, lon))
        .collect();
    for (row, point) in points.iter().enumerate() {
        point.validate(Some(row))?;
    }

    debug!("Read {} points from {}", points.len(), path.display());
    Ok(points)
}

fn numeric_column(df: &DataFrame, name: &'static str, path: &Path) -> Result<Vec<f64>, RequestError> {
    let polars_err = |source: PolarsError| RequestError::CoordinateTable {
        path: path.to_path_buf(),
        source,
    };

    let actual = df
        .get_column_names()
        .into_iter()
        .find(|column| column.as_str().eq_ignore_ascii_case(name))
        .cloned()
        .ok_or_else(|| RequestError::MissingColumn(name.to_string()))?;
    let column = df.column(actual.as_str()).map_err(polars_err)?;

    if column.dtype() == &DataType::String {
        return column
            .str()
            .map_err(polars_err)?
            .into_iter()
            .enumerate()
            .map(|(row, cell)| {
                let cell = cell.map(str::trim).filter(|c| !c.is_empty()).ok_or_else(|| {
                    RequestError::NullCell {
                        column: name.to_string(),
                        row,
                    }
                })?;
                cell.parse().map_err(|_| RequestError::NonNumeric {
                    field: name,
                    value: cell.to_string(),
                })
            })
            .collect();
    }

    let cast = column.cast(&DataType::Float64).map_err(polars_err)?;
    let values = cast.f64().map_err(polars_err)?;
    values
        .into_iter()
        .enumerate()
        .map(|(row, cell)| {
            cell.ok_or_else(|| RequestError::NullCell {
                column: name.to_string(),
                row,
            })
        })
        .collect()
}
