//! Turning a batch result into export tables.

use crate::export::error::ExportError;
use crate::types::dataset_kind::DatasetKind;
use crate::types::series::{BatchResult, SeriesRow};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// How units map onto tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportLayout {
    /// Every unit's rows concatenated into one table.
    Merged,
    /// One table per unit, named by its identifier.
    PerUnit,
}

impl ExportLayout {
    /// Rainfall exports merge, temperature exports split per unit.
    pub fn default_for(kind: DatasetKind) -> Self {
        match kind {
            DatasetKind::Rainfall => ExportLayout::Merged,
            DatasetKind::Temperature => ExportLayout::PerUnit,
        }
    }
}

/// One named table of an export.
#[derive(Debug, Clone)]
pub struct ExportTable {
    pub name: String,
    pub frame: DataFrame,
}

#[derive(Debug, Clone)]
pub struct AssembledExport {
    /// Base name for the artifact as a whole.
    pub stem: String,
    pub layout: ExportLayout,
    pub tables: Vec<ExportTable>,
}

impl AssembledExport {
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|table| table.frame.height()).sum()
    }
}

/// Builds the `Date, Latitude, Longitude, <value>` frame for a run of rows.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use climgrid::{series_frame, DatasetKind, SeriesRow};
///
/// let rows = [SeriesRow {
///     date: NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
///     latitude: 19.0,
///     longitude: 73.0,
///     value: Some(12.5),
/// }];
/// let df = series_frame(DatasetKind::Rainfall, rows.iter()).unwrap();
/// let columns: Vec<&str> = df.get_column_names().iter().map(|c| c.as_str()).collect();
/// assert_eq!(columns, ["Date", "Latitude", "Longitude", "Rainfall"]);
/// ```
pub fn series_frame<'a>(
    kind: DatasetKind,
    rows: impl IntoIterator<Item = &'a SeriesRow>,
) -> PolarsResult<DataFrame> {
    let rows = rows.into_iter();
    let capacity = rows.size_hint().0;
    let mut dates = Vec::with_capacity(capacity);
    let mut latitudes = Vec::with_capacity(capacity);
    let mut longitudes = Vec::with_capacity(capacity);
    let mut values: Vec<Option<f32>> = Vec::with_capacity(capacity);
    for row in rows {
        dates.push(row.date);
        latitudes.push(row.latitude);
        longitudes.push(row.longitude);
        values.push(row.value);
    }

    df!(
        "Date" => dates,
        "Latitude" => latitudes,
        "Longitude" => longitudes,
        kind.value_column() => values
    )
}

/// Lays a batch out as tables.
///
/// A batch with a single unit is always merged. Per-unit tables are named by
/// unit identifier; a merged table takes the artifact `stem` as its name.
pub fn assemble(
    batch: &BatchResult,
    stem: impl Into<String>,
    layout: ExportLayout,
) -> Result<AssembledExport, ExportError> {
    let stem = stem.into();
    if batch.is_empty() {
        return Err(ExportError::NoTables);
    }
    let layout = if batch.len() == 1 {
        ExportLayout::Merged
    } else {
        layout
    };
    let kind = batch.kind();

    let tables = match layout {
        ExportLayout::Merged => {
            let rows = batch.iter().flat_map(|unit| unit.series.rows.iter());
            let frame = series_frame(kind, rows).map_err(|source| ExportError::Frame {
                table: stem.clone(),
                source,
            })?;
            vec![ExportTable {
                name: stem.clone(),
                frame,
            }]
        }
        ExportLayout::PerUnit => batch
            .iter()
            .map(|unit| {
                series_frame(kind, &unit.series.rows)
                    .map(|frame| ExportTable {
                        name: unit.id.clone(),
                        frame,
                    })
                    .map_err(|source| ExportError::Frame {
                        table: unit.id.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?,
    };

    Ok(AssembledExport {
        stem,
        layout,
        tables,
    })
}
