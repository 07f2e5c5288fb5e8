//! Deterministic names for exported tables and artifacts.

use crate::types::data_point::DataPoint;
use crate::types::dataset_kind::DatasetKind;
use crate::types::selection::{PointSelection, YearSelection};

/// Renders a coordinate the way it appears in names: always with a decimal
/// point, no trailing zeros beyond the first (`19.0`, `73.25`).
///
/// ```
/// use climgrid::format_coordinate;
///
/// assert_eq!(format_coordinate(19.0), "19.0");
/// assert_eq!(format_coordinate(73.25), "73.25");
/// assert_eq!(format_coordinate(-8.5), "-8.5");
/// ```
pub fn format_coordinate(value: f64) -> String {
    format!("{:?}", value)
}

/// `{year}_{latitude}_{longitude}`, the key of one unit's table.
///
/// ```
/// use climgrid::{unit_identifier, DataPoint};
///
/// assert_eq!(unit_identifier(2015, &DataPoint::new(19.0, 73.0)), "2015_19.0_73.0");
/// ```
pub fn unit_identifier(year: i32, point: &DataPoint) -> String {
    format!(
        "{}_{}_{}",
        year,
        format_coordinate(point.latitude),
        format_coordinate(point.longitude)
    )
}

/// Stem of the artifact for a whole request:
/// `{kind}_data_{coordinates}_{years}`.
///
/// `coordinates` is `{lat}_{lon}` for one point and `multiple_coordinates`
/// for a table; `years` is the year or `range_{start}-{end}`.
///
/// ```
/// use climgrid::{artifact_stem, DataPoint, DatasetKind, PointSelection, YearSelection};
///
/// let stem = artifact_stem(
///     DatasetKind::Rainfall,
///     &PointSelection::Single(DataPoint::new(19.0, 73.0)),
///     &YearSelection::Single(2015),
/// );
/// assert_eq!(stem, "rainfall_data_19.0_73.0_2015");
///
/// let stem = artifact_stem(
///     DatasetKind::Temperature,
///     &PointSelection::Table(vec![DataPoint::new(1.0, 2.0)]),
///     &YearSelection::from(2010..=2011),
/// );
/// assert_eq!(stem, "temperature_data_multiple_coordinates_range_2010-2011");
/// ```
pub fn artifact_stem(kind: DatasetKind, points: &PointSelection, years: &YearSelection) -> String {
    let coordinates = match points {
        PointSelection::Single(point) => format!(
            "{}_{}",
            format_coordinate(point.latitude),
            format_coordinate(point.longitude)
        ),
        PointSelection::Table(_) => "multiple_coordinates".to_string(),
    };
    let years = match *years {
        YearSelection::Single(year) => year.to_string(),
        YearSelection::Range { start, end } => format!("range_{}-{}", start, end),
    };
    format!("{}_data_{}_{}", kind.path_segment(), coordinates, years)
}
