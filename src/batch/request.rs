//! Batch requests and the raw form parameters they are parsed from.

use crate::batch::error::RequestError;
use crate::types::data_point::DataPoint;
use crate::types::dataset_kind::DatasetKind;
use crate::types::selection::{PointSelection, YearSelection};
use bon::Builder;
use serde::{Deserialize, Serialize};

/// Largest number of `(year, point)` units one request may expand to.
pub const MAX_UNITS: usize = 1_000_000;

/// One extraction request: a dataset kind, the points and the years.
///
/// # Examples
///
/// ```
/// use climgrid::{BatchRequest, DataPoint, DatasetKind};
///
/// let request = BatchRequest::builder()
///     .kind(DatasetKind::Temperature)
///     .points(DataPoint::new(19.0, 73.0))
///     .years(2010..=2012)
///     .build();
/// assert!(request.validate().is_ok());
/// assert_eq!(request.unit_count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct BatchRequest {
    pub kind: DatasetKind,
    #[builder(into)]
    pub points: PointSelection,
    #[builder(into)]
    pub years: YearSelection,
}

impl BatchRequest {
    /// Checks every point, the year range and the size of the expansion.
    /// Called by the orchestrator before any file is touched.
    pub fn validate(&self) -> Result<(), RequestError> {
        self.points.validate()?;
        self.years.validate()?;
        let units = self.unit_count();
        if units > MAX_UNITS {
            return Err(RequestError::TooManyUnits {
                units,
                limit: MAX_UNITS,
            });
        }
        Ok(())
    }

    /// Number of `(year, point)` units the request expands to.
    pub fn unit_count(&self) -> usize {
        self.years.len().saturating_mul(self.points.points().len())
    }

    /// Builds a validated request from raw form parameters.
    ///
    /// `params.dataset` wins over `kind` when present. `table` supplies the
    /// rows when the coordinate mode is `excel` or `table`; it is ignored in
    /// `single` mode.
    pub fn from_params(
        params: &RequestParams,
        kind: DatasetKind,
        table: Option<Vec<DataPoint>>,
    ) -> Result<Self, RequestError> {
        let kind = match non_blank(&params.dataset) {
            Some(dataset) => dataset.parse()?,
            None => kind,
        };

        let coord_type = non_blank(&params.coord_type).ok_or(RequestError::MissingField("coordType"))?;
        let points = match coord_type.to_ascii_lowercase().as_str() {
            "single" => PointSelection::Single(DataPoint::new(
                parse_coordinate("latitude", &params.latitude)?,
                parse_coordinate("longitude", &params.longitude)?,
            )),
            "excel" | "table" => {
                PointSelection::Table(table.ok_or(RequestError::MissingCoordinateTable)?)
            }
            _ => {
                return Err(RequestError::UnknownMode {
                    field: "coordType",
                    value: coord_type.to_string(),
                })
            }
        };

        let year_type = non_blank(&params.year_type).ok_or(RequestError::MissingField("yearType"))?;
        let years = match year_type.to_ascii_lowercase().as_str() {
            "single" => YearSelection::Single(parse_year("year", &params.year)?),
            "range" => YearSelection::Range {
                start: parse_year("start_year", &params.start_year)?,
                end: parse_year("end_year", &params.end_year)?,
            },
            _ => {
                return Err(RequestError::UnknownMode {
                    field: "yearType",
                    value: year_type.to_string(),
                })
            }
        };

        let request = Self {
            kind,
            points,
            years,
        };
        request.validate()?;
        Ok(request)
    }
}

/// Request parameters as submitted by a form, all optional strings.
///
/// Field names follow the form: `coordType` (`single`, `excel` or `table`),
/// `yearType` (`single` or `range`), `latitude`, `longitude`, `year`,
/// `start_year`, `end_year` and an optional `dataset`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestParams {
    #[serde(rename = "coordType")]
    pub coord_type: Option<String>,
    #[serde(rename = "yearType")]
    pub year_type: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub year: Option<String>,
    pub start_year: Option<String>,
    pub end_year: Option<String>,
    pub dataset: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_coordinate(field: &'static str, value: &Option<String>) -> Result<f64, RequestError> {
    let raw = non_blank(value).ok_or(RequestError::MissingField(field))?;
    let parsed: f64 = raw.parse().map_err(|_| RequestError::NonNumeric {
        field,
        value: raw.to_string(),
    })?;
    if !parsed.is_finite() {
        return Err(RequestError::NonFiniteCoordinate {
            field,
            value: parsed,
            row: None,
        });
    }
    Ok(parsed)
}

fn parse_year(field: &'static str, value: &Option<String>) -> Result<i32, RequestError> {
    let raw = non_blank(value).ok_or(RequestError::MissingField(field))?;
    raw.parse().map_err(|_| RequestError::MalformedYear {
        field,
        value: raw.to_string(),
    })
}
