//! Point and year selections that make up a batch request.

use crate::batch::error::RequestError;
use crate::types::data_point::DataPoint;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Which points a request covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointSelection {
    /// One explicitly given point.
    Single(DataPoint),
    /// Points from a coordinate table, in table row order.
    Table(Vec<DataPoint>),
}

impl PointSelection {
    /// The selected points in enumeration order.
    pub fn points(&self) -> &[DataPoint] {
        match self {
            PointSelection::Single(point) => std::slice::from_ref(point),
            PointSelection::Table(points) => points,
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self, PointSelection::Table(_))
    }

    pub(crate) fn validate(&self) -> Result<(), RequestError> {
        match self {
            PointSelection::Single(point) => point.validate(None),
            PointSelection::Table(points) => {
                if points.is_empty() {
                    return Err(RequestError::EmptyCoordinateTable);
                }
                points
                    .iter()
                    .enumerate()
                    .try_for_each(|(row, point)| point.validate(Some(row)))
            }
        }
    }
}

impl From<DataPoint> for PointSelection {
    fn from(point: DataPoint) -> Self {
        PointSelection::Single(point)
    }
}

impl From<Vec<DataPoint>> for PointSelection {
    fn from(points: Vec<DataPoint>) -> Self {
        PointSelection::Table(points)
    }
}

/// Which years a request covers.
///
/// # Examples
///
/// ```
/// use climgrid::YearSelection;
///
/// let range = YearSelection::from(2010..=2012);
/// assert_eq!(range.years().collect::<Vec<_>>(), vec![2010, 2011, 2012]);
///
/// let single = YearSelection::from(2015);
/// assert_eq!(single.years().count(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YearSelection {
    Single(i32),
    /// Inclusive on both ends.
    Range { start: i32, end: i32 },
}

impl YearSelection {
    /// Years in ascending order.
    pub fn years(&self) -> RangeInclusive<i32> {
        match *self {
            YearSelection::Single(year) => year..=year,
            YearSelection::Range { start, end } => start..=end,
        }
    }

    /// Number of years selected; zero for a reversed range.
    pub fn len(&self) -> usize {
        match *self {
            YearSelection::Single(_) => 1,
            YearSelection::Range { start, end } => {
                (i64::from(end) - i64::from(start) + 1).max(0) as usize
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_range(&self) -> bool {
        matches!(self, YearSelection::Range { .. })
    }

    /// Rejects reversed ranges and years without a calendar date.
    pub(crate) fn validate(&self) -> Result<(), RequestError> {
        let (start, end) = match *self {
            YearSelection::Single(year) => (year, year),
            YearSelection::Range { start, end } => (start, end),
        };
        for year in [start, end] {
            if NaiveDate::from_ymd_opt(year, 1, 1).is_none() {
                return Err(RequestError::YearOutOfRange { year });
            }
        }
        if start > end {
            return Err(RequestError::ReversedYearRange { start, end });
        }
        Ok(())
    }
}

impl From<i32> for YearSelection {
    fn from(year: i32) -> Self {
        YearSelection::Single(year)
    }
}

impl From<RangeInclusive<i32>> for YearSelection {
    fn from(range: RangeInclusive<i32>) -> Self {
        YearSelection::Range {
            start: *range.start(),
            end: *range.end(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversed_range_is_invalid() {
        let years = YearSelection::Range {
            start: 2012,
            end: 2010,
        };
        assert!(matches!(
            years.validate(),
            Err(RequestError::ReversedYearRange {
                start: 2012,
                end: 2010
            })
        ));
    }

    #[test]
    fn years_beyond_the_calendar_are_invalid() {
        let years = YearSelection::Range {
            start: -2_000_000_000,
            end: 2_000_000_000,
        };
        assert!(matches!(
            years.validate(),
            Err(RequestError::YearOutOfRange {
                year: -2_000_000_000
            })
        ));
        assert!(YearSelection::Single(i32::MAX).validate().is_err());
        assert!(YearSelection::Single(1901).validate().is_ok());
    }

    #[test]
    fn counts_years_without_iterating() {
        assert_eq!(YearSelection::from(2010..=2012).len(), 3);
        assert_eq!(YearSelection::Single(2015).len(), 1);
        assert_eq!(
            YearSelection::Range {
                start: i32::MIN,
                end: i32::MAX
            }
            .len(),
            1 << 32
        );
        assert!(YearSelection::Range {
            start: 2012,
            end: 2010
        }
        .is_empty());
    }

    #[test]
    fn empty_table_is_invalid() {
        let points = PointSelection::Table(vec![]);
        assert!(matches!(
            points.validate(),
            Err(RequestError::EmptyCoordinateTable)
        ));
    }

    #[test]
    fn single_point_exposes_one_point() {
        let points = PointSelection::from(DataPoint::new(19.0, 73.0));
        assert_eq!(points.points(), &[DataPoint::new(19.0, 73.0)]);
        assert!(!points.is_table());
    }
}
