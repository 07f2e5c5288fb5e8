use crate::types::selection::{PointSelection, YearSelection};
use crate::types::series::UnitKey;

/// Expands a request into its `(year, point)` units in output order.
///
/// Years ascend in the outer loop and points follow table row order in the
/// inner loop, so every point of a year comes before the next year. The
/// single-point and single-year cases fall out as degenerate loops.
///
/// # Examples
///
/// ```
/// use climgrid::{enumerate_units, DataPoint, PointSelection, YearSelection};
///
/// let points = PointSelection::Table(vec![DataPoint::new(1.0, 2.0), DataPoint::new(3.0, 4.0)]);
/// let units = enumerate_units(&points, &YearSelection::from(2001..=2002));
///
/// let order: Vec<_> = units.iter().map(|u| (u.year, u.point.latitude)).collect();
/// assert_eq!(order, vec![(2001, 1.0), (2001, 3.0), (2002, 1.0), (2002, 3.0)]);
/// ```
pub fn enumerate_units(points: &PointSelection, years: &YearSelection) -> Vec<UnitKey> {
    years
        .years()
        .flat_map(|year| points.points().iter().map(move |&point| (year, point)))
        .enumerate()
        .map(|(ordinal, (year, point))| UnitKey {
            ordinal,
            year,
            point,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::data_point::DataPoint;

    fn keys(units: &[UnitKey]) -> Vec<(i32, DataPoint)> {
        units.iter().map(|u| (u.year, u.point)).collect()
    }

    #[test]
    fn single_point_single_year() {
        let p = DataPoint::new(19.0, 73.0);
        let units = enumerate_units(&p.into(), &2015.into());
        assert_eq!(keys(&units), vec![(2015, p)]);
        assert_eq!(units[0].ordinal, 0);
    }

    #[test]
    fn single_point_year_range_ascends() {
        let p = DataPoint::new(19.0, 73.0);
        let units = enumerate_units(&p.into(), &(2010..=2012).into());
        assert_eq!(keys(&units), vec![(2010, p), (2011, p), (2012, p)]);
    }

    #[test]
    fn table_single_year_follows_row_order() {
        let rows = vec![
            DataPoint::new(3.0, 3.0),
            DataPoint::new(1.0, 1.0),
            DataPoint::new(2.0, 2.0),
        ];
        let units = enumerate_units(&rows.clone().into(), &2001.into());
        assert_eq!(
            keys(&units),
            rows.into_iter().map(|p| (2001, p)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn table_year_range_is_year_outer_point_inner() {
        let p1 = DataPoint::new(10.0, 70.0);
        let p2 = DataPoint::new(20.0, 80.0);
        let units = enumerate_units(&vec![p1, p2].into(), &(2001..=2002).into());
        assert_eq!(
            keys(&units),
            vec![(2001, p1), (2001, p2), (2002, p1), (2002, p2)]
        );
        assert_eq!(
            units.iter().map(|u| u.ordinal).collect::<Vec<_>>(),
            vec![0, 1, 2, 3]
        );
    }
}
