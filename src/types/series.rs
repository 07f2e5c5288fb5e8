//! Extracted series and the ordered collection a batch produces.

use crate::export::naming::unit_identifier;
use crate::types::data_point::DataPoint;
use crate::types::dataset_kind::DatasetKind;
use chrono::NaiveDate;
use std::collections::HashMap;

/// One row of an extracted series.
///
/// `latitude` and `longitude` are the query coordinates as the caller gave
/// them, not the coordinates of the grid cell the query resolved to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesRow {
    pub date: NaiveDate,
    pub latitude: f64,
    pub longitude: f64,
    /// `None` where the source marks the observation as missing.
    pub value: Option<f32>,
}

/// The full time series for one (point, year, kind) unit.
///
/// Holds exactly one row per entry of the source grid's time axis.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesResult {
    pub kind: DatasetKind,
    pub year: i32,
    pub point: DataPoint,
    pub rows: Vec<SeriesRow>,
}

impl SeriesResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows carrying an observation.
    pub fn observed_count(&self) -> usize {
        self.rows.iter().filter(|row| row.value.is_some()).count()
    }
}

/// Position of a unit within a batch enumeration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitKey {
    /// Zero-based position in enumeration order.
    pub ordinal: usize,
    pub year: i32,
    pub point: DataPoint,
}

/// A successfully extracted unit, tagged with its identifier.
#[derive(Debug, Clone)]
pub struct BatchUnit {
    /// `{year}_{latitude}_{longitude}`, suffixed with `_{n}` when the same
    /// identifier already occurs earlier in the batch.
    pub id: String,
    pub key: UnitKey,
    pub series: SeriesResult,
}

/// Ordered mapping from unit identifier to extracted series.
///
/// Iteration order is enumeration order; units that failed to extract are
/// simply absent.
#[derive(Debug, Clone)]
pub struct BatchResult {
    kind: DatasetKind,
    units: Vec<BatchUnit>,
    seen_ids: HashMap<String, usize>,
}

impl BatchResult {
    pub fn new(kind: DatasetKind) -> Self {
        Self {
            kind,
            units: Vec::new(),
            seen_ids: HashMap::new(),
        }
    }

    /// Appends a unit, never replacing one that is already present.
    pub fn push(&mut self, key: UnitKey, series: SeriesResult) -> &BatchUnit {
        let base = unit_identifier(key.year, &key.point);
        let occurrences = self.seen_ids.entry(base.clone()).or_insert(0);
        *occurrences += 1;
        let id = if *occurrences == 1 {
            base
        } else {
            format!("{}_{}", base, occurrences)
        };

        self.units.push(BatchUnit { id, key, series });
        &self.units[self.units.len() - 1]
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn total_rows(&self) -> usize {
        self.units.iter().map(|unit| unit.series.len()).sum()
    }

    pub fn get(&self, id: &str) -> Option<&SeriesResult> {
        self.units
            .iter()
            .find(|unit| unit.id == id)
            .map(|unit| &unit.series)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(|unit| unit.id.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BatchUnit> {
        self.units.iter()
    }

    pub fn into_units(self) -> Vec<BatchUnit> {
        self.units
    }
}

impl<'a> IntoIterator for &'a BatchResult {
    type Item = &'a BatchUnit;
    type IntoIter = std::slice::Iter<'a, BatchUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(year: i32, point: DataPoint, days: u32) -> SeriesResult {
        let rows = (1..=days)
            .map(|day| SeriesRow {
                date: NaiveDate::from_ymd_opt(year, 1, day).unwrap(),
                latitude: point.latitude,
                longitude: point.longitude,
                value: Some(day as f32),
            })
            .collect();
        SeriesResult {
            kind: DatasetKind::Temperature,
            year,
            point,
            rows,
        }
    }

    #[test]
    fn keeps_insertion_order_and_counts_rows() {
        let p1 = DataPoint::new(19.0, 73.0);
        let p2 = DataPoint::new(20.5, 74.25);
        let mut batch = BatchResult::new(DatasetKind::Temperature);
        batch.push(UnitKey { ordinal: 0, year: 2001, point: p1 }, series(2001, p1, 3));
        batch.push(UnitKey { ordinal: 1, year: 2001, point: p2 }, series(2001, p2, 2));

        assert_eq!(
            batch.ids().collect::<Vec<_>>(),
            vec!["2001_19.0_73.0", "2001_20.5_74.25"]
        );
        assert_eq!(batch.total_rows(), 5);
        assert_eq!(batch.get("2001_20.5_74.25").unwrap().len(), 2);
    }

    #[test]
    fn repeated_identifiers_are_suffixed_not_replaced() {
        let p = DataPoint::new(19.0, 73.0);
        let mut batch = BatchResult::new(DatasetKind::Rainfall);
        batch.push(UnitKey { ordinal: 0, year: 2015, point: p }, series(2015, p, 1));
        batch.push(UnitKey { ordinal: 1, year: 2015, point: p }, series(2015, p, 2));
        batch.push(UnitKey { ordinal: 2, year: 2015, point: p }, series(2015, p, 3));

        assert_eq!(
            batch.ids().collect::<Vec<_>>(),
            vec!["2015_19.0_73.0", "2015_19.0_73.0_2", "2015_19.0_73.0_3"]
        );
        assert_eq!(batch.total_rows(), 6);
    }
}
