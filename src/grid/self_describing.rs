//! Decoder for self-describing gridded containers (the rainfall layout).
//!
//! Axes, time values and the data array are all read from the container.
//! CF conventions are honoured the way NetCDF readers apply them by default:
//! `_FillValue`, `missing_value` and NaN become missing observations, and
//! `scale_factor`/`add_offset` are applied to the remaining values.

use crate::grid::axis::GridAxis;
use crate::grid::container::GriddedContainer;
use crate::grid::decoded::DecodedGrid;
use crate::grid::error::GridError;
use crate::grid::time_axis::TimeAxis;
use crate::types::config::SelfDescribingLayout;
use crate::types::dataset_kind::DatasetKind;
use chrono::Datelike;
use log::debug;

pub fn decode_container<C: GriddedContainer + ?Sized>(
    container: &C,
    layout: &SelfDescribingLayout,
    kind: DatasetKind,
    year: i32,
) -> Result<DecodedGrid, GridError> {
    let latitudes = GridAxis::from_values(
        &layout.latitude_var,
        container.values(&layout.latitude_var)?,
    )?;
    let longitudes = GridAxis::from_values(
        &layout.longitude_var,
        container.values(&layout.longitude_var)?,
    )?;

    let units = container
        .text_attribute(&layout.time_var, "units")
        .ok_or_else(|| GridError::MissingAttribute {
            variable: layout.time_var.clone(),
            attribute: "units".to_string(),
        })?;
    let times = TimeAxis::from_offsets(&units, &container.values(&layout.time_var)?)?;
    if let Some(&first_date) = times.dates().first() {
        if first_date.year() != year {
            return Err(GridError::WrongYear { year, first_date });
        }
    }

    let expected = vec![times.len(), latitudes.len(), longitudes.len()];
    let found = container.shape(&layout.value_var)?;
    if found != expected {
        return Err(GridError::ShapeMismatch {
            variable: layout.value_var.clone(),
            expected,
            found,
        });
    }

    let packing = Packing::from_container(container, &layout.value_var);
    let values: Vec<Option<f32>> = container
        .values(&layout.value_var)?
        .into_iter()
        .map(|raw| packing.unpack(raw))
        .collect();

    debug!(
        "Decoded {} {} container: {} steps of {}x{} cells ({})",
        kind,
        year,
        times.len(),
        latitudes.len(),
        longitudes.len(),
        units
    );

    DecodedGrid::new(kind, year, latitudes, longitudes, times, values)
}

struct Packing {
    fill_value: Option<f64>,
    missing_value: Option<f64>,
    scale_factor: f64,
    add_offset: f64,
}

impl Packing {
    fn from_container<C: GriddedContainer + ?Sized>(container: &C, variable: &str) -> Self {
        Self {
            fill_value: container.numeric_attribute(variable, "_FillValue"),
            missing_value: container.numeric_attribute(variable, "missing_value"),
            scale_factor: container
                .numeric_attribute(variable, "scale_factor")
                .unwrap_or(1.0),
            add_offset: container
                .numeric_attribute(variable, "add_offset")
                .unwrap_or(0.0),
        }
    }

    // Fill comparison happens on the packed value, before scaling.
    fn unpack(&self, raw: f64) -> Option<f32> {
        if raw.is_nan() || Some(raw) == self.fill_value || Some(raw) == self.missing_value {
            return None;
        }
        let value = raw * self.scale_factor + self.add_offset;
        value.is_finite().then_some(value as f32)
    }
}
