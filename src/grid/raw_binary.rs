//! Decoder for headerless flat binary grids.
//!
//! The payload is a bare run of floats laid out `days x lat x lon`, time
//! varying slowest. Everything else (shape, bounds, sentinel) comes from the
//! [`RawGridLayout`]; the day count is whatever the payload length implies.

use crate::grid::axis::GridAxis;
use crate::grid::decoded::DecodedGrid;
use crate::grid::error::GridError;
use crate::grid::time_axis::TimeAxis;
use crate::types::config::{ByteOrder, RawGridLayout, ValueType};
use crate::types::dataset_kind::DatasetKind;
use log::debug;

/// Decodes a fully buffered raw grid payload for `year`.
pub fn decode_raw_grid(
    bytes: &[u8],
    layout: &RawGridLayout,
    kind: DatasetKind,
    year: i32,
) -> Result<DecodedGrid, GridError> {
    let latitudes = GridAxis::linear("latitude", &layout.latitude)?;
    let longitudes = GridAxis::linear("longitude", &layout.longitude)?;

    let value_size = layout.value_type.size();
    if bytes.len() % value_size != 0 {
        return Err(GridError::TruncatedPayload {
            len: bytes.len(),
            value_size,
        });
    }

    let total_values = bytes.len() / value_size;
    let cells_per_day = layout.cells_per_day();
    if total_values % cells_per_day != 0 {
        return Err(GridError::NonIntegerDayCount {
            values: total_values,
            cells_per_day,
        });
    }
    let days = total_values / cells_per_day;
    if days == 0 {
        return Err(GridError::EmptyGrid);
    }

    let values: Vec<Option<f32>> = bytes
        .chunks_exact(value_size)
        .map(|chunk| read_value(chunk, layout))
        .collect();

    debug!(
        "Decoded {} {} raw grid: {} days of {}x{} cells, {} missing",
        kind,
        year,
        days,
        latitudes.len(),
        longitudes.len(),
        values.iter().filter(|v| v.is_none()).count()
    );

    let times = TimeAxis::daily_from_year(year, days)?;
    DecodedGrid::new(kind, year, latitudes, longitudes, times, values)
}

fn read_value(chunk: &[u8], layout: &RawGridLayout) -> Option<f32> {
    match layout.value_type {
        ValueType::Float32 => {
            let raw: [u8; 4] = chunk.try_into().ok()?;
            let value = match layout.byte_order {
                ByteOrder::Little => f32::from_le_bytes(raw),
                ByteOrder::Big => f32::from_be_bytes(raw),
            };
            let is_sentinel = layout.sentinel.is_some_and(|s| value == s as f32);
            (!is_sentinel && !value.is_nan()).then_some(value)
        }
        ValueType::Float64 => {
            let raw: [u8; 8] = chunk.try_into().ok()?;
            let value = match layout.byte_order {
                ByteOrder::Little => f64::from_le_bytes(raw),
                ByteOrder::Big => f64::from_be_bytes(raw),
            };
            let is_sentinel = layout.sentinel.is_some_and(|s| value == s);
            (!is_sentinel && !value.is_nan()).then_some(value as f32)
        }
    }
}
