//! Dataset layouts and client configuration.
//!
//! The raw temperature grids carry no header, so their shape, axis bounds and
//! missing-value sentinel must be supplied here. The self-describing rainfall
//! grids only need the names of their variables.

use crate::error::ClimGridError;
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// An evenly spaced coordinate axis, inclusive on both ends.
///
/// Equivalent to `count` samples between `start` and `end`, like
/// `numpy.linspace(start, end, count)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl AxisSpec {
    pub fn new(start: f64, end: f64, count: usize) -> Self {
        Self { start, end, count }
    }
}

/// Storage type of each value in a raw grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Float32,
    Float64,
}

impl ValueType {
    pub fn size(&self) -> usize {
        match self {
            ValueType::Float32 => 4,
            ValueType::Float64 => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    Little,
    Big,
}

/// Layout of a headerless flat binary grid: `days x latitudes x longitudes`
/// values in row-major order, time varying slowest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[serde(default)]
pub struct RawGridLayout {
    pub latitude: AxisSpec,
    pub longitude: AxisSpec,
    #[builder(default = ValueType::Float32)]
    pub value_type: ValueType,
    #[builder(default = ByteOrder::Little)]
    pub byte_order: ByteOrder,
    /// Value marking a missing observation, compared in storage precision.
    pub sentinel: Option<f64>,
    /// File name with a `{year}` placeholder.
    #[builder(into)]
    pub file_name: String,
}

impl Default for RawGridLayout {
    /// The 1-degree daily maximum temperature grid over India.
    fn default() -> Self {
        Self {
            latitude: AxisSpec::new(7.5, 37.5, 31),
            longitude: AxisSpec::new(67.5, 97.5, 31),
            value_type: ValueType::Float32,
            byte_order: ByteOrder::Little,
            sentinel: Some(99.9),
            file_name: "Maxtemp_MaxT_{year}.GRD".to_string(),
        }
    }
}

impl RawGridLayout {
    /// Number of values in one daily layer.
    pub fn cells_per_day(&self) -> usize {
        self.latitude.count * self.longitude.count
    }
}

/// Variable names inside a self-describing gridded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[serde(default)]
pub struct SelfDescribingLayout {
    #[builder(into)]
    pub latitude_var: String,
    #[builder(into)]
    pub longitude_var: String,
    /// The `[time, lat, lon]` data variable.
    #[builder(into)]
    pub value_var: String,
    /// Offsets from the epoch named by this variable's `units` attribute.
    #[builder(into)]
    pub time_var: String,
    /// File name with a `{year}` placeholder.
    #[builder(into)]
    pub file_name: String,
}

impl Default for SelfDescribingLayout {
    /// The 0.25-degree daily rainfall grid over India.
    fn default() -> Self {
        Self {
            latitude_var: "LATITUDE".to_string(),
            longitude_var: "LONGITUDE".to_string(),
            value_var: "RAINFALL".to_string(),
            time_var: "TIME".to_string(),
            file_name: "rainfall_{year}.nc".to_string(),
        }
    }
}

/// Configuration for a [`crate::ClimGrid`] client.
///
/// # Examples
///
/// ```
/// use climgrid::ClimGridConfig;
///
/// let config = ClimGridConfig::builder()
///     .data_dir("/srv/grids")
///     .max_concurrency(4)
///     .build();
/// assert_eq!(config.max_concurrency, 4);
/// assert_eq!(config.temperature.latitude.count, 31);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct ClimGridConfig {
    /// Directory holding the source grid files.
    #[builder(into)]
    pub data_dir: PathBuf,
    #[serde(default)]
    #[builder(default)]
    pub rainfall: SelfDescribingLayout,
    #[serde(default)]
    #[builder(default)]
    pub temperature: RawGridLayout,
    /// Upper bound on units extracted concurrently. A year's grid is dropped
    /// once its last point is extracted, so at most this many years are held
    /// in memory at once.
    #[serde(default = "default_max_concurrency")]
    #[builder(default = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,
}

fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

impl ClimGridConfig {
    /// Loads a configuration from a JSON file. Only `data_dir` is required.
    pub fn from_json_file(path: &Path) -> Result<Self, ClimGridError> {
        let bytes =
            std::fs::read(path).map_err(|e| ClimGridError::ConfigRead(path.to_path_buf(), e))?;
        serde_json::from_slice(&bytes).map_err(|e| ClimGridError::ConfigParse(path.to_path_buf(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn json_config_falls_back_to_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "data_dir": "/data/grids", "temperature": {{ "sentinel": -999.0 }} }}"#
        )
        .unwrap();

        let config = ClimGridConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/data/grids"));
        assert_eq!(config.max_concurrency, DEFAULT_MAX_CONCURRENCY);
        assert_eq!(config.temperature.sentinel, Some(-999.0));
        assert_eq!(config.temperature.latitude, AxisSpec::new(7.5, 37.5, 31));
        assert_eq!(config.rainfall.value_var, "RAINFALL");
    }

    #[test]
    fn json_config_requires_data_dir() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_concurrency": 2 }}"#).unwrap();

        let err = ClimGridConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, ClimGridError::ConfigParse(..)));
    }

    #[test]
    fn raw_layout_builder_defaults_storage_type() {
        let layout = RawGridLayout::builder()
            .latitude(AxisSpec::new(0.0, 1.0, 2))
            .longitude(AxisSpec::new(0.0, 2.0, 3))
            .file_name("t_{year}.bin")
            .build();
        assert_eq!(layout.value_type, ValueType::Float32);
        assert_eq!(layout.byte_order, ByteOrder::Little);
        assert_eq!(layout.sentinel, None);
        assert_eq!(layout.cells_per_day(), 6);
    }
}
