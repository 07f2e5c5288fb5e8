//! Defines the kinds of gridded datasets the extractor understands.

use crate::batch::error::RequestError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The observation carried by a gridded source file.
///
/// The kind selects the on-disk layout of the source file (see [`crate::GridDecoder`])
/// and the name of the value column in exported tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    /// Daily rainfall, stored in a self-describing gridded container (NetCDF).
    Rainfall,
    /// Daily temperature, stored as a headerless flat binary grid of floats.
    Temperature,
}

impl DatasetKind {
    /// Name of the observed-value column in exported tables.
    ///
    /// # Examples
    ///
    /// ```
    /// use climgrid::DatasetKind;
    ///
    /// assert_eq!(DatasetKind::Rainfall.value_column(), "Rainfall");
    /// assert_eq!(DatasetKind::Temperature.value_column(), "Temperature");
    /// ```
    pub fn value_column(&self) -> &'static str {
        match self {
            DatasetKind::Rainfall => "Rainfall",
            DatasetKind::Temperature => "Temperature",
        }
    }

    pub(crate) fn path_segment(&self) -> &'static str {
        match self {
            DatasetKind::Rainfall => "rainfall",
            DatasetKind::Temperature => "temperature",
        }
    }
}

/// Formats the kind using its lowercase name.
///
/// ```
/// use climgrid::DatasetKind;
///
/// assert_eq!(DatasetKind::Temperature.to_string(), "temperature");
/// ```
impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

impl FromStr for DatasetKind {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rainfall" | "rain" => Ok(DatasetKind::Rainfall),
            "temperature" | "temp" => Ok(DatasetKind::Temperature),
            _ => Err(RequestError::UnknownMode {
                field: "dataset",
                value: s.to_string(),
            }),
        }
    }
}
