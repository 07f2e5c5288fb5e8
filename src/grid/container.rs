//! Read access to self-describing gridded containers.
//!
//! The rainfall decoder is written against [`GriddedContainer`] so the same
//! logic serves NetCDF files (behind the `netcdf` feature) and arrays that a
//! caller already holds in memory.

use crate::grid::error::GridError;
use std::collections::HashMap;

pub trait GriddedContainer {
    /// Dimension lengths of a variable, outermost first.
    fn shape(&self, variable: &str) -> Result<Vec<usize>, GridError>;

    /// All values of a variable flattened in row-major order.
    fn values(&self, variable: &str) -> Result<Vec<f64>, GridError>;

    fn text_attribute(&self, variable: &str, attribute: &str) -> Option<String>;

    fn numeric_attribute(&self, variable: &str, attribute: &str) -> Option<f64>;
}

#[derive(Debug, Clone, PartialEq)]
enum MemoryAttribute {
    Text(String),
    Number(f64),
}

#[derive(Debug, Clone, PartialEq)]
struct MemoryVariable {
    shape: Vec<usize>,
    values: Vec<f64>,
    attributes: HashMap<String, MemoryAttribute>,
}

/// A container held entirely in memory.
///
/// # Examples
///
/// ```
/// use climgrid::{GriddedContainer, MemoryContainer};
///
/// let container = MemoryContainer::new()
///     .with_variable("TIME", vec![2], vec![0.0, 1.0])
///     .with_text_attribute("TIME", "units", "days since 2015-01-01");
///
/// assert_eq!(container.shape("TIME").unwrap(), vec![2]);
/// assert_eq!(
///     container.text_attribute("TIME", "units").as_deref(),
///     Some("days since 2015-01-01")
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryContainer {
    variables: HashMap<String, MemoryVariable>,
}

impl MemoryContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, name: &str, shape: Vec<usize>, values: Vec<f64>) -> Self {
        self.variables.insert(
            name.to_string(),
            MemoryVariable {
                shape,
                values,
                attributes: HashMap::new(),
            },
        );
        self
    }

    /// Attributes on unknown variables are ignored.
    pub fn with_text_attribute(mut self, variable: &str, attribute: &str, value: &str) -> Self {
        if let Some(var) = self.variables.get_mut(variable) {
            var.attributes.insert(
                attribute.to_string(),
                MemoryAttribute::Text(value.to_string()),
            );
        }
        self
    }

    pub fn with_numeric_attribute(mut self, variable: &str, attribute: &str, value: f64) -> Self {
        if let Some(var) = self.variables.get_mut(variable) {
            var.attributes
                .insert(attribute.to_string(), MemoryAttribute::Number(value));
        }
        self
    }

    fn variable(&self, name: &str) -> Result<&MemoryVariable, GridError> {
        self.variables
            .get(name)
            .ok_or_else(|| GridError::MissingVariable(name.to_string()))
    }
}

impl GriddedContainer for MemoryContainer {
    fn shape(&self, variable: &str) -> Result<Vec<usize>, GridError> {
        Ok(self.variable(variable)?.shape.clone())
    }

    fn values(&self, variable: &str) -> Result<Vec<f64>, GridError> {
        Ok(self.variable(variable)?.values.clone())
    }

    fn text_attribute(&self, variable: &str, attribute: &str) -> Option<String> {
        match self.variables.get(variable)?.attributes.get(attribute)? {
            MemoryAttribute::Text(text) => Some(text.clone()),
            MemoryAttribute::Number(_) => None,
        }
    }

    fn numeric_attribute(&self, variable: &str, attribute: &str) -> Option<f64> {
        match self.variables.get(variable)?.attributes.get(attribute)? {
            MemoryAttribute::Number(value) => Some(*value),
            MemoryAttribute::Text(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_variable_is_reported_by_name() {
        let err = MemoryContainer::new().values("RAINFALL").unwrap_err();
        assert!(matches!(err, GridError::MissingVariable(name) if name == "RAINFALL"));
    }

    #[test]
    fn attributes_are_typed() {
        let container = MemoryContainer::new()
            .with_variable("RAINFALL", vec![1], vec![0.0])
            .with_numeric_attribute("RAINFALL", "_FillValue", -999.0)
            .with_text_attribute("RAINFALL", "units", "mm");

        assert_eq!(container.numeric_attribute("RAINFALL", "_FillValue"), Some(-999.0));
        assert_eq!(container.text_attribute("RAINFALL", "_FillValue"), None);
        assert_eq!(container.numeric_attribute("RAINFALL", "units"), None);
        assert_eq!(container.numeric_attribute("OTHER", "_FillValue"), None);
    }
}
