use crate::grid::container::GriddedContainer;
use crate::grid::error::GridError;
use std::path::{Path, PathBuf};

/// A NetCDF file opened through the system netCDF library.
pub struct NetcdfContainer {
    path: PathBuf,
    file: netcdf::File,
}

impl NetcdfContainer {
    pub fn open(path: &Path) -> Result<Self, GridError> {
        let file = netcdf::open(path).map_err(|e| GridError::Container {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    fn variable(&self, name: &str) -> Result<netcdf::Variable<'_>, GridError> {
        self.file
            .variable(name)
            .ok_or_else(|| GridError::MissingVariable(name.to_string()))
    }
}

impl GriddedContainer for NetcdfContainer {
    fn shape(&self, variable: &str) -> Result<Vec<usize>, GridError> {
        Ok(self
            .variable(variable)?
            .dimensions()
            .iter()
            .map(|d| d.len())
            .collect())
    }

    fn values(&self, variable: &str) -> Result<Vec<f64>, GridError> {
        self.variable(variable)?
            .get_values::<f64, _>(..)
            .map_err(|e| GridError::Container {
                path: self.path.clone(),
                message: format!("reading '{}': {}", variable, e),
            })
    }

    fn text_attribute(&self, variable: &str, attribute: &str) -> Option<String> {
        match self.variable(variable).ok()?.attribute_value(attribute)?.ok()? {
            netcdf::AttributeValue::Str(text) => Some(text),
            _ => None,
        }
    }

    fn numeric_attribute(&self, variable: &str, attribute: &str) -> Option<f64> {
        match self.variable(variable).ok()?.attribute_value(attribute)?.ok()? {
            netcdf::AttributeValue::Double(d) => Some(d),
            netcdf::AttributeValue::Float(f) => Some(f as f64),
            netcdf::AttributeValue::Int(i) => Some(i as f64),
            netcdf::AttributeValue::Short(s) => Some(s as f64),
            netcdf::AttributeValue::Schar(b) => Some(b as f64),
            netcdf::AttributeValue::Uchar(b) => Some(b as f64),
            netcdf::AttributeValue::Ushort(s) => Some(s as f64),
            netcdf::AttributeValue::Uint(i) => Some(i as f64),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::extract::extractor::SeriesExtractor;
    use crate::grid::decoder::GridDecoder;
    use crate::types::config::ClimGridConfig;
    use crate::types::data_point::DataPoint;
    use crate::types::dataset_kind::DatasetKind;
    use chrono::NaiveDate;
    use std::path::Path;

    const FILL: f64 = -999.0;
    const DAYS: usize = 365;

    fn rainfall(d: usize, i: usize, j: usize) -> f64 {
        d as f64 + i as f64 * 0.1 + j as f64 * 0.01
    }

    /// 5 x 5 cells around (19.0, 73.0). Cell `(i, j)` on day `d` holds
    /// `d + i * 0.1 + j * 0.01`, except the centre cell on days 0 and 200.
    fn write_rainfall(path: &Path) {
        let lats: Vec<f64> = (0..5).map(|i| 18.5 + 0.25 * i as f64).collect();
        let lons: Vec<f64> = (0..5).map(|j| 72.5 + 0.25 * j as f64).collect();
        let times: Vec<f64> = (0..DAYS).map(|d| 42003.0 + d as f64).collect();
        let mut data = Vec::with_capacity(DAYS * 25);
        for d in 0..DAYS {
            for i in 0..5 {
                for j in 0..5 {
                    let missing = i == 2 && j == 2 && (d == 0 || d == 200);
                    data.push(if missing { FILL } else { rainfall(d, i, j) });
                }
            }
        }

        let mut file = netcdf::create(path).unwrap();
        file.add_dimension("LATITUDE", 5).unwrap();
        file.add_dimension("LONGITUDE", 5).unwrap();
        file.add_dimension("TIME", DAYS).unwrap();
        {
            let mut var = file.add_variable::<f64>("LATITUDE", &["LATITUDE"]).unwrap();
            var.put_attribute("units", "degrees_north").unwrap();
            var.put_values(&lats, ..).unwrap();
        }
        {
            let mut var = file.add_variable::<f64>("LONGITUDE", &["LONGITUDE"]).unwrap();
            var.put_attribute("units", "degrees_east").unwrap();
            var.put_values(&lons, ..).unwrap();
        }
        {
            let mut var = file.add_variable::<f64>("TIME", &["TIME"]).unwrap();
            var.put_attribute("units", "days since 1900-01-01").unwrap();
            var.put_values(&times, ..).unwrap();
        }
        {
            let mut var = file
                .add_variable::<f64>("RAINFALL", &["TIME", "LATITUDE", "LONGITUDE"])
                .unwrap();
            var.put_attribute("units", "mm").unwrap();
            var.put_attribute("_FillValue", FILL).unwrap();
            var.put_values(&data, ..).unwrap();
        }
    }

    #[test]
    fn extracts_a_full_year_from_a_netcdf_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rainfall_2015.nc");
        write_rainfall(&path);

        let config = ClimGridConfig::builder().data_dir(dir.path()).build();
        let grid = GridDecoder::for_kind(DatasetKind::Rainfall, &config)
            .decode_file(DatasetKind::Rainfall, 2015, &path)
            .unwrap();
        assert_eq!(grid.shape(), (DAYS, 5, 5));

        let series = SeriesExtractor::new(&grid).extract(DataPoint::new(19.0, 73.0));
        assert_eq!(series.len(), 365);
        assert_eq!(series.year, 2015);
        assert_eq!(
            series.rows.first().unwrap().date,
            NaiveDate::from_ymd_opt(2015, 1, 1).unwrap()
        );
        assert_eq!(
            series.rows.last().unwrap().date,
            NaiveDate::from_ymd_opt(2015, 12, 31).unwrap()
        );
        assert!(series
            .rows
            .iter()
            .all(|row| row.latitude == 19.0 && row.longitude == 73.0));

        assert_eq!(series.rows[0].value, None);
        assert_eq!(series.rows[200].value, None);
        assert_eq!(series.rows[1].value, Some(rainfall(1, 2, 2) as f32));
        assert_eq!(series.rows[364].value, Some(rainfall(364, 2, 2) as f32));
        assert_eq!(series.observed_count(), 363);
    }

    #[test]
    fn missing_variable_is_reported_by_name() {
        use super::NetcdfContainer;
        use crate::grid::container::GriddedContainer;
        use crate::grid::error::GridError;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rainfall_2015.nc");
        write_rainfall(&path);

        let container = NetcdfContainer::open(&path).unwrap();
        assert_eq!(container.shape("RAINFALL").unwrap(), vec![DAYS, 5, 5]);
        assert_eq!(
            container.text_attribute("TIME", "units").as_deref(),
            Some("days since 1900-01-01")
        );
        assert_eq!(container.numeric_attribute("RAINFALL", "_FillValue"), Some(FILL));
        assert!(matches!(
            container.values("PRECIP"),
            Err(GridError::MissingVariable(name)) if name == "PRECIP"
        ));
    }
}
