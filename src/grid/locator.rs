//! Mapping `(kind, year)` to a source file on disk.

use crate::grid::error::GridError;
use crate::types::config::ClimGridConfig;
use crate::types::dataset_kind::DatasetKind;
use log::{debug, trace};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub trait FileLocator: Send + Sync {
    /// Returns the file holding `year` of `kind`, or
    /// [`GridError::SourceNotFound`].
    fn locate(&self, kind: DatasetKind, year: i32) -> Result<PathBuf, GridError>;
}

/// Finds files in one directory.
///
/// The configured name template (`{year}` substituted) is tried first. For
/// rainfall, when that file does not exist, the directory is scanned in name
/// order for the first file that carries the year as a whole number (no
/// digit directly before or after it) and has the template's extension,
/// ignoring case. Raw temperature grids are located by template name only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryLocator {
    dir: PathBuf,
    rainfall_template: String,
    temperature_template: String,
}

impl DirectoryLocator {
    pub fn new(
        dir: impl Into<PathBuf>,
        rainfall_template: impl Into<String>,
        temperature_template: impl Into<String>,
    ) -> Self {
        Self {
            dir: dir.into(),
            rainfall_template: rainfall_template.into(),
            temperature_template: temperature_template.into(),
        }
    }

    pub fn from_config(config: &ClimGridConfig) -> Self {
        Self::new(
            &config.data_dir,
            &config.rainfall.file_name,
            &config.temperature.file_name,
        )
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn template(&self, kind: DatasetKind) -> &str {
        match kind {
            DatasetKind::Rainfall => &self.rainfall_template,
            DatasetKind::Temperature => &self.temperature_template,
        }
    }

    fn scans_directory(kind: DatasetKind) -> bool {
        matches!(kind, DatasetKind::Rainfall)
    }

    fn scan(&self, extension: Option<&str>, year: i32) -> Option<PathBuf> {
        let year = year.to_string();
        let mut candidates: Vec<PathBuf> = std::fs::read_dir(&self.dir)
            .ok()?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                let name_matches = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| contains_year(n, &year));
                let ext = path.extension().and_then(|e| e.to_str());
                let ext_matches = match (extension, ext) {
                    (Some(wanted), Some(found)) => wanted.eq_ignore_ascii_case(found),
                    (None, None) => true,
                    _ => false,
                };
                name_matches && ext_matches
            })
            .collect();
        candidates.sort();
        candidates.into_iter().next()
    }
}

impl FileLocator for DirectoryLocator {
    fn locate(&self, kind: DatasetKind, year: i32) -> Result<PathBuf, GridError> {
        let template = self.template(kind);
        let expected = self.dir.join(template.replace("{year}", &year.to_string()));
        if expected.is_file() {
            trace!("Located {} {} at {}", kind, year, expected.display());
            return Ok(expected);
        }

        let extension = Path::new(template).extension().and_then(|e| e.to_str());
        let scanned = if Self::scans_directory(kind) {
            self.scan(extension, year)
        } else {
            None
        };
        match scanned {
            Some(found) => {
                debug!(
                    "{} not found, using {} for {} {}",
                    expected.display(),
                    found.display(),
                    kind,
                    year
                );
                Ok(found)
            }
            None => Err(GridError::SourceNotFound {
                kind,
                year,
                path: Some(expected),
            }),
        }
    }
}

/// True when `year` appears in `name` as a complete run of digits.
fn contains_year(name: &str, year: &str) -> bool {
    name.split(|c: char| !c.is_ascii_digit())
        .any(|digits| digits == year)
}

/// Locates files from an explicit `(kind, year)` table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticLocator {
    files: HashMap<(DatasetKind, i32), PathBuf>,
}

impl StaticLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, kind: DatasetKind, year: i32, path: impl Into<PathBuf>) -> Self {
        self.files.insert((kind, year), path.into());
        self
    }
}

impl FileLocator for StaticLocator {
    fn locate(&self, kind: DatasetKind, year: i32) -> Result<PathBuf, GridError> {
        self.files
            .get(&(kind, year))
            .cloned()
            .ok_or(GridError::SourceNotFound {
                kind,
                year,
                path: None,
            })
    }
}
