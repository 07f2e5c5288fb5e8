//! Writing assembled exports to disk.

use crate::export::assembler::{AssembledExport, ExportLayout, ExportTable};
use crate::export::error::ExportError;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::info;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};
use tokio::{fs, task};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    /// Snappy-compressed Parquet.
    Parquet,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Parquet => "parquet",
        }
    }

    fn encode(&self, table: &ExportTable) -> Result<Vec<u8>, ExportError> {
        let mut frame = table.frame.clone();
        let mut buffer = Vec::new();
        let result = match self {
            ExportFormat::Csv => CsvWriter::new(&mut buffer)
                .include_header(true)
                .finish(&mut frame),
            ExportFormat::Parquet => ParquetWriter::new(&mut buffer)
                .with_compression(ParquetCompression::Snappy)
                .finish(&mut frame)
                .map(|_| ()),
        };
        result.map_err(|source| ExportError::Encode {
            table: table.name.clone(),
            format: self.extension(),
            source,
        })?;
        Ok(buffer)
    }
}

/// Writes `export` under `destination` and returns the artifact's path.
///
/// - A merged export becomes `{stem}.{ext}`.
/// - A per-unit export becomes `{stem}.tar.gz` holding `{unit}.{ext}` files
///   when `bundle` is set, otherwise a `{stem}/` directory of those files.
///
/// Every artifact is written to a temporary sibling and renamed into place
/// once complete, so an artifact at the returned path is never partial.
/// Existing artifacts with the same name are replaced; a replaced directory
/// keeps none of its old files.
pub async fn write_export(
    export: AssembledExport,
    destination: &Path,
    format: ExportFormat,
    bundle: bool,
) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(destination)
        .await
        .map_err(|e| ExportError::DestinationCreation(destination.to_path_buf(), e))?;
    let destination = destination.to_path_buf();

    let artifact = task::spawn_blocking(move || {
        write_blocking(&export, &destination, format, bundle)
    })
    .await??;

    info!("Wrote export to {}", artifact.display());
    Ok(artifact)
}

fn write_blocking(
    export: &AssembledExport,
    destination: &Path,
    format: ExportFormat,
    bundle: bool,
) -> Result<PathBuf, ExportError> {
    if export.tables.is_empty() {
        return Err(ExportError::NoTables);
    }
    let ext = format.extension();

    match (export.layout, bundle) {
        (ExportLayout::Merged, _) => {
            let table = &export.tables[0];
            let target = destination.join(format!("{}.{}", export.stem, ext));
            write_atomic(&target, &format.encode(table)?)?;
            Ok(target)
        }
        (ExportLayout::PerUnit, true) => {
            let target = destination.join(format!("{}.tar.gz", export.stem));
            let temp = temp_in(destination)?;
            let mut archive = tar::Builder::new(GzEncoder::new(temp, Compression::default()));
            let write_err = |e| ExportError::WriteIo(target.clone(), e);

            for table in &export.tables {
                let bytes = format.encode(table)?;
                let mut header = tar::Header::new_gnu();
                header.set_size(bytes.len() as u64);
                header.set_mode(0o644);
                header.set_mtime(unix_now());
                header.set_cksum();
                archive
                    .append_data(&mut header, format!("{}.{}", table.name, ext), bytes.as_slice())
                    .map_err(write_err)?;
            }

            let temp = archive
                .into_inner()
                .and_then(|gz| gz.finish())
                .map_err(write_err)?;
            persist(temp, &target)?;
            Ok(target)
        }
        (ExportLayout::PerUnit, false) => {
            let dir = destination.join(&export.stem);
            let staged = TempDir::new_in(destination)
                .map_err(|e| ExportError::DestinationCreation(destination.to_path_buf(), e))?;
            for table in &export.tables {
                let name = format!("{}.{}", table.name, ext);
                std::fs::write(staged.path().join(&name), format.encode(table)?)
                    .map_err(|e| ExportError::WriteIo(dir.join(&name), e))?;
            }
            swap_dir(staged, &dir)?;
            Ok(dir)
        }
    }
}

/// Moves `staged` to `target`, replacing whatever directory was there.
/// The previous contents are deleted only after the new ones are in place.
fn swap_dir(staged: TempDir, target: &Path) -> Result<(), ExportError> {
    let parent = target.parent().unwrap_or_else(|| Path::new("."));
    let previous = if target.exists() {
        let trash = TempDir::new_in(parent)
            .map_err(|e| ExportError::WriteIo(parent.to_path_buf(), e))?;
        let moved = trash.path().join("previous");
        std::fs::rename(target, &moved)
            .map_err(|e| ExportError::Persist(target.to_path_buf(), e))?;
        Some((trash, moved))
    } else {
        None
    };

    if let Err(e) = std::fs::rename(staged.path(), target) {
        if let Some((_, moved)) = &previous {
            // best effort: put the old export back
            let _ = std::fs::rename(moved, target);
        }
        return Err(ExportError::Persist(target.to_path_buf(), e));
    }
    Ok(())
}

fn temp_in(dir: &Path) -> Result<NamedTempFile, ExportError> {
    NamedTempFile::new_in(dir).map_err(|e| ExportError::WriteIo(dir.to_path_buf(), e))
}

fn write_atomic(target: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = temp_in(dir)?;
    temp.write_all(bytes)
        .and_then(|_| temp.flush())
        .map_err(|e| ExportError::WriteIo(target.to_path_buf(), e))?;
    persist(temp, target)
}

fn persist(temp: NamedTempFile, target: &Path) -> Result<(), ExportError> {
    temp.persist(target)
        .map(|_| ())
        .map_err(|e| ExportError::Persist(target.to_path_buf(), e.error))
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::assembler::series_frame;
    use crate::types::dataset_kind::DatasetKind;
    use crate::types::series::SeriesRow;
    use chrono::NaiveDate;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn table(name: &str, values: &[Option<f32>]) -> ExportTable {
        let rows: Vec<SeriesRow> = values
            .iter()
            .enumerate()
            .map(|(d, &value)| SeriesRow {
                date: NaiveDate::from_ymd_opt(2015, 1, 1 + d as u32).unwrap(),
                latitude: 19.0,
                longitude: 73.0,
                value,
            })
            .collect();
        ExportTable {
            name: name.to_string(),
            frame: series_frame(DatasetKind::Rainfall, &rows).unwrap(),
        }
    }

    fn export(layout: ExportLayout, tables: Vec<ExportTable>) -> AssembledExport {
        AssembledExport {
            stem: "rainfall_data_19.0_73.0_2015".to_string(),
            layout,
            tables,
        }
    }

    #[tokio::test]
    async fn merged_csv_has_header_and_blank_missing_values() {
        let dir = tempfile::tempdir().unwrap();
        let export = export(
            ExportLayout::Merged,
            vec![table("t", &[Some(1.5), None])],
        );

        let path = write_export(export, dir.path(), ExportFormat::Csv, true)
            .await
            .unwrap();
        assert_eq!(path, dir.path().join("rainfall_data_19.0_73.0_2015.csv"));

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Date,Latitude,Longitude,Rainfall");
        assert_eq!(lines[1], "2015-01-01,19.0,73.0,1.5");
        assert_eq!(lines[2], "2015-01-02,19.0,73.0,");
        // no temporary files left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn per_unit_bundle_contains_one_entry_per_table() {
        let dir = tempfile::tempdir().unwrap();
        let export = export(
            ExportLayout::PerUnit,
            vec![
                table("2015_19.0_73.0", &[Some(1.0)]),
                table("2016_19.0_73.0", &[Some(2.0)]),
            ],
        );

        let path = write_export(export, dir.path(), ExportFormat::Csv, true)
            .await
            .unwrap();
        assert_eq!(path, dir.path().join("rainfall_data_19.0_73.0_2015.tar.gz"));

        let mut archive = tar::Archive::new(GzDecoder::new(std::fs::File::open(&path).unwrap()));
        let mut entries = Vec::new();
        for entry in archive.entries().unwrap() {
            let mut entry = entry.unwrap();
            let name = entry.path().unwrap().to_string_lossy().into_owned();
            let mut body = String::new();
            entry.read_to_string(&mut body).unwrap();
            entries.push((name, body));
        }
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "2015_19.0_73.0.csv");
        assert_eq!(entries[1].0, "2016_19.0_73.0.csv");
        assert!(entries[1].1.starts_with("Date,Latitude,Longitude,Rainfall"));
    }

    #[tokio::test]
    async fn per_unit_parquet_directory() {
        let dir = tempfile::tempdir().unwrap();
        let export = export(
            ExportLayout::PerUnit,
            vec![
                table("2015_19.0_73.0", &[Some(1.0), Some(2.0)]),
                table("2016_19.0_73.0", &[None]),
            ],
        );

        let path = write_export(export, dir.path(), ExportFormat::Parquet, false)
            .await
            .unwrap();
        let file = std::fs::File::open(path.join("2015_19.0_73.0.parquet")).unwrap();
        let df = ParquetReader::new(file).finish().unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("Date").unwrap().dtype(), &DataType::Date);
        assert!(path.join("2016_19.0_73.0.parquet").is_file());
    }

    #[tokio::test]
    async fn rewriting_a_directory_replaces_its_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = export(
            ExportLayout::PerUnit,
            vec![
                table("2015_19.0_73.0", &[Some(1.0)]),
                table("2016_19.0_73.0", &[Some(2.0)]),
            ],
        );
        let second = export(
            ExportLayout::PerUnit,
            vec![
                table("2017_19.0_73.0", &[Some(3.0)]),
                table("2018_19.0_73.0", &[Some(4.0)]),
            ],
        );

        write_export(first, dir.path(), ExportFormat::Csv, false)
            .await
            .unwrap();
        let path = write_export(second, dir.path(), ExportFormat::Csv, false)
            .await
            .unwrap();

        let mut files: Vec<String> = std::fs::read_dir(&path)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        files.sort();
        assert_eq!(files, vec!["2017_19.0_73.0.csv", "2018_19.0_73.0.csv"]);

        let text = std::fs::read_to_string(path.join("2018_19.0_73.0.csv")).unwrap();
        assert_eq!(text.lines().nth(1), Some("2015-01-01,19.0,73.0,4.0"));
        // only the export directory itself, no staging leftovers
        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("rainfall_data_19.0_73.0_2015")]);
    }
}
