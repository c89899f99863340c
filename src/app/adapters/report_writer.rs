//! CSV report output
//!
//! Writes metrics rows as `<report_id>.csv` under the output directory, with the
//! header row in the fixed report column order.

use crate::app::models::{MetricsRow, ReportArtifact};
use crate::constants::REPORT_FILE_EXTENSION;
use crate::{Error, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes report artifacts into one directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the artifact for a given file stem
    pub fn artifact_path(&self, file_stem: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", file_stem, REPORT_FILE_EXTENSION))
    }

    /// Write rows to `<output_dir>/<file_stem>.csv`, creating the directory if needed
    pub fn write(&self, file_stem: &str, rows: &[MetricsRow]) -> Result<ReportArtifact> {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| {
            Error::io(
                format!(
                    "Failed to create output directory '{}'",
                    self.output_dir.display()
                ),
                e,
            )
        })?;

        write_to_path(&self.artifact_path(file_stem), rows)
    }
}

/// Write rows as CSV to an explicit path
pub fn write_to_path(path: &Path, rows: &[MetricsRow]) -> Result<ReportArtifact> {
    let file = File::create(path).map_err(|e| {
        Error::io(
            format!("Failed to create report file '{}'", path.display()),
            e,
        )
    })?;

    write_rows(file, rows).map_err(|e| match e {
        Error::CsvParsing { message, source, .. } => {
            Error::csv_parsing(path.display().to_string(), message, source)
        }
        other => other,
    })?;

    info!("Wrote {} report rows to {}", rows.len(), path.display());

    Ok(ReportArtifact {
        path: path.to_path_buf(),
        rows: rows.len(),
    })
}

/// Serialize rows to any writer, header first
///
/// The header is written even when there are no rows.
pub fn write_rows<W: Write>(writer: W, rows: &[MetricsRow]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(MetricsRow::headers())?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_row() -> MetricsRow {
        MetricsRow {
            store_id: "A".to_string(),
            uptime_last_hour: 45,
            uptime_last_day: 0.75,
            uptime_last_week: 11.25,
            downtime_last_hour: 15,
            downtime_last_day: 0.25,
            downtime_last_week: 1.67,
        }
    }

    #[test]
    fn test_write_rows_header_and_values() {
        let mut buffer = Vec::new();
        write_rows(&mut buffer, &[sample_row(), MetricsRow::empty("B")]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(
            lines[0],
            "store_id,uptime_last_hour(in minutes),uptime_last_day(in hours),uptime_last_week(in hours),\
             downtime_last_hour(in minutes),downtime_last_day(in hours),downtime_last_week(in hours)"
        );
        assert_eq!(lines[1], "A,45,0.75,11.25,15,0.25,1.67");
        assert_eq!(lines[2], "B,0,0.0,0.0,0,0.0,0.0");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_empty_report_still_has_header() {
        let mut buffer = Vec::new();
        write_rows(&mut buffer, &[]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("store_id,"));
    }

    #[test]
    fn test_writer_creates_directory_and_file() {
        let temp_dir = TempDir::new().unwrap();
        let writer = ReportWriter::new(temp_dir.path().join("reports"));

        let artifact = writer.write("job-123", &[sample_row()]).unwrap();

        assert_eq!(artifact.path, temp_dir.path().join("reports/job-123.csv"));
        assert_eq!(artifact.rows, 1);
        let content = std::fs::read_to_string(&artifact.path).unwrap();
        assert!(content.contains("A,45,0.75"));
    }

    #[test]
    fn test_headers_round_trip_through_csv_reader() {
        let mut buffer = Vec::new();
        write_rows(&mut buffer, &[sample_row()]).unwrap();

        let mut reader = csv::Reader::from_reader(buffer.as_slice());
        let rows: Vec<MetricsRow> = reader
            .deserialize::<MetricsRow>()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(rows, vec![sample_row()]);
    }
}
