//! CSV loading for the three input tables
//!
//! Reads the Store, BusinessHours and StoreStatus tables into typed records.
//! Each file needs a header row; columns are located by name, so their order is
//! free. Any malformed row fails the whole load with the file name and line.

pub mod column_mapping;
pub mod field_parsers;

use crate::app::models::{BusinessHourRule, StatusObservation, Store, StoreStatus, StoreTables};
use crate::app::services::report_service::StoreDataSource;
use crate::config::DataConfig;
use crate::constants::input_columns;
use crate::{Error, Result};
use column_mapping::ColumnMapping;
use csv::{ReaderBuilder, StringRecord, Trim};
use field_parsers::{
    get_optional_field, get_required_field, parse_local_time, parse_timestamp, parse_weekday,
};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Loads the input tables from three CSV files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDataSource {
    pub stores_path: PathBuf,
    pub business_hours_path: PathBuf,
    pub status_path: PathBuf,
}

impl CsvDataSource {
    pub fn new(
        stores_path: impl Into<PathBuf>,
        business_hours_path: impl Into<PathBuf>,
        status_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            stores_path: stores_path.into(),
            business_hours_path: business_hours_path.into(),
            status_path: status_path.into(),
        }
    }

    pub fn from_config(config: &DataConfig) -> Self {
        Self::new(
            &config.stores_path,
            &config.business_hours_path,
            &config.status_path,
        )
    }

    /// Standard file names inside one directory
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::from_config(&DataConfig::in_dir(dir))
    }

    pub fn load_tables(&self) -> Result<StoreTables> {
        let stores = read_stores_file(&self.stores_path)?;
        let business_hours = read_business_hours_file(&self.business_hours_path)?;
        let observations = read_observations_file(&self.status_path)?;

        info!(
            "Loaded {} stores, {} business-hour rules, {} status observations",
            stores.len(),
            business_hours.len(),
            observations.len()
        );

        Ok(StoreTables::new(stores, business_hours, observations))
    }
}

impl StoreDataSource for CsvDataSource {
    fn load(&self) -> Result<StoreTables> {
        self.load_tables()
    }

    fn describe(&self) -> String {
        format!(
            "CSV files ({}, {}, {})",
            self.stores_path.display(),
            self.business_hours_path.display(),
            self.status_path.display()
        )
    }
}

/// Read the Store table: `store_id`, optional `timezone_str`
pub fn read_stores<R: Read>(reader: R, source: &str) -> Result<Vec<Store>> {
    read_table(reader, source, |mapping| {
        let store_id = mapping.require(input_columns::STORE_ID)?;
        let timezone = mapping.find(input_columns::TIMEZONE);

        Ok(move |record: &StringRecord| -> Result<Store> {
            let id = get_required_field(record, store_id, input_columns::STORE_ID[0])?;
            let tz = get_optional_field(record, timezone).map(str::to_string);
            Store::new(id, tz)
        })
    })
}

/// Read the BusinessHours table: `store_id`, `day`, `start_time_local`, `end_time_local`
pub fn read_business_hours<R: Read>(reader: R, source: &str) -> Result<Vec<BusinessHourRule>> {
    read_table(reader, source, |mapping| {
        let store_id = mapping.require(input_columns::STORE_ID)?;
        let day = mapping.require(input_columns::DAY)?;
        let start = mapping.require(input_columns::START_TIME_LOCAL)?;
        let end = mapping.require(input_columns::END_TIME_LOCAL)?;

        Ok(move |record: &StringRecord| -> Result<BusinessHourRule> {
            BusinessHourRule::new(
                get_required_field(record, store_id, input_columns::STORE_ID[0])?,
                parse_weekday(get_required_field(record, day, input_columns::DAY[0])?)?,
                parse_local_time(get_required_field(
                    record,
                    start,
                    input_columns::START_TIME_LOCAL[0],
                )?)?,
                parse_local_time(get_required_field(
                    record,
                    end,
                    input_columns::END_TIME_LOCAL[0],
                )?)?,
            )
        })
    })
}

/// Read the StoreStatus table: `store_id`, `timestamp_utc`, `status`
pub fn read_observations<R: Read>(reader: R, source: &str) -> Result<Vec<StatusObservation>> {
    read_table(reader, source, |mapping| {
        let store_id = mapping.require(input_columns::STORE_ID)?;
        let timestamp = mapping.require(input_columns::TIMESTAMP_UTC)?;
        let status = mapping.require(input_columns::STATUS)?;

        Ok(move |record: &StringRecord| -> Result<StatusObservation> {
            Ok(StatusObservation::new(
                get_required_field(record, store_id, input_columns::STORE_ID[0])?,
                parse_timestamp(get_required_field(
                    record,
                    timestamp,
                    input_columns::TIMESTAMP_UTC[0],
                )?)?,
                get_required_field(record, status, input_columns::STATUS[0])?
                    .parse::<StoreStatus>()?,
            ))
        })
    })
}

pub fn read_stores_file(path: &Path) -> Result<Vec<Store>> {
    read_stores(open_table(path)?, &path.display().to_string())
}

pub fn read_business_hours_file(path: &Path) -> Result<Vec<BusinessHourRule>> {
    read_business_hours(open_table(path)?, &path.display().to_string())
}

pub fn read_observations_file(path: &Path) -> Result<Vec<StatusObservation>> {
    read_observations(open_table(path)?, &path.display().to_string())
}

fn open_table(path: &Path) -> Result<File> {
    File::open(path)
        .map_err(|e| Error::io(format!("Failed to open input table '{}'", path.display()), e))
}

/// Shared read loop: `prepare` resolves columns once and returns the row parser
fn read_table<R, T, F, P>(reader: R, source: &str, prepare: P) -> Result<Vec<T>>
where
    R: Read,
    P: FnOnce(&ColumnMapping) -> Result<F>,
    F: Fn(&StringRecord) -> Result<T>,
{
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(|e| {
        Error::csv_parsing(source, "Failed to read header row", Some(e))
    })?;
    let mapping = ColumnMapping::from_headers(headers, source);
    let parse_row = prepare(&mapping)?;

    let mut rows = Vec::new();
    for (index, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| {
            Error::csv_parsing(source, format!("Malformed row {}", index + 1), Some(e))
        })?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(index as u64 + 2);

        let row = parse_row(&record).map_err(|e| {
            Error::csv_parsing(source, format!("Line {}: {}", line, e), None)
        })?;
        rows.push(row);
    }

    debug!("Read {} rows from {}", rows.len(), source);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, TimeZone, Utc};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_stores_with_missing_timezone() {
        let data = "store_id,timezone_str\n1,America/Denver\n2,\n3,Asia/Beirut\n";
        let stores = read_stores(data.as_bytes(), "stores.csv").unwrap();

        assert_eq!(stores.len(), 3);
        assert_eq!(stores[0].timezone_name.as_deref(), Some("America/Denver"));
        assert_eq!(stores[1].timezone_name, None);
        assert_eq!(stores[2].store_id, "3");
    }

    #[test]
    fn test_read_stores_without_timezone_column() {
        let data = "store_id\n10\n11\n";
        let stores = read_stores(data.as_bytes(), "stores.csv").unwrap();
        assert!(stores.iter().all(|s| s.timezone_name.is_none()));
    }

    #[test]
    fn test_read_business_hours_alias_and_order() {
        let data = "start_time_local,end_time_local,dayOfWeek,store_id\n\
                    09:00:00,17:30:00,0,42\n\
                    10:00:00,14:00:00,6,42\n";
        let rules = read_business_hours(data.as_bytes(), "hours.csv").unwrap();

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].store_id, "42");
        assert_eq!(rules[0].weekday, 0);
        assert_eq!(
            rules[0].end_time_local,
            NaiveTime::from_hms_opt(17, 30, 0).unwrap()
        );
        assert_eq!(rules[1].weekday, 6);
    }

    #[test]
    fn test_read_observations() {
        let data = "store_id,status,timestamp_utc\n\
                    1,active,2023-01-22 12:09:39.388884 UTC\n\
                    1,Inactive,2023-01-22 12:10:39 UTC\n";
        let observations = read_observations(data.as_bytes(), "status.csv").unwrap();

        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].status, StoreStatus::Active);
        assert_eq!(observations[1].status, StoreStatus::Inactive);
        assert_eq!(
            observations[1].timestamp_utc,
            Utc.with_ymd_and_hms(2023, 1, 22, 12, 10, 39).unwrap()
        );
    }

    #[test]
    fn test_bad_row_reports_file_and_line() {
        let data = "store_id,status,timestamp_utc\n\
                    1,active,2023-01-22 12:09:39 UTC\n\
                    1,sleeping,2023-01-22 12:10:39 UTC\n";

        match read_observations(data.as_bytes(), "status.csv") {
            Err(Error::CsvParsing { file, message, .. }) => {
                assert_eq!(file, "status.csv");
                assert!(message.starts_with("Line 3"), "{}", message);
                assert!(message.contains("sleeping"));
            }
            other => panic!("expected CsvParsing error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_column_fails() {
        let data = "store_id,day,start_time_local\n1,0,09:00:00\n";
        assert!(matches!(
            read_business_hours(data.as_bytes(), "hours.csv"),
            Err(Error::CsvParsing { .. })
        ));
    }

    #[test]
    fn test_invalid_weekday_fails() {
        let data = "store_id,day,start_time_local,end_time_local\n1,9,09:00:00,10:00:00\n";
        assert!(read_business_hours(data.as_bytes(), "hours.csv").is_err());
    }

    #[test]
    fn test_csv_data_source_from_directory() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("stores.csv"),
            "store_id,timezone_str\nA,UTC\n",
        )
        .unwrap();
        fs::write(
            temp_dir.path().join("business_hours.csv"),
            "store_id,day,start_time_local,end_time_local\nA,0,00:00:00,23:59:59\n",
        )
        .unwrap();
        fs::write(
            temp_dir.path().join("store_status.csv"),
            "store_id,timestamp_utc,status\nA,2023-01-23 17:59:00 UTC,active\n",
        )
        .unwrap();

        let source = CsvDataSource::in_dir(temp_dir.path());
        let tables = source.load().unwrap();

        assert_eq!(tables.stores.len(), 1);
        assert_eq!(tables.business_hours.len(), 1);
        assert_eq!(tables.observations.len(), 1);
        assert!(source.describe().contains("stores.csv"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let source = CsvDataSource::in_dir(temp_dir.path());
        assert!(matches!(source.load(), Err(Error::Io { .. })));
    }
}
