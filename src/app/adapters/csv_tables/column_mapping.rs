//! Header lookup for the input tables
//!
//! Input files may order their columns freely and some columns go by more than
//! one name, so fields are located by header rather than by position.

use crate::{Error, Result};
use csv::StringRecord;
use std::collections::HashMap;

/// Column name to index mapping for one input file
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    source: String,
    name_to_index: HashMap<String, usize>,
}

impl ColumnMapping {
    pub fn from_headers(headers: &StringRecord, source: impl Into<String>) -> Self {
        let name_to_index = headers
            .iter()
            .enumerate()
            .map(|(index, header)| (header.trim().trim_start_matches('\u{feff}').to_string(), index))
            .collect();

        Self {
            source: source.into(),
            name_to_index,
        }
    }

    /// Index of the first alias present in the header
    pub fn find(&self, aliases: &[&str]) -> Option<usize> {
        aliases
            .iter()
            .find_map(|alias| self.name_to_index.get(*alias).copied())
    }

    /// Like `find`, but a missing column is an error
    pub fn require(&self, aliases: &[&str]) -> Result<usize> {
        self.find(aliases).ok_or_else(|| {
            Error::csv_parsing(
                self.source.as_str(),
                format!("Required column '{}' not found", aliases.join("' or '")),
                None,
            )
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn column_count(&self) -> usize {
        self.name_to_index.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_and_order() {
        let headers = StringRecord::from(vec!["end_time_local", " dayOfWeek ", "store_id"]);
        let mapping = ColumnMapping::from_headers(&headers, "hours.csv");

        assert_eq!(mapping.require(&["store_id"]).unwrap(), 2);
        assert_eq!(mapping.find(&["day", "dayOfWeek"]), Some(1));
        assert_eq!(mapping.find(&["timezone_str"]), None);
        assert_eq!(mapping.column_count(), 3);
    }

    #[test]
    fn test_missing_required_column_names_file() {
        let headers = StringRecord::from(vec!["store_id"]);
        let mapping = ColumnMapping::from_headers(&headers, "status.csv");

        match mapping.require(&["timestamp_utc"]) {
            Err(Error::CsvParsing { file, message, .. }) => {
                assert_eq!(file, "status.csv");
                assert!(message.contains("timestamp_utc"));
            }
            other => panic!("expected CsvParsing error, got {:?}", other),
        }
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let headers = StringRecord::from(vec!["\u{feff}store_id", "timezone_str"]);
        let mapping = ColumnMapping::from_headers(&headers, "stores.csv");
        assert_eq!(mapping.find(&["store_id"]), Some(0));
    }
}
