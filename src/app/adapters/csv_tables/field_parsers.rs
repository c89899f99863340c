//! Field parsing for the input tables

use crate::constants::LOCAL_TIME_FORMAT;
use crate::{Error, Result};
use chrono::{DateTime, NaiveDateTime, NaiveTime, Utc};
use csv::StringRecord;

/// Naive layouts tried after RFC 3339 and explicit offsets
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Layouts carrying a numeric offset
const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f %z", "%Y-%m-%d %H:%M:%S %z"];

/// Parse a status timestamp into UTC
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.f] UTC`, the same with a `+ZZZZ`
/// offset, or a naive date-time which is taken as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    let naive = value
        .strip_suffix("UTC")
        .or_else(|| value.strip_suffix('Z'))
        .map(str::trim_end)
        .unwrap_or(value);

    let mut last_error = None;
    for format in NAIVE_DATETIME_FORMATS {
        match NaiveDateTime::parse_from_str(naive, format) {
            Ok(dt) => return Ok(dt.and_utc()),
            Err(e) => last_error = Some(e),
        }
    }

    match last_error {
        Some(e) => Err(Error::datetime_parsing(
            format!(
                "Invalid timestamp '{}' (expected RFC 3339 or 'YYYY-MM-DD HH:MM:SS[.f] UTC')",
                value
            ),
            e,
        )),
        None => Err(Error::data_validation(format!("Invalid timestamp '{}'", value))),
    }
}

/// Parse a local `HH:MM:SS` wall-clock time
pub fn parse_local_time(value: &str) -> Result<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, LOCAL_TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S%.f"))
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|e| {
            Error::datetime_parsing(
                format!("Invalid local time '{}' (expected HH:MM:SS)", value),
                e,
            )
        })
}

/// Parse a weekday index, 0 = Monday .. 6 = Sunday
pub fn parse_weekday(value: &str) -> Result<u8> {
    let value = value.trim();
    match value.parse::<u8>() {
        Ok(day) if day <= 6 => Ok(day),
        _ => Err(Error::data_validation(format!(
            "Invalid weekday '{}': must be between 0 (Monday) and 6 (Sunday)",
            value
        ))),
    }
}

/// Get a required, non-empty field value
pub fn get_required_field<'a>(
    record: &'a StringRecord,
    index: usize,
    field_name: &str,
) -> Result<&'a str> {
    let value = record
        .get(index)
        .map(str::trim)
        .ok_or_else(|| Error::data_validation(format!("No value for column '{}'", field_name)))?;

    if value.is_empty() {
        return Err(Error::data_validation(format!(
            "Empty value for required column '{}'",
            field_name
        )));
    }

    Ok(value)
}

/// Get an optional field value; blank counts as missing
pub fn get_optional_field(record: &StringRecord, index: Option<usize>) -> Option<&str> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2023, 1, 22, 12, 9, 39).unwrap();

        assert_eq!(parse_timestamp("2023-01-22 12:09:39 UTC").unwrap(), expected);
        assert_eq!(parse_timestamp("2023-01-22T12:09:39Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2023-01-22T14:09:39+02:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2023-01-22 06:09:39 -0600").unwrap(), expected);
        assert_eq!(parse_timestamp(" 2023-01-22 12:09:39 ").unwrap(), expected);
    }

    #[test]
    fn test_timestamp_fractional_seconds() {
        let parsed = parse_timestamp("2023-01-22 12:09:39.388884 UTC").unwrap();
        assert_eq!(
            parsed,
            Utc.with_ymd_and_hms(2023, 1, 22, 12, 9, 39).unwrap()
                + chrono::Duration::microseconds(388_884)
        );
    }

    #[test]
    fn test_invalid_timestamp() {
        assert!(matches!(
            parse_timestamp("22/01/2023 12:09"),
            Err(Error::DateTimeParsing { .. })
        ));
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn test_local_time() {
        assert_eq!(
            parse_local_time("09:30:00").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert_eq!(
            parse_local_time("23:59").unwrap(),
            NaiveTime::from_hms_opt(23, 59, 0).unwrap()
        );
        assert!(parse_local_time("25:00:00").is_err());
    }

    #[test]
    fn test_weekday() {
        assert_eq!(parse_weekday("0").unwrap(), 0);
        assert_eq!(parse_weekday(" 6 ").unwrap(), 6);
        assert!(parse_weekday("7").is_err());
        assert!(parse_weekday("-1").is_err());
        assert!(parse_weekday("monday").is_err());
    }

    #[test]
    fn test_optional_field_blank_is_missing() {
        let record = StringRecord::from(vec!["1", "  "]);
        assert_eq!(get_optional_field(&record, Some(0)), Some("1"));
        assert_eq!(get_optional_field(&record, Some(1)), None);
        assert_eq!(get_optional_field(&record, None), None);
        assert!(get_required_field(&record, 1, "timezone_str").is_err());
    }
}
