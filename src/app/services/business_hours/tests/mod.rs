//! Shared test utilities and fixtures for business-hours tests

use crate::app::models::BusinessHourRule;
use chrono::{DateTime, NaiveTime, TimeZone, Utc};

pub mod evaluator_tests;

/// Parse an `HH:MM:SS` literal
pub fn local_time(value: &str) -> NaiveTime {
    NaiveTime::parse_from_str(value, "%H:%M:%S").unwrap()
}

/// Create a test rule from string bounds
pub fn create_test_rule(store_id: &str, weekday: u8, start: &str, end: &str) -> BusinessHourRule {
    BusinessHourRule::new(store_id, weekday, local_time(start), local_time(end)).unwrap()
}

/// Weekday rules Monday..Friday with the same bounds
pub fn weekday_rules(store_id: &str, start: &str, end: &str) -> Vec<BusinessHourRule> {
    (0..5)
        .map(|day| create_test_rule(store_id, day, start, end))
        .collect()
}

/// UTC instant from components
pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
        .unwrap()
}

/// 2023-01-23 is a Monday
pub const MONDAY: (i32, u32, u32) = (2023, 1, 23);
