//! Tests for open/closed evaluation of store schedules

use super::*;
use crate::app::services::business_hours::BusinessHours;
use chrono::Duration;

#[test]
fn test_store_without_rules_is_always_open() {
    let rules = weekday_rules("other-store", "09:00:00", "17:00:00");
    let hours = BusinessHours::from_rules(&rules);

    let (y, m, d) = MONDAY;
    let start = utc(y, m, d, 0, 0, 0);

    // Every 17 minutes across a full week, in several timezones
    for tz in [chrono_tz::UTC, chrono_tz::America::Chicago, chrono_tz::Asia::Kolkata] {
        let mut instant = start;
        while instant < start + Duration::weeks(1) {
            assert!(hours.is_open("no-rules", instant, tz), "closed at {}", instant);
            instant += Duration::minutes(17);
        }
    }
}

#[test]
fn test_weekday_without_rule_is_closed_all_day() {
    let rules = weekday_rules("1", "00:00:00", "23:59:59");
    let hours = BusinessHours::from_rules(&rules);

    // 2023-01-28 is a Saturday, 2023-01-29 a Sunday
    for day in [28, 29] {
        for hour in 0..24 {
            let instant = utc(2023, 1, day, hour, 30, 0);
            assert!(!hours.is_open("1", instant, chrono_tz::UTC));
        }
    }
}

#[test]
fn test_bounds_are_inclusive() {
    let rules = vec![create_test_rule("1", 0, "09:00:00", "17:00:00")];
    let hours = BusinessHours::from_rules(&rules);
    let (y, m, d) = MONDAY;

    assert!(!hours.is_open("1", utc(y, m, d, 8, 59, 59), chrono_tz::UTC));
    assert!(hours.is_open("1", utc(y, m, d, 9, 0, 0), chrono_tz::UTC));
    assert!(hours.is_open("1", utc(y, m, d, 12, 0, 0), chrono_tz::UTC));
    assert!(hours.is_open("1", utc(y, m, d, 17, 0, 0), chrono_tz::UTC));
    assert!(!hours.is_open("1", utc(y, m, d, 17, 0, 1), chrono_tz::UTC));
}

#[test]
fn test_evaluates_in_store_local_time() {
    let rules = vec![create_test_rule("ny", 0, "09:00:00", "17:00:00")];
    let hours = BusinessHours::from_rules(&rules);
    let tz = chrono_tz::America::New_York;
    let (y, m, d) = MONDAY;

    // January: New York is UTC-5
    assert!(!hours.is_open("ny", utc(y, m, d, 13, 59, 59), tz));
    assert!(hours.is_open("ny", utc(y, m, d, 14, 0, 0), tz));
    assert!(hours.is_open("ny", utc(y, m, d, 22, 0, 0), tz));
    assert!(!hours.is_open("ny", utc(y, m, d, 22, 0, 1), tz));

    // Same instants judged in UTC give different answers
    assert!(hours.is_open("ny", utc(y, m, d, 13, 0, 0), chrono_tz::UTC));
}

#[test]
fn test_local_conversion_can_change_weekday() {
    // Tuesday 00:00-02:00 in Tokyo (UTC+9) is Monday 15:00-17:00 UTC
    let rules = vec![create_test_rule("tokyo", 1, "00:00:00", "02:00:00")];
    let hours = BusinessHours::from_rules(&rules);
    let tz = chrono_tz::Asia::Tokyo;
    let (y, m, d) = MONDAY;

    assert!(hours.is_open("tokyo", utc(y, m, d, 16, 0, 0), tz));
    assert!(!hours.is_open("tokyo", utc(y, m, d + 1, 16, 0, 0), tz));
}

#[test]
fn test_multiple_rules_form_a_union() {
    let rules = vec![
        create_test_rule("1", 0, "09:00:00", "12:00:00"),
        create_test_rule("1", 0, "14:00:00", "18:00:00"),
    ];
    let hours = BusinessHours::from_rules(&rules);
    let (y, m, d) = MONDAY;

    assert!(hours.is_open("1", utc(y, m, d, 10, 0, 0), chrono_tz::UTC));
    assert!(!hours.is_open("1", utc(y, m, d, 13, 0, 0), chrono_tz::UTC));
    assert!(hours.is_open("1", utc(y, m, d, 15, 0, 0), chrono_tz::UTC));
    assert!(!hours.is_open("1", utc(y, m, d, 19, 0, 0), chrono_tz::UTC));
}

#[test]
fn test_inverted_rule_keeps_store_closed() {
    let rules = vec![create_test_rule("1", 0, "22:00:00", "02:00:00")];
    let hours = BusinessHours::from_rules(&rules);
    let (y, m, d) = MONDAY;

    assert!(hours.has_rules("1"));
    for hour in 0..24 {
        assert!(!hours.is_open("1", utc(y, m, d, hour, 0, 0), chrono_tz::UTC));
    }
}
