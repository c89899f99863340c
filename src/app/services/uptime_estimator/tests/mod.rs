//! Shared fixtures for uptime estimator tests

use crate::app::models::{BusinessHourRule, StatusObservation, StoreStatus};
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};


/// Monday 2023-01-23 18:00:00 UTC
pub fn reference_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 23, 18, 0, 0).unwrap()
}

pub fn rule(store_id: &str, weekday: u8, start: &str, end: &str) -> BusinessHourRule {
    BusinessHourRule::new(
        store_id,
        weekday,
        NaiveTime::parse_from_str(start, "%H:%M:%S").unwrap(),
        NaiveTime::parse_from_str(end, "%H:%M:%S").unwrap(),
    )
    .unwrap()
}

/// Polls spaced one minute apart ending just before `end`
pub fn minute_polls(
    store_id: &str,
    end: DateTime<Utc>,
    statuses: &[StoreStatus],
) -> Vec<StatusObservation> {
    statuses
        .iter()
        .enumerate()
        .map(|(i, status)| {
            StatusObservation::new(store_id, end - Duration::minutes(i as i64 + 1), *status)
        })
        .collect()
}

/// `active` active polls followed by `inactive` inactive ones
pub fn status_mix(active: usize, inactive: usize) -> Vec<StoreStatus> {
    let mut statuses = vec![StoreStatus::Active; active];
    statuses.extend(vec![StoreStatus::Inactive; inactive]);
    statuses
}

pub fn as_refs(observations: &[StatusObservation]) -> Vec<&StatusObservation> {
    observations.iter().collect()
}
