//! Business-hours evaluation for store schedules
//!
//! Indexes business-hour rules by store and weekday and answers whether a store
//! is scheduled to be open at an instant, evaluated in the store's local time.
//!
//! A store with no rules at all is open around the clock. A store with rules on
//! some weekdays is closed on every weekday without a rule.

use crate::app::models::BusinessHourRule;
use crate::constants::DAYS_PER_WEEK;
use chrono::{DateTime, Datelike, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use std::collections::HashMap;
use tracing::{debug, warn};

#[cfg(test)]
pub mod tests;

/// Inclusive local wall-clock interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenInterval {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl OpenInterval {
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time <= self.end
    }
}

impl From<&BusinessHourRule> for OpenInterval {
    fn from(rule: &BusinessHourRule) -> Self {
        Self {
            start: rule.start_time_local,
            end: rule.end_time_local,
        }
    }
}

/// Open intervals for one store, by weekday (index 0 = Monday)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklySchedule {
    days: [Vec<OpenInterval>; DAYS_PER_WEEK],
}

impl WeeklySchedule {
    fn add(&mut self, weekday: u8, interval: OpenInterval) {
        self.days[weekday as usize].push(interval);
    }

    /// Intervals declared for a weekday (0 = Monday)
    pub fn intervals(&self, weekday: u8) -> &[OpenInterval] {
        self.days
            .get(weekday as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Check a store-local date-time against this schedule
    ///
    /// A weekday with no intervals is closed.
    pub fn is_open_at_local(&self, local: NaiveDateTime) -> bool {
        let weekday = local.weekday().num_days_from_monday() as u8;
        let time = local.time();
        self.intervals(weekday)
            .iter()
            .any(|interval| interval.contains(time))
    }

    /// Number of weekdays with at least one interval
    pub fn open_days(&self) -> usize {
        self.days.iter().filter(|d| !d.is_empty()).count()
    }
}

/// Business-hours index for all stores
#[derive(Debug, Clone, Default)]
pub struct BusinessHours {
    schedules: HashMap<String, WeeklySchedule>,
    rule_count: usize,
}

impl BusinessHours {
    /// Build the index from business-hour rules
    ///
    /// Rules with inverted bounds are kept but logged; they never match.
    pub fn from_rules<'a>(rules: impl IntoIterator<Item = &'a BusinessHourRule>) -> Self {
        let mut schedules: HashMap<String, WeeklySchedule> = HashMap::new();
        let mut rule_count = 0;

        for rule in rules {
            if rule.is_inverted() {
                warn!(
                    "Business hours for store {} on weekday {} end before they start ({} > {}); rule will never match",
                    rule.store_id, rule.weekday, rule.start_time_local, rule.end_time_local
                );
            }

            schedules
                .entry(rule.store_id.clone())
                .or_default()
                .add(rule.weekday, OpenInterval::from(rule));
            rule_count += 1;
        }

        debug!(
            "Indexed {} business-hour rules for {} stores",
            rule_count,
            schedules.len()
        );

        Self {
            schedules,
            rule_count,
        }
    }

    /// Schedule for a store, or `None` when the store has no rules
    pub fn schedule_for(&self, store_id: &str) -> Option<&WeeklySchedule> {
        self.schedules.get(store_id)
    }

    /// Check if a store has any business-hour rules
    pub fn has_rules(&self, store_id: &str) -> bool {
        self.schedules.contains_key(store_id)
    }

    /// Number of stores with at least one rule
    pub fn store_count(&self) -> usize {
        self.schedules.len()
    }

    /// Total number of indexed rules
    pub fn rule_count(&self) -> usize {
        self.rule_count
    }

    /// Whether a store is scheduled to be open at an instant
    ///
    /// The instant is converted to the store's local time with `tz` before the
    /// weekday and time-of-day are looked up.
    pub fn is_open(&self, store_id: &str, instant: DateTime<Utc>, tz: Tz) -> bool {
        match self.schedule_for(store_id) {
            None => true,
            Some(schedule) => schedule.is_open_at_local(instant.with_timezone(&tz).naive_local()),
        }
    }
}
