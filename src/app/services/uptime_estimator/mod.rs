//! Windowed uptime/downtime estimation for a single store
//!
//! Every status poll stands for exactly one minute at its observed status. There
//! is no interpolation between polls: the estimator counts samples, it does not
//! integrate durations, so accuracy depends on polls arriving about once a minute.
//!
//! For each trailing window (hour, day, week) ending at the reference instant the
//! estimator re-scans the store's polls, drops those outside business hours and
//! counts the rest as uptime (active) or downtime (inactive).

use crate::app::models::{MetricsRow, ReportWindow, StatusObservation, samples_to_hours};
use crate::app::services::business_hours::BusinessHours;
use crate::constants::MINUTES_PER_SAMPLE;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::trace;

#[cfg(test)]
pub mod tests;

/// Sample counts for one window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowCounts {
    /// Polls at or after the window start
    pub candidates: u64,
    /// Candidates dropped because the store was scheduled closed
    pub skipped_closed: u64,
    /// Active polls inside business hours
    pub uptime: u64,
    /// Inactive polls inside business hours
    pub downtime: u64,
}

impl WindowCounts {
    /// Polls that counted toward uptime or downtime
    pub fn counted(&self) -> u64 {
        self.uptime + self.downtime
    }

    pub fn uptime_minutes(&self) -> u64 {
        self.uptime * MINUTES_PER_SAMPLE
    }

    pub fn downtime_minutes(&self) -> u64 {
        self.downtime * MINUTES_PER_SAMPLE
    }

    pub fn uptime_hours(&self) -> f64 {
        samples_to_hours(self.uptime_minutes())
    }

    pub fn downtime_hours(&self) -> f64 {
        samples_to_hours(self.downtime_minutes())
    }
}

/// Counts for all three windows of one store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreMetrics {
    pub store_id: String,
    pub last_hour: WindowCounts,
    pub last_day: WindowCounts,
    pub last_week: WindowCounts,
}

impl StoreMetrics {
    /// Convert to an output row: hour window in minutes, day and week in hours
    pub fn to_row(&self) -> MetricsRow {
        MetricsRow {
            store_id: self.store_id.clone(),
            uptime_last_hour: self.last_hour.uptime_minutes(),
            uptime_last_day: self.last_day.uptime_hours(),
            uptime_last_week: self.last_week.uptime_hours(),
            downtime_last_hour: self.last_hour.downtime_minutes(),
            downtime_last_day: self.last_day.downtime_hours(),
            downtime_last_week: self.last_week.downtime_hours(),
        }
    }
}

/// Sample-counting estimator over a business-hours index
#[derive(Debug, Clone, Copy)]
pub struct UptimeEstimator<'a> {
    business_hours: &'a BusinessHours,
}

impl<'a> UptimeEstimator<'a> {
    pub fn new(business_hours: &'a BusinessHours) -> Self {
        Self { business_hours }
    }

    /// Estimate all three windows for one store
    ///
    /// `observations` should already be restricted to `store_id`; order does not
    /// matter. An empty slice yields zeros everywhere.
    pub fn compute(
        &self,
        store_id: &str,
        observations: &[&StatusObservation],
        tz: Tz,
        reference: DateTime<Utc>,
    ) -> StoreMetrics {
        StoreMetrics {
            store_id: store_id.to_string(),
            last_hour: self.count_window(store_id, observations, tz, reference, ReportWindow::LastHour),
            last_day: self.count_window(store_id, observations, tz, reference, ReportWindow::LastDay),
            last_week: self.count_window(store_id, observations, tz, reference, ReportWindow::LastWeek),
        }
    }

    /// Count one window from scratch
    pub fn count_window(
        &self,
        store_id: &str,
        observations: &[&StatusObservation],
        tz: Tz,
        reference: DateTime<Utc>,
        window: ReportWindow,
    ) -> WindowCounts {
        let window_start = window.start(reference);
        let mut counts = WindowCounts::default();

        for observation in observations
            .iter()
            .filter(|o| o.timestamp_utc >= window_start)
        {
            counts.candidates += 1;

            if !self
                .business_hours
                .is_open(store_id, observation.timestamp_utc, tz)
            {
                counts.skipped_closed += 1;
                continue;
            }

            if observation.status.is_active() {
                counts.uptime += 1;
            } else {
                counts.downtime += 1;
            }
        }

        trace!(
            "Store {} {}: {} candidates, {} up, {} down, {} outside business hours",
            store_id,
            window.label(),
            counts.candidates,
            counts.uptime,
            counts.downtime,
            counts.skipped_closed
        );

        counts
    }
}
