//! Data models for store monitoring
//!
//! This module contains the records consumed by the aggregation engine (stores,
//! business-hour rules, status polls) and the per-store metrics row it produces.

use crate::constants::{HOURS_DECIMAL_PLACES, MINUTES_PER_HOUR, report_columns};
use crate::{Error, Result};
use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

// =============================================================================
// Store
// =============================================================================

/// A store row from the Store table
///
/// Report rows are driven by this table: a store that appears only in the
/// business-hours or status tables never gets a row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Store {
    /// Unique store identifier
    pub store_id: String,

    /// Declared IANA timezone name (e.g. "America/Chicago"), possibly missing or invalid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone_name: Option<String>,
}

impl Store {
    /// Create a new Store with validation
    pub fn new(store_id: impl Into<String>, timezone_name: Option<String>) -> Result<Self> {
        let store = Self {
            store_id: store_id.into(),
            timezone_name,
        };

        store.validate()?;
        Ok(store)
    }

    /// Validate store data
    pub fn validate(&self) -> Result<()> {
        if self.store_id.trim().is_empty() {
            return Err(Error::data_validation("Store id cannot be empty"));
        }
        Ok(())
    }
}

// =============================================================================
// Business Hours
// =============================================================================

/// One weekly recurring open interval for a store, in store-local wall-clock time
///
/// Bounds are inclusive. Several rules for the same store and weekday are a union.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BusinessHourRule {
    pub store_id: String,

    /// Day of week, 0 = Monday .. 6 = Sunday
    pub weekday: u8,

    pub start_time_local: NaiveTime,

    pub end_time_local: NaiveTime,
}

impl BusinessHourRule {
    /// Create a new rule with validation
    pub fn new(
        store_id: impl Into<String>,
        weekday: u8,
        start_time_local: NaiveTime,
        end_time_local: NaiveTime,
    ) -> Result<Self> {
        let rule = Self {
            store_id: store_id.into(),
            weekday,
            start_time_local,
            end_time_local,
        };

        rule.validate()?;
        Ok(rule)
    }

    /// Validate rule data for consistency and valid ranges
    ///
    /// Inverted bounds (end before start) are accepted here; such a rule never matches.
    pub fn validate(&self) -> Result<()> {
        if self.store_id.trim().is_empty() {
            return Err(Error::data_validation(
                "Business hours store id cannot be empty",
            ));
        }

        if self.weekday > 6 {
            return Err(Error::data_validation(format!(
                "Invalid weekday {} for store {}: must be between 0 (Monday) and 6 (Sunday)",
                self.weekday, self.store_id
            )));
        }

        Ok(())
    }

    /// True when the end bound precedes the start bound (an overnight interval)
    pub fn is_inverted(&self) -> bool {
        self.end_time_local < self.start_time_local
    }
}

// =============================================================================
// Status Observations
// =============================================================================

/// Polled operational status of a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreStatus {
    Active,
    Inactive,
}

impl StoreStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreStatus::Active => "active",
            StoreStatus::Inactive => "inactive",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, StoreStatus::Active)
    }
}

impl FromStr for StoreStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(StoreStatus::Active),
            "inactive" => Ok(StoreStatus::Inactive),
            other => Err(Error::data_validation(format!(
                "Unknown store status '{}': expected 'active' or 'inactive'",
                other
            ))),
        }
    }
}

impl fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single timestamped status sample for one store
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StatusObservation {
    pub store_id: String,
    pub timestamp_utc: DateTime<Utc>,
    pub status: StoreStatus,
}

impl StatusObservation {
    pub fn new(store_id: impl Into<String>, timestamp_utc: DateTime<Utc>, status: StoreStatus) -> Self {
        Self {
            store_id: store_id.into(),
            timestamp_utc,
            status,
        }
    }
}

/// The three parsed input tables for one report generation
#[derive(Debug, Clone, Default)]
pub struct StoreTables {
    pub stores: Vec<Store>,
    pub business_hours: Vec<BusinessHourRule>,
    pub observations: Vec<StatusObservation>,
}

impl StoreTables {
    pub fn new(
        stores: Vec<Store>,
        business_hours: Vec<BusinessHourRule>,
        observations: Vec<StatusObservation>,
    ) -> Self {
        Self {
            stores,
            business_hours,
            observations,
        }
    }

    /// Latest observation timestamp across all stores, if any
    pub fn latest_observation(&self) -> Option<DateTime<Utc>> {
        self.observations.iter().map(|o| o.timestamp_utc).max()
    }
}

// =============================================================================
// Windows and Reference Instant
// =============================================================================

/// Trailing windows reported for every store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportWindow {
    LastHour,
    LastDay,
    LastWeek,
}

impl ReportWindow {
    pub fn duration(&self) -> Duration {
        match self {
            ReportWindow::LastHour => Duration::hours(1),
            ReportWindow::LastDay => Duration::days(1),
            ReportWindow::LastWeek => Duration::weeks(1),
        }
    }

    /// Inclusive start of this window for a given reference instant
    pub fn start(&self, reference: DateTime<Utc>) -> DateTime<Utc> {
        reference - self.duration()
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportWindow::LastHour => "last_hour",
            ReportWindow::LastDay => "last_day",
            ReportWindow::LastWeek => "last_week",
        }
    }
}

/// How the "now" shared by all windows of a build is chosen
///
/// Wall-clock time is the default. Historical datasets can pin an instant or opt
/// into the latest observation explicitly; the choice is never made implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceInstant {
    #[default]
    Now,
    LatestObservation,
    Fixed(DateTime<Utc>),
}

impl ReferenceInstant {
    /// Resolve to a concrete instant for the given tables
    ///
    /// `LatestObservation` falls back to wall-clock time when there are no observations.
    pub fn resolve(&self, tables: &StoreTables) -> DateTime<Utc> {
        match self {
            ReferenceInstant::Now => Utc::now(),
            ReferenceInstant::LatestObservation => {
                tables.latest_observation().unwrap_or_else(Utc::now)
            }
            ReferenceInstant::Fixed(instant) => *instant,
        }
    }
}

// =============================================================================
// Report Output
// =============================================================================

/// Per-store output row
///
/// Hour-window values are sample counts read as minutes. Day and week values are
/// sample counts divided by 60, rounded to two decimals, read as hours.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MetricsRow {
    pub store_id: String,

    #[serde(rename = "uptime_last_hour(in minutes)")]
    pub uptime_last_hour: u64,

    #[serde(rename = "uptime_last_day(in hours)")]
    pub uptime_last_day: f64,

    #[serde(rename = "uptime_last_week(in hours)")]
    pub uptime_last_week: f64,

    #[serde(rename = "downtime_last_hour(in minutes)")]
    pub downtime_last_hour: u64,

    #[serde(rename = "downtime_last_day(in hours)")]
    pub downtime_last_day: f64,

    #[serde(rename = "downtime_last_week(in hours)")]
    pub downtime_last_week: f64,
}

impl MetricsRow {
    /// A row with every metric at zero
    pub fn empty(store_id: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            uptime_last_hour: 0,
            uptime_last_day: 0.0,
            uptime_last_week: 0.0,
            downtime_last_hour: 0,
            downtime_last_day: 0.0,
            downtime_last_week: 0.0,
        }
    }

    /// Column headers matching the serialized field order
    pub fn headers() -> &'static [&'static str] {
        report_columns::ALL
    }
}

/// Convert a minute-sample count into hours rounded to two decimals
pub fn samples_to_hours(samples: u64) -> f64 {
    let scale = 10f64.powi(HOURS_DECIMAL_PLACES);
    (samples as f64 * scale / MINUTES_PER_HOUR).round() / scale
}

/// Location and size of a written report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    pub path: PathBuf,
    pub rows: usize,
}
