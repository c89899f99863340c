//! Application constants for the store monitor
//!
//! This module contains default values, window lengths and the tabular
//! column names used throughout the store monitor application.

// =============================================================================
// Timezone Defaults
// =============================================================================

/// Timezone used when a store's declared timezone is missing or unrecognized
pub const DEFAULT_TIMEZONE: &str = "America/Chicago";

// =============================================================================
// Estimation Constants
// =============================================================================

/// Elapsed time each status sample stands for, in minutes
pub const MINUTES_PER_SAMPLE: u64 = 1;

/// Divisor applied to sample counts for the day and week windows
pub const MINUTES_PER_HOUR: f64 = 60.0;

/// Decimal places kept for hour-denominated metrics
pub const HOURS_DECIMAL_PLACES: i32 = 2;

/// Number of days in a business-hours week (Monday = 0 .. Sunday = 6)
pub const DAYS_PER_WEEK: usize = 7;

// =============================================================================
// Input Table Columns
// =============================================================================

/// Column names accepted for each input table; the first entry is canonical
pub mod input_columns {
    pub const STORE_ID: &[&str] = &["store_id"];
    pub const TIMEZONE: &[&str] = &["timezone_str", "timezone"];
    pub const DAY: &[&str] = &["day", "dayOfWeek", "day_of_week"];
    pub const START_TIME_LOCAL: &[&str] = &["start_time_local"];
    pub const END_TIME_LOCAL: &[&str] = &["end_time_local"];
    pub const TIMESTAMP_UTC: &[&str] = &["timestamp_utc"];
    pub const STATUS: &[&str] = &["status"];
}

/// Wall-clock format for business-hours bounds
pub const LOCAL_TIME_FORMAT: &str = "%H:%M:%S";

// =============================================================================
// Output Report Columns
// =============================================================================

/// Report column headers, in output order
pub mod report_columns {
    pub const STORE_ID: &str = "store_id";
    pub const UPTIME_LAST_HOUR: &str = "uptime_last_hour(in minutes)";
    pub const UPTIME_LAST_DAY: &str = "uptime_last_day(in hours)";
    pub const UPTIME_LAST_WEEK: &str = "uptime_last_week(in hours)";
    pub const DOWNTIME_LAST_HOUR: &str = "downtime_last_hour(in minutes)";
    pub const DOWNTIME_LAST_DAY: &str = "downtime_last_day(in hours)";
    pub const DOWNTIME_LAST_WEEK: &str = "downtime_last_week(in hours)";

    pub const ALL: &[&str] = &[
        STORE_ID,
        UPTIME_LAST_HOUR,
        UPTIME_LAST_DAY,
        UPTIME_LAST_WEEK,
        DOWNTIME_LAST_HOUR,
        DOWNTIME_LAST_DAY,
        DOWNTIME_LAST_WEEK,
    ];
}

/// File extension of generated report artifacts
pub const REPORT_FILE_EXTENSION: &str = "csv";

// =============================================================================
// File and Directory Defaults
// =============================================================================

/// Default directory holding the three input tables
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default file names of the input tables inside the data directory
pub const STORES_FILE_NAME: &str = "stores.csv";
pub const BUSINESS_HOURS_FILE_NAME: &str = "business_hours.csv";
pub const STORE_STATUS_FILE_NAME: &str = "store_status.csv";

/// Default directory for generated reports
pub const DEFAULT_OUTPUT_DIR: &str = "reports";

/// Application directory name under the user config directory
pub const CONFIG_DIR_NAME: &str = "store-monitor";

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Prefix of environment variables that override configuration
pub const ENV_PREFIX: &str = "STORE_MONITOR_";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default bind host for the HTTP server
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default bind port for the HTTP server
pub const DEFAULT_PORT: u16 = 8000;
