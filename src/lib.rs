//! Store Monitor Library
//!
//! Estimates how long each retail store was up or down during the last hour,
//! day and week, counting only polls that fall inside the store's business hours.
//!
//! This library provides tools for:
//! - Loading store, business-hours and status-poll tables from CSV
//! - Resolving store timezones with a fixed fallback
//! - Evaluating weekly business-hours schedules in store-local time
//! - Estimating windowed uptime/downtime from sparse status samples
//! - Generating reports as background jobs tracked in an in-memory registry
//! - Serving trigger/poll endpoints over HTTP

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod business_hours;
        pub mod job_registry;
        pub mod report_builder;
        pub mod report_service;
        pub mod timezone;
        pub mod uptime_estimator;
    }
    pub mod adapters {
        pub mod csv_tables;
        pub mod report_writer;
    }
}

// HTTP transport
pub mod http;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{BusinessHourRule, MetricsRow, StatusObservation, Store, StoreStatus};
pub use app::services::job_registry::{JobId, JobRegistry, ReportPoll};
pub use app::services::report_service::ReportService;
pub use config::Config;

/// Result type alias for store monitor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for loading, building and tracking store reports
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error
    #[error("CSV parsing error in file '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Data validation error
    #[error("Data validation error: {message}")]
    DataValidation { message: String },

    /// Date/time parsing error
    #[error("Date/time parsing error: {message}")]
    DateTimeParsing {
        message: String,
        #[source]
        source: chrono::ParseError,
    },

    /// No job with this identifier was ever created
    #[error("Job not found: {job_id}")]
    JobNotFound { job_id: String },

    /// Attempted to move a job out of a terminal state
    #[error("Job {job_id} is already {status} and cannot transition again")]
    InvalidJobTransition { job_id: String, status: String },

    /// Report generation failed outside of loading or writing
    #[error("Report generation failed: {message}")]
    ReportGeneration { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Create a date/time parsing error
    pub fn datetime_parsing(message: impl Into<String>, source: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: message.into(),
            source,
        }
    }

    /// Create a job not found error
    pub fn job_not_found(job_id: impl Into<String>) -> Self {
        Self::JobNotFound {
            job_id: job_id.into(),
        }
    }

    /// Create an invalid job transition error
    pub fn invalid_job_transition(job_id: impl Into<String>, status: impl Into<String>) -> Self {
        Self::InvalidJobTransition {
            job_id: job_id.into(),
            status: status.into(),
        }
    }

    /// Create a report generation error
    pub fn report_generation(message: impl Into<String>) -> Self {
        Self::ReportGeneration {
            message: message.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            file: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<chrono::ParseError> for Error {
    fn from(error: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: "Date/time parsing failed".to_string(),
            source: error,
        }
    }
}
