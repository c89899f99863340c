//! Trigger/poll façade over report generation
//!
//! `trigger` registers a job and returns its identifier immediately; the
//! load → build → write pipeline runs on a blocking worker and its outcome is
//! recorded in the job registry. `poll` only ever reports Running, Complete,
//! Failed or NotFound.

use crate::app::adapters::csv_tables::CsvDataSource;
use crate::app::adapters::report_writer::{ReportWriter, write_to_path};
use crate::app::models::{ReferenceInstant, ReportArtifact, StoreTables};
use crate::app::services::job_registry::{JobId, JobRegistry, ReportPoll};
use crate::app::services::report_builder::{Report, ReportBuilder};
use crate::config::Config;
use crate::{Error, Result};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Source of the three input tables for one generation
pub trait StoreDataSource: Send + Sync {
    fn load(&self) -> Result<StoreTables>;

    /// Human-readable description for logs
    fn describe(&self) -> String;
}

/// Tables held in memory, mainly for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataSource {
    tables: StoreTables,
}

impl InMemoryDataSource {
    pub fn new(tables: StoreTables) -> Self {
        Self { tables }
    }
}

impl StoreDataSource for InMemoryDataSource {
    fn load(&self) -> Result<StoreTables> {
        Ok(self.tables.clone())
    }

    fn describe(&self) -> String {
        format!(
            "in-memory tables ({} stores, {} observations)",
            self.tables.stores.len(),
            self.tables.observations.len()
        )
    }
}

struct ServiceInner {
    registry: JobRegistry,
    source: Arc<dyn StoreDataSource>,
    builder: ReportBuilder,
    writer: ReportWriter,
    reference: ReferenceInstant,
}

/// Report jobs over one data source and output directory
///
/// Cloning shares the same registry and configuration.
#[derive(Clone)]
pub struct ReportService {
    inner: Arc<ServiceInner>,
}

impl fmt::Debug for ReportService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportService")
            .field("source", &self.inner.source.describe())
            .field("output_dir", &self.inner.writer.output_dir())
            .field("reference", &self.inner.reference)
            .field("jobs", &self.inner.registry.len())
            .finish()
    }
}

impl ReportService {
    pub fn new(
        source: Arc<dyn StoreDataSource>,
        builder: ReportBuilder,
        writer: ReportWriter,
        reference: ReferenceInstant,
    ) -> Self {
        Self {
            inner: Arc::new(ServiceInner {
                registry: JobRegistry::new(),
                source,
                builder,
                writer,
                reference,
            }),
        }
    }

    /// CSV-backed service from validated configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let resolver = config.timezone_resolver()?;
        Ok(Self::new(
            Arc::new(CsvDataSource::from_config(&config.data)),
            ReportBuilder::new(resolver),
            ReportWriter::new(&config.report.output_dir),
            config.report.reference,
        ))
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.inner.registry
    }

    pub fn reference(&self) -> ReferenceInstant {
        self.inner.reference
    }

    pub fn source_description(&self) -> String {
        self.inner.source.describe()
    }

    /// Start a report job and return its identifier without waiting
    ///
    /// Must be called from within a tokio runtime.
    pub fn trigger(&self) -> JobId {
        self.trigger_tracked().0
    }

    /// Like `trigger`, also returning a handle that resolves once the outcome is recorded
    pub fn trigger_tracked(&self) -> (JobId, JoinHandle<()>) {
        let job_id = self.inner.registry.create();
        info!(
            "Report {} triggered from {}",
            job_id,
            self.inner.source.describe()
        );

        let service = self.clone();
        let id = job_id.clone();
        let handle = tokio::spawn(async move {
            let worker = service.clone();
            let worker_id = id.clone();
            let outcome =
                match tokio::task::spawn_blocking(move || worker.generate(&worker_id)).await {
                    Ok(outcome) => outcome,
                    Err(e) => Err(Error::report_generation(format!(
                        "report worker did not finish: {}",
                        e
                    ))),
                };
            service.record_outcome(&id, outcome);
        });

        (job_id, handle)
    }

    /// Current public status of a job
    pub fn poll(&self, job_id: &JobId) -> ReportPoll {
        self.inner.registry.poll(job_id)
    }

    /// Run the whole pipeline synchronously, writing `<output_dir>/<job_id>.csv`
    pub fn generate(&self, job_id: &JobId) -> Result<ReportArtifact> {
        let report = self.build_report()?;
        self.inner.writer.write(job_id.as_str(), &report.rows)
    }

    /// Load the tables and build the report without writing it
    pub fn build_report(&self) -> Result<Report> {
        let tables = self.inner.source.load()?;
        self.inner
            .builder
            .build_from_tables(&tables, self.inner.reference)
    }

    /// Build and write to an explicit path, outside the job registry
    pub fn generate_to(&self, path: &Path) -> Result<(Report, ReportArtifact)> {
        let report = self.build_report()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::io(
                    format!("Failed to create output directory '{}'", parent.display()),
                    e,
                )
            })?;
        }
        let artifact = write_to_path(path, &report.rows)?;
        Ok((report, artifact))
    }

    fn record_outcome(&self, job_id: &JobId, outcome: Result<ReportArtifact>) {
        match &outcome {
            Ok(artifact) => info!(
                "Report {} complete: {} rows written to {}",
                job_id,
                artifact.rows,
                artifact.path.display()
            ),
            Err(e) => error!("Report {} failed: {}", job_id, e),
        }

        if let Err(e) = self.inner.registry.finish(job_id, outcome) {
            error!("Could not record outcome of report {}: {}", job_id, e);
        }
    }
}
