//! Report assembly across all stores
//!
//! Runs the uptime estimator once per store in Store table order. Observations
//! are grouped by store a single time per build, and one reference instant is
//! shared by every store of the build.

use crate::app::models::{
    MetricsRow, ReferenceInstant, StatusObservation, Store, StoreTables,
};
use crate::app::services::business_hours::BusinessHours;
use crate::app::services::timezone::TimezoneResolver;
use crate::app::services::uptime_estimator::UptimeEstimator;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Counters collected while building a report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Rows produced (one per Store table entry)
    pub stores_processed: usize,
    /// Stores with no status observations at all
    pub stores_without_observations: usize,
    /// Observations belonging to known stores
    pub observations_total: usize,
    /// Observations for store ids missing from the Store table
    pub observations_unknown_store: usize,
    /// Observations inside the week window
    pub observations_considered: u64,
    /// Week-window observations dropped as outside business hours
    pub observations_skipped_closed: u64,
}

impl BuildStats {
    /// One-line summary for logs and CLI output
    pub fn summary(&self) -> String {
        format!(
            "{} stores, {} observations in window ({} outside business hours, {} for unknown stores)",
            self.stores_processed,
            self.observations_considered,
            self.observations_skipped_closed,
            self.observations_unknown_store
        )
    }
}

/// Result of one report build
#[derive(Debug, Clone)]
pub struct Report {
    pub rows: Vec<MetricsRow>,
    pub stats: BuildStats,
    pub reference: DateTime<Utc>,
}

impl Report {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Builds the per-store metrics table
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportBuilder {
    resolver: TimezoneResolver,
}

impl ReportBuilder {
    pub fn new(resolver: TimezoneResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &TimezoneResolver {
        &self.resolver
    }

    /// Build a report from parsed tables, resolving the reference instant first
    pub fn build_from_tables(
        &self,
        tables: &StoreTables,
        reference: ReferenceInstant,
    ) -> Result<Report> {
        let business_hours = BusinessHours::from_rules(&tables.business_hours);
        let reference = reference.resolve(tables);
        self.build(
            &tables.stores,
            &business_hours,
            &tables.observations,
            reference,
        )
    }

    /// Compute one metrics row per store, in Store table order
    ///
    /// A duplicate store id aborts the whole build.
    pub fn build(
        &self,
        stores: &[Store],
        business_hours: &BusinessHours,
        observations: &[StatusObservation],
        reference: DateTime<Utc>,
    ) -> Result<Report> {
        check_unique_store_ids(stores)?;

        let mut by_store: HashMap<&str, Vec<&StatusObservation>> =
            HashMap::with_capacity(stores.len());
        for store in stores {
            by_store.entry(store.store_id.as_str()).or_default();
        }

        let mut stats = BuildStats::default();
        for observation in observations {
            match by_store.get_mut(observation.store_id.as_str()) {
                Some(group) => {
                    group.push(observation);
                    stats.observations_total += 1;
                }
                None => stats.observations_unknown_store += 1,
            }
        }

        info!(
            "Building report for {} stores at reference {}",
            stores.len(),
            reference
        );

        let estimator = UptimeEstimator::new(business_hours);
        let mut rows = Vec::with_capacity(stores.len());

        for store in stores {
            let store_observations = by_store
                .get(store.store_id.as_str())
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            if store_observations.is_empty() {
                stats.stores_without_observations += 1;
            }

            let tz = self.resolver.resolve(store.timezone_name.as_deref());
            let metrics = estimator.compute(&store.store_id, store_observations, tz, reference);

            debug!(
                "Store {} ({}): {} observations, {} in week window",
                store.store_id,
                tz,
                store_observations.len(),
                metrics.last_week.candidates
            );

            stats.observations_considered += metrics.last_week.candidates;
            stats.observations_skipped_closed += metrics.last_week.skipped_closed;
            rows.push(metrics.to_row());
        }

        stats.stores_processed = rows.len();
        info!("Report built: {}", stats.summary());

        Ok(Report {
            rows,
            stats,
            reference,
        })
    }
}

fn check_unique_store_ids(stores: &[Store]) -> Result<()> {
    let mut seen = HashSet::with_capacity(stores.len());
    for store in stores {
        if !seen.insert(store.store_id.as_str()) {
            return Err(Error::data_validation(format!(
                "Duplicate store id '{}' in Store table",
                store.store_id
            )));
        }
    }
    Ok(())
}
