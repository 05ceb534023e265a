//! Migration orchestrator - drives one run from load to commit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{RenumberError, Result};
use crate::executor::{BatchExecutor, ExecutionSummary};
use crate::plan::MigrationPlan;
use crate::report::MigrationReport;
use crate::store::RecordStore;

/// Final status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Changes were written (or there was nothing to write).
    Completed,
    /// Plan computed, nothing written.
    DryRun,
    /// The operator declined the confirmation prompt.
    Cancelled,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Completed => f.write_str("completed"),
            RunStatus::DryRun => f.write_str("dry_run"),
            RunStatus::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Result of a migration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationResult {
    /// Unique run identifier.
    pub run_id: String,

    /// Final status.
    pub status: RunStatus,

    pub dry_run: bool,

    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// When the run completed.
    pub completed_at: DateTime<Utc>,

    /// Total duration in seconds.
    pub duration_seconds: f64,

    /// Planned changes and diagnostics.
    pub report: MigrationReport,

    /// What was actually written.
    pub execution: ExecutionSummary,
}

impl MigrationResult {
    /// Convert result to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs a renumbering migration against a record store.
pub struct Orchestrator {
    config: Config,
    store: Arc<dyn RecordStore>,
}

impl Orchestrator {
    pub fn new(config: Config, store: Arc<dyn RecordStore>) -> Self {
        Self { config, store }
    }

    /// Run the migration.
    ///
    /// `confirm` is shown the report before anything is written and only in
    /// live mode; returning `Ok(false)` ends the run without writes.
    pub async fn run<F>(
        self,
        dry_run: bool,
        cancel: Option<CancellationToken>,
        confirm: F,
    ) -> Result<MigrationResult>
    where
        F: FnOnce(&MigrationReport) -> Result<bool>,
    {
        let started_at = Utc::now();
        let timer = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let cancel = cancel.unwrap_or_else(CancellationToken::new);

        info!("Starting migration run: {}", run_id);
        if dry_run {
            info!("Mode: DRY-RUN (no changes will be saved)");
        } else {
            warn!("Mode: LIVE (changes will be written)");
        }

        // Phase 1: Load
        info!(
            "Phase 1: Loading initiatives from {} store",
            self.store.store_type()
        );
        let records = self.store.load_all().await?;
        info!("Loaded {} initiatives", records.len());

        let finish = |status: RunStatus, report: MigrationReport, execution: ExecutionSummary| {
            let completed_at = Utc::now();
            let result = MigrationResult {
                run_id: run_id.clone(),
                status,
                dry_run,
                started_at,
                completed_at,
                duration_seconds: timer.elapsed().as_secs_f64(),
                report,
                execution,
            };
            info!(
                "Migration run {} finished: {} in {:.2}s",
                result.run_id, result.status, result.duration_seconds
            );
            result
        };

        // Phase 2: Plan
        info!("Phase 2: Planning changes");
        let plan = MigrationPlan::build(
            &records,
            &self.config.migration.partition_defaults(),
            Utc::now(),
        );
        let report = MigrationReport::build(&records, &plan);
        report.log();

        let empty = ExecutionSummary {
            dry_run,
            ..Default::default()
        };

        if records.is_empty() {
            warn!("No initiatives found, nothing to migrate");
            let status = if dry_run {
                RunStatus::DryRun
            } else {
                RunStatus::Completed
            };
            return Ok(finish(status, report, empty));
        }

        if dry_run {
            for change in plan.changes() {
                debug!("Planned: {}", change);
            }
        }

        if !dry_run && !report.has_changes() {
            info!("All partitions are already dense, nothing to write");
            return Ok(finish(RunStatus::Completed, report, empty));
        }
        if !dry_run {
            if cancel.is_cancelled() {
                return Err(RenumberError::Cancelled);
            }
            if !confirm(&report)? {
                warn!("Migration cancelled by user");
                return Ok(finish(RunStatus::Cancelled, report, empty));
            }
        }

        // Phase 3: Apply
        info!("Phase 3: Applying changes");
        let executor = BatchExecutor::new(self.store.clone(), self.config.migration.batch_size)
            .with_cancellation(cancel);
        let execution = executor
            .execute(&plan.backfills, &plan.renumbers, dry_run)
            .await?;

        if !dry_run {
            info!(
                "Applied {} createdAt and {} topicNumber updates in {} batches",
                execution.backfills_applied,
                execution.renumbers_applied,
                execution.batches_committed
            );
        }

        let status = if dry_run {
            RunStatus::DryRun
        } else {
            RunStatus::Completed
        };
        Ok(finish(status, report, execution))
    }
}
