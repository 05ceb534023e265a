//! Batch executor - applies planned changes to the record store.
//!
//! Changes are written in two strictly sequential phases, backfills first,
//! each split into chunks committed as one atomic batch. The first failing
//! chunk stops the run; chunks committed before it stay applied.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::error::{RenumberError, Result};
use crate::record::{CreatedAtBackfill, SequenceRenumber};
use crate::store::{FieldUpdate, RecordStore};

/// Execution phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// `createdAt` backfills.
    Backfill,
    /// `topicNumber` renumbering.
    Renumber,
}

impl Phase {
    fn field_label(&self) -> &'static str {
        match self {
            Phase::Backfill => "createdAt",
            Phase::Renumber => "topicNumber",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Backfill => f.write_str("backfill"),
            Phase::Renumber => f.write_str("renumber"),
        }
    }
}

/// What the executor did (or would have done in dry-run mode).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionSummary {
    pub dry_run: bool,
    pub backfills_applied: usize,
    pub renumbers_applied: usize,
    pub batches_committed: usize,
    /// Dry-run only: backfills that would be written.
    pub would_apply_backfills: usize,
    /// Dry-run only: renumbers that would be written.
    pub would_apply_renumbers: usize,
}

/// Applies change lists against a [`RecordStore`] in bounded batches.
pub struct BatchExecutor {
    store: Arc<dyn RecordStore>,
    batch_size: usize,
    cancel: CancellationToken,
}

impl BatchExecutor {
    /// Create an executor. `batch_size` is capped at the store's maximum.
    pub fn new(store: Arc<dyn RecordStore>, batch_size: usize) -> Self {
        let batch_size = batch_size.clamp(1, store.max_batch_size().max(1));
        Self {
            store,
            batch_size,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop between batches once `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Apply backfills, then renumbers.
    ///
    /// In dry-run mode the store is never called.
    pub async fn execute(
        &self,
        backfills: &[CreatedAtBackfill],
        renumbers: &[SequenceRenumber],
        dry_run: bool,
    ) -> Result<ExecutionSummary> {
        if dry_run {
            info!("DRY-RUN mode: no changes will be saved");
            info!("  - Would apply {} createdAt updates", backfills.len());
            info!("  - Would apply {} topicNumber updates", renumbers.len());
            return Ok(ExecutionSummary {
                dry_run: true,
                would_apply_backfills: backfills.len(),
                would_apply_renumbers: renumbers.len(),
                ..Default::default()
            });
        }

        let mut summary = ExecutionSummary::default();

        let updates: Vec<FieldUpdate> = backfills.iter().map(FieldUpdate::from).collect();
        let (applied, batches) = self.run_phase(Phase::Backfill, &updates).await?;
        summary.backfills_applied = applied;
        summary.batches_committed += batches;

        let updates: Vec<FieldUpdate> = renumbers.iter().map(FieldUpdate::from).collect();
        let (applied, batches) = self.run_phase(Phase::Renumber, &updates).await?;
        summary.renumbers_applied = applied;
        summary.batches_committed += batches;

        Ok(summary)
    }

    /// Commit one phase chunk by chunk. Returns `(applied, batches)`.
    async fn run_phase(&self, phase: Phase, updates: &[FieldUpdate]) -> Result<(usize, usize)> {
        if updates.is_empty() {
            debug!("No {} updates to apply", phase.field_label());
            return Ok((0, 0));
        }

        info!(
            "Applying {} {} updates via {} store (batch size {})",
            updates.len(),
            phase.field_label(),
            self.store.store_type(),
            self.batch_size
        );

        let mut applied = 0;
        for (index, chunk) in updates.chunks(self.batch_size).enumerate() {
            let batch = index + 1;
            if self.cancel.is_cancelled() {
                info!(
                    "Cancelled before batch {} of {} phase ({} updates applied)",
                    batch, phase, applied
                );
                return Err(RenumberError::Cancelled);
            }

            if let Err(e) = self.store.commit_batch(chunk).await {
                error!(
                    "Batch {} of {} phase failed after {} updates: {}",
                    batch, phase, applied, e
                );
                return Err(RenumberError::batch_commit(phase, batch, applied, e.to_string()));
            }

            applied += chunk.len();
            info!("  - Batch {}: {} updates applied", batch, chunk.len());
        }

        Ok((applied, updates.len().div_ceil(self.batch_size)))
    }
}
