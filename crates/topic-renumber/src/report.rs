//! Migration report.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use crate::plan::{count_by_reason, MigrationPlan, PartitionPlan, ValidationSummary};
use crate::record::Record;

const RULE: &str = "============================================================";

/// Summary of a planned migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationReport {
    pub total_records: usize,
    pub active_records: usize,
    pub soft_deleted: usize,
    pub backfill_updates: usize,
    pub backfills_from_last_update: usize,
    pub backfills_from_migration_timestamp: usize,
    pub renumber_updates: usize,
    /// Per-partition statistics, sorted by key.
    pub partitions: Vec<PartitionPlan>,
    pub validation: ValidationSummary,
}

impl MigrationReport {
    /// Summarize `plan` against the records it was computed from.
    pub fn build(records: &[Record], plan: &MigrationPlan) -> Self {
        let active_records = records.iter().filter(|r| !r.is_deleted()).count();
        let (from_last_update, from_migration) = count_by_reason(&plan.backfills);

        let mut partitions = plan.partitions.clone();
        partitions.sort_by(|a, b| a.key.cmp(&b.key));

        Self {
            total_records: records.len(),
            active_records,
            soft_deleted: records.len() - active_records,
            backfill_updates: plan.backfills.len(),
            backfills_from_last_update: from_last_update,
            backfills_from_migration_timestamp: from_migration,
            renumber_updates: plan.renumbers.len(),
            partitions,
            validation: plan.validation.clone(),
        }
    }

    /// True if applying the plan would write anything.
    pub fn has_changes(&self) -> bool {
        self.backfill_updates > 0 || self.renumber_updates > 0
    }

    /// Emit the report line by line through tracing.
    pub fn log(&self) {
        for line in self.to_string().lines() {
            info!("{}", line);
        }
    }
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RULE)?;
        writeln!(f, "MIGRATION REPORT")?;
        writeln!(f, "{}", RULE)?;

        writeln!(f, "Total initiatives: {}", self.total_records)?;
        writeln!(f, "  - Active: {}", self.active_records)?;
        writeln!(f, "  - Soft-deleted: {}", self.soft_deleted)?;

        writeln!(f, "CreatedAt updates: {}", self.backfill_updates)?;
        if self.backfill_updates > 0 {
            writeln!(
                f,
                "  - Based on lastUpdate: {}",
                self.backfills_from_last_update
            )?;
            writeln!(
                f,
                "  - Based on migration timestamp: {}",
                self.backfills_from_migration_timestamp
            )?;
        }

        writeln!(f, "TopicNumber updates: {}", self.renumber_updates)?;

        writeln!(f, "Groups (area + type): {}", self.partitions.len())?;
        for partition in &self.partitions {
            writeln!(
                f,
                "  - {}: {} initiatives, {} updates",
                partition.key, partition.records, partition.updates
            )?;
        }

        if !self.validation.is_clean() {
            writeln!(f, "Warnings:")?;
            if self.validation.missing_area > 0 {
                writeln!(
                    f,
                    "  - {} initiatives without areaId",
                    self.validation.missing_area
                )?;
            }
            if self.validation.invalid_sequence > 0 {
                writeln!(
                    f,
                    "  - {} initiatives with a non-integer topicNumber",
                    self.validation.invalid_sequence
                )?;
            }
        }

        write!(f, "{}", RULE)
    }
}
