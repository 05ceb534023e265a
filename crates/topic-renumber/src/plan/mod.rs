//! Pure planning: validation, backfill, partitioning and renumbering.
//!
//! Nothing in this module performs I/O. [`MigrationPlan::build`] runs the
//! planners in order over an in-memory snapshot and returns every change the
//! executor will need.

pub mod backfill;
pub mod comparator;
pub mod partition;
pub mod renumber;
pub mod validate;

pub use backfill::{apply_backfills, count_by_reason, format_capture_timestamp, plan_backfills};
pub use comparator::{
    parse_timestamp, stable_sort_by, LegacySequenceRule, OrderingRule, RecordComparator,
    TimestampRule, TIE_TOLERANCE_MICROS,
};
pub use partition::{partition, PartitionDefaults, DEFAULT_AREA, DEFAULT_TYPE};
pub use renumber::{plan_renumbering, renumber_partition, PartitionPlan, RenumberPlan};
pub use validate::{validate, ValidationSummary, WarningExample, EXAMPLE_LIMIT};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

use crate::record::{ChangeRequest, CreatedAtBackfill, Record, SequenceRenumber};

/// Every change computed for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationPlan {
    /// Run-wide capture timestamp used for timestamp-less records.
    pub captured_at: DateTime<Utc>,
    pub validation: ValidationSummary,
    pub backfills: Vec<CreatedAtBackfill>,
    pub renumbers: Vec<SequenceRenumber>,
    pub partitions: Vec<PartitionPlan>,
}

impl MigrationPlan {
    /// Plan a run with the default comparator.
    pub fn build(
        records: &[Record],
        defaults: &PartitionDefaults,
        captured_at: DateTime<Utc>,
    ) -> Self {
        Self::build_with(records, defaults, &RecordComparator::default(), captured_at)
    }

    /// Plan a run: validate, backfill, partition, renumber.
    pub fn build_with(
        records: &[Record],
        defaults: &PartitionDefaults,
        comparator: &RecordComparator,
        captured_at: DateTime<Utc>,
    ) -> Self {
        info!("Validating {} initiatives", records.len());
        let validation = validate(records);
        validation.log();

        info!("Checking for initiatives without createdAt");
        let backfills = plan_backfills(records, captured_at);
        let (from_last_update, from_migration) = count_by_reason(&backfills);
        info!(
            "Found {} initiatives without createdAt ({} from lastUpdate, {} from migration timestamp)",
            backfills.len(),
            from_last_update,
            from_migration
        );

        let snapshot = apply_backfills(records, &backfills);
        let groups = partition(&snapshot, defaults);
        info!("Calculating renumbering for {} groups", groups.len());

        let RenumberPlan {
            renumbers,
            partitions,
        } = plan_renumbering(&groups, comparator);
        info!("Total topicNumber updates needed: {}", renumbers.len());

        Self {
            captured_at,
            validation,
            backfills,
            renumbers,
            partitions,
        }
    }

    /// Every change, backfills first.
    pub fn changes(&self) -> impl Iterator<Item = ChangeRequest> + '_ {
        self.backfills
            .iter()
            .cloned()
            .map(ChangeRequest::from)
            .chain(self.renumbers.iter().cloned().map(ChangeRequest::from))
    }

    /// Records as they would look after the plan is applied.
    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        let renumbered: HashMap<&str, &str> = self
            .renumbers
            .iter()
            .map(|r| (r.id.as_str(), r.new_value.as_str()))
            .collect();

        apply_backfills(records, &self.backfills)
            .into_iter()
            .map(|mut record| {
                if let Some(value) = renumbered.get(record.id.as_str()) {
                    record.sequence_number = Some((*value).to_string());
                }
                record
            })
            .collect()
    }
}
