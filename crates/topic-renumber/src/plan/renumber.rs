//! Dense per-partition renumbering.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::comparator::RecordComparator;
use crate::record::{PartitionKey, Record, SequenceRenumber};

/// Statistics for one partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionPlan {
    pub key: PartitionKey,
    /// Active records in the partition.
    pub records: usize,
    /// Records whose topic number changes.
    pub updates: usize,
}

/// Output of the renumbering planner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenumberPlan {
    pub renumbers: Vec<SequenceRenumber>,
    pub partitions: Vec<PartitionPlan>,
}

/// Renumber one partition: sort, assign `1..=N`, keep only real changes.
pub fn renumber_partition(
    key: &PartitionKey,
    records: &[Record],
    comparator: &RecordComparator,
) -> Vec<SequenceRenumber> {
    comparator
        .sort(records)
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let new_value = (index + 1).to_string();
            let old_value = record.sequence_str();
            (old_value != new_value).then(|| SequenceRenumber {
                id: record.id.clone(),
                partition: key.clone(),
                old_value: old_value.to_string(),
                new_value,
            })
        })
        .collect()
}

/// Renumber every partition, in key order.
pub fn plan_renumbering(
    partitions: &BTreeMap<PartitionKey, Vec<Record>>,
    comparator: &RecordComparator,
) -> RenumberPlan {
    let mut plan = RenumberPlan::default();

    for (key, records) in partitions {
        let changes = renumber_partition(key, records, comparator);
        debug!(
            "Group {}: {} initiatives, {} updates",
            key,
            records.len(),
            changes.len()
        );
        plan.partitions.push(PartitionPlan {
            key: key.clone(),
            records: records.len(),
            updates: changes.len(),
        });
        plan.renumbers.extend(changes);
    }

    plan
}
