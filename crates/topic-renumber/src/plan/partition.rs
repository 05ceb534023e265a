//! Grouping of active records into independent numbering sequences.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::record::{PartitionKey, Record};

/// Area used when a record has no `areaId`.
pub const DEFAULT_AREA: &str = "unknown";

/// Initiative type used when a record has no type.
pub const DEFAULT_TYPE: &str = "strategic";

/// Sentinels substituted for missing partition sub-fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionDefaults {
    pub area: String,
    pub record_type: String,
}

impl Default for PartitionDefaults {
    fn default() -> Self {
        Self {
            area: DEFAULT_AREA.to_string(),
            record_type: DEFAULT_TYPE.to_string(),
        }
    }
}

impl PartitionDefaults {
    /// Partition key for `record`, falling back to the sentinels for blank
    /// or missing sub-fields.
    pub fn key_for(&self, record: &Record) -> PartitionKey {
        let pick = |value: Option<&String>, fallback: &String| {
            value
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(fallback)
                .clone()
        };
        PartitionKey::new(
            pick(record.area_id.as_ref(), &self.area),
            pick(record.record_type.as_ref(), &self.record_type),
        )
    }
}

/// Group active records by partition key.
///
/// Soft-deleted records are dropped. Records inside a bucket keep their
/// input order, and buckets iterate in key order.
pub fn partition(
    records: &[Record],
    defaults: &PartitionDefaults,
) -> BTreeMap<PartitionKey, Vec<Record>> {
    let mut groups: BTreeMap<PartitionKey, Vec<Record>> = BTreeMap::new();
    for record in records.iter().filter(|r| !r.is_deleted()) {
        groups
            .entry(defaults.key_for(record))
            .or_default()
            .push(record.clone());
    }
    groups
}
