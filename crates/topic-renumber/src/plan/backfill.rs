//! Repairs for records without a usable `createdAt`.

use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashMap;

use crate::record::{BackfillReason, CreatedAtBackfill, Record};

/// Render the run-wide capture timestamp the way it is stored.
pub fn format_capture_timestamp(captured_at: DateTime<Utc>) -> String {
    captured_at.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Plan a `createdAt` for every record that lacks one.
///
/// `lastUpdate` is preferred; otherwise every such record receives the same
/// `captured_at` value so they compare as simultaneous.
pub fn plan_backfills(records: &[Record], captured_at: DateTime<Utc>) -> Vec<CreatedAtBackfill> {
    let migration_timestamp = format_capture_timestamp(captured_at);

    records
        .iter()
        .filter(|r| r.usable_created_at().is_none())
        .map(|r| match r.usable_last_update() {
            Some(last_update) => CreatedAtBackfill {
                id: r.id.clone(),
                value: last_update.to_string(),
                reason: BackfillReason::DerivedFromLastUpdate,
            },
            None => CreatedAtBackfill {
                id: r.id.clone(),
                value: migration_timestamp.clone(),
                reason: BackfillReason::MigrationTimestamp,
            },
        })
        .collect()
}

/// Snapshot of `records` with the planned backfills applied.
pub fn apply_backfills(records: &[Record], backfills: &[CreatedAtBackfill]) -> Vec<Record> {
    let by_id: HashMap<&str, &str> = backfills
        .iter()
        .map(|b| (b.id.as_str(), b.value.as_str()))
        .collect();

    records
        .iter()
        .map(|r| {
            let mut record = r.clone();
            if let Some(value) = by_id.get(r.id.as_str()) {
                record.created_at = Some((*value).to_string());
            }
            record
        })
        .collect()
}

/// Count backfills per reason: `(from_last_update, from_migration_timestamp)`.
pub fn count_by_reason(backfills: &[CreatedAtBackfill]) -> (usize, usize) {
    let from_last_update = backfills
        .iter()
        .filter(|b| b.reason == BackfillReason::DerivedFromLastUpdate)
        .count();
    (from_last_update, backfills.len() - from_last_update)
}
