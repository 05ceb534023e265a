//! Record model and the change requests produced by the planners.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One initiative as loaded from the store.
///
/// Everything except `id` is optional because legacy documents are dirty;
/// the planners decide how to treat missing values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Store-assigned document id.
    pub id: String,

    /// Area the initiative belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_id: Option<String>,

    /// Initiative type (e.g. "strategic").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,

    /// String-encoded topic number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<String>,

    /// ISO-8601 creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// ISO-8601 last modification timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,

    /// Soft-delete marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
}

impl Record {
    /// Create a record with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area_id = Some(area.into());
        self
    }

    pub fn with_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = Some(record_type.into());
        self
    }

    pub fn with_sequence(mut self, sequence: impl Into<String>) -> Self {
        self.sequence_number = Some(sequence.into());
        self
    }

    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    pub fn with_last_update(mut self, last_update: impl Into<String>) -> Self {
        self.last_update = Some(last_update.into());
        self
    }

    pub fn with_deleted_at(mut self, deleted_at: impl Into<String>) -> Self {
        self.deleted_at = Some(deleted_at.into());
        self
    }

    /// True if the record carries a non-empty soft-delete marker.
    pub fn is_deleted(&self) -> bool {
        non_blank(self.deleted_at.as_deref()).is_some()
    }

    /// The `createdAt` value if present and non-blank.
    pub fn usable_created_at(&self) -> Option<&str> {
        non_blank(self.created_at.as_deref())
    }

    /// The `lastUpdate` value if present and non-blank.
    pub fn usable_last_update(&self) -> Option<&str> {
        non_blank(self.last_update.as_deref())
    }

    /// Current sequence number as written in the store, `""` when missing.
    pub fn sequence_str(&self) -> &str {
        self.sequence_number.as_deref().unwrap_or("")
    }

    /// Sequence number as an integer, 0 when missing, blank or not numeric.
    pub fn legacy_sequence(&self) -> i64 {
        parse_sequence(self.sequence_str()).unwrap_or(0)
    }
}

/// Parse a string-encoded sequence number.
///
/// Returns `None` for blank or non-integer input.
pub fn parse_sequence(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Composite key identifying one independent numbering sequence.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PartitionKey {
    pub area: String,
    pub record_type: String,
}

impl PartitionKey {
    pub fn new(area: impl Into<String>, record_type: impl Into<String>) -> Self {
        Self {
            area: area.into(),
            record_type: record_type.into(),
        }
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.area, self.record_type)
    }
}

/// Why a `createdAt` value was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackfillReason {
    /// Copied from the record's own `lastUpdate`.
    DerivedFromLastUpdate,
    /// The run-wide capture timestamp.
    MigrationTimestamp,
}

impl BackfillReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackfillReason::DerivedFromLastUpdate => "derived-from-last-update",
            BackfillReason::MigrationTimestamp => "migration-timestamp",
        }
    }
}

impl fmt::Display for BackfillReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Repair of a missing `createdAt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedAtBackfill {
    pub id: String,
    pub value: String,
    pub reason: BackfillReason,
}

/// New dense sequence number for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRenumber {
    pub id: String,
    pub partition: PartitionKey,
    pub old_value: String,
    pub new_value: String,
}

/// A planned mutation, consumed only by the batch executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeRequest {
    CreatedAtBackfill(CreatedAtBackfill),
    SequenceRenumber(SequenceRenumber),
}

impl ChangeRequest {
    /// Id of the record this change targets.
    pub fn record_id(&self) -> &str {
        match self {
            ChangeRequest::CreatedAtBackfill(b) => &b.id,
            ChangeRequest::SequenceRenumber(r) => &r.id,
        }
    }
}

impl From<CreatedAtBackfill> for ChangeRequest {
    fn from(value: CreatedAtBackfill) -> Self {
        ChangeRequest::CreatedAtBackfill(value)
    }
}

impl From<SequenceRenumber> for ChangeRequest {
    fn from(value: SequenceRenumber) -> Self {
        ChangeRequest::SequenceRenumber(value)
    }
}

impl fmt::Display for ChangeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeRequest::CreatedAtBackfill(b) => write!(
                f,
                "{}: createdAt = {} ({})",
                self.record_id(),
                b.value,
                b.reason
            ),
            ChangeRequest::SequenceRenumber(r) => write!(
                f,
                "{} [{}]: topicNumber '{}' -> '{}'",
                self.record_id(),
                r.partition,
                r.old_value,
                r.new_value
            ),
        }
    }
}
