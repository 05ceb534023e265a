//! Record store abstraction.
//!
//! The [`RecordStore`] trait is the only I/O boundary of the tool: a bulk
//! read of the whole collection and an atomic batch update. Implementations:
//!
//! - **File**: [`FileStore`], a JSON export of the document collections
//! - **Memory**: [`MemoryStore`], an in-process collection
//!
//! The orchestrator and executor work with `Arc<dyn RecordStore>` without
//! knowing the concrete type.

mod document;
mod file;
mod memory;

pub use document::{record_from_document, value_as_string};
pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{FieldNames, MAX_BATCH_SIZE};
use crate::error::Result;
use crate::record::{CreatedAtBackfill, Record, SequenceRenumber};

/// Field a batch update writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateField {
    CreatedAt,
    SequenceNumber,
}

impl UpdateField {
    /// Document field name under the configured naming.
    pub fn field_name<'a>(&self, fields: &'a FieldNames) -> &'a str {
        match self {
            UpdateField::CreatedAt => &fields.created_at,
            UpdateField::SequenceNumber => &fields.sequence,
        }
    }
}

/// One field write against one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldUpdate {
    pub id: String,
    pub field: UpdateField,
    pub value: String,
}

impl From<&CreatedAtBackfill> for FieldUpdate {
    fn from(backfill: &CreatedAtBackfill) -> Self {
        Self {
            id: backfill.id.clone(),
            field: UpdateField::CreatedAt,
            value: backfill.value.clone(),
        }
    }
}

impl From<&SequenceRenumber> for FieldUpdate {
    fn from(renumber: &SequenceRenumber) -> Self {
        Self {
            id: renumber.id.clone(),
            field: UpdateField::SequenceNumber,
            value: renumber.new_value.clone(),
        }
    }
}

impl fmt::Display for FieldUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:?} = {}", self.id, self.field, self.value)
    }
}

/// Trait for record storage backends.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across async tasks.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Read every record of the collection into memory.
    ///
    /// Failures are reported as `RenumberError::SourceRead`.
    async fn load_all(&self) -> Result<Vec<Record>>;

    /// Apply `updates` as one atomic batch: either every write lands or none.
    ///
    /// Updating a document that does not exist fails the whole batch.
    async fn commit_batch(&self, updates: &[FieldUpdate]) -> Result<()>;

    /// Largest batch the backend accepts.
    fn max_batch_size(&self) -> usize {
        MAX_BATCH_SIZE
    }

    /// Get the backend type name for logging/debugging.
    fn store_type(&self) -> &'static str;
}
