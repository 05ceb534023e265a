//! In-process record store.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use super::{FieldUpdate, RecordStore, UpdateField};
use crate::error::{RenumberError, Result};
use crate::record::Record;

/// Record store holding the collection in memory.
///
/// Every committed batch is kept in a log so callers can inspect what was
/// written and in which grouping.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<Record>>,
    commits: Mutex<Vec<Vec<FieldUpdate>>>,
}

impl MemoryStore {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: Mutex::new(records),
            commits: Mutex::new(Vec::new()),
        }
    }

    /// Current contents of the collection.
    pub async fn records(&self) -> Vec<Record> {
        self.records.lock().await.clone()
    }

    /// Batches committed so far, in commit order.
    pub async fn commits(&self) -> Vec<Vec<FieldUpdate>> {
        self.commits.lock().await.clone()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn load_all(&self) -> Result<Vec<Record>> {
        Ok(self.records.lock().await.clone())
    }

    async fn commit_batch(&self, updates: &[FieldUpdate]) -> Result<()> {
        let mut records = self.records.lock().await;
        let positions: HashMap<String, usize> = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();

        if let Some(missing) = updates.iter().find(|u| !positions.contains_key(&u.id)) {
            return Err(RenumberError::store(format!(
                "document '{}' not found",
                missing.id
            )));
        }

        for update in updates {
            let record = &mut records[positions[&update.id]];
            match update.field {
                UpdateField::CreatedAt => record.created_at = Some(update.value.clone()),
                UpdateField::SequenceNumber => record.sequence_number = Some(update.value.clone()),
            }
        }

        self.commits.lock().await.push(updates.to_vec());
        Ok(())
    }

    fn store_type(&self) -> &'static str {
        "memory"
    }
}
