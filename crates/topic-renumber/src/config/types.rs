//! Configuration type definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::plan::{PartitionDefaults, DEFAULT_AREA, DEFAULT_TYPE};

/// Largest number of writes the store accepts in one atomic batch.
pub const MAX_BATCH_SIZE: usize = 500;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where the records live.
    #[serde(default)]
    pub store: StoreConfig,

    /// Migration behavior configuration.
    #[serde(default)]
    pub migration: MigrationConfig,

    /// Document field names.
    #[serde(default)]
    pub fields: FieldNames,
}

/// Record store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store type (only "file" for now).
    #[serde(default = "default_store_type")]
    pub r#type: String,

    /// Path to the collection file.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,

    /// Collection holding the initiatives.
    #[serde(default = "default_collection")]
    pub collection: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            r#type: default_store_type(),
            path: default_store_path(),
            collection: default_collection(),
        }
    }
}

/// Migration behavior configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// Writes per atomic batch (default and maximum: 500).
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Area used for records without `areaId` (default: "unknown").
    #[serde(default = "default_area")]
    pub default_area: String,

    /// Type used for records without a type (default: "strategic").
    #[serde(default = "default_type")]
    pub default_type: String,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            default_area: default_area(),
            default_type: default_type(),
        }
    }
}

impl MigrationConfig {
    /// Sentinels for the partitioner.
    pub fn partition_defaults(&self) -> PartitionDefaults {
        PartitionDefaults {
            area: self.default_area.clone(),
            record_type: self.default_type.clone(),
        }
    }
}

/// Names of the document fields the tool reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNames {
    #[serde(default = "default_area_field")]
    pub area: String,
    #[serde(default = "default_type_field")]
    pub record_type: String,
    #[serde(default = "default_sequence_field")]
    pub sequence: String,
    #[serde(default = "default_created_at_field")]
    pub created_at: String,
    #[serde(default = "default_last_update_field")]
    pub last_update: String,
    #[serde(default = "default_deleted_at_field")]
    pub deleted_at: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            area: default_area_field(),
            record_type: default_type_field(),
            sequence: default_sequence_field(),
            created_at: default_created_at_field(),
            last_update: default_last_update_field(),
            deleted_at: default_deleted_at_field(),
        }
    }
}

impl FieldNames {
    /// All names, in a fixed order.
    pub fn all(&self) -> [&str; 6] {
        [
            self.area.as_str(),
            self.record_type.as_str(),
            self.sequence.as_str(),
            self.created_at.as_str(),
            self.last_update.as_str(),
            self.deleted_at.as_str(),
        ]
    }
}

fn default_store_type() -> String {
    "file".to_string()
}

fn default_store_path() -> PathBuf {
    PathBuf::from("initiatives.json")
}

fn default_collection() -> String {
    "initiatives".to_string()
}

fn default_batch_size() -> usize {
    MAX_BATCH_SIZE
}

fn default_area() -> String {
    DEFAULT_AREA.to_string()
}

fn default_type() -> String {
    DEFAULT_TYPE.to_string()
}

fn default_area_field() -> String {
    "areaId".to_string()
}

fn default_type_field() -> String {
    "initiativeType".to_string()
}

fn default_sequence_field() -> String {
    "topicNumber".to_string()
}

fn default_created_at_field() -> String {
    "createdAt".to_string()
}

fn default_last_update_field() -> String {
    "lastUpdate".to_string()
}

fn default_deleted_at_field() -> String {
    "deletedAt".to_string()
}
