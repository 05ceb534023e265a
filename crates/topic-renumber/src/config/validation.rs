//! Configuration validation.

use std::collections::HashSet;

use super::{Config, MAX_BATCH_SIZE};
use crate::error::{RenumberError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    // Store validation
    if config.store.r#type != "file" {
        return Err(RenumberError::Config(format!(
            "store.type must be 'file', got '{}'",
            config.store.r#type
        )));
    }
    if config.store.path.as_os_str().is_empty() {
        return Err(RenumberError::Config("store.path is required".into()));
    }
    if config.store.collection.trim().is_empty() {
        return Err(RenumberError::Config("store.collection is required".into()));
    }

    // Migration config validation
    if config.migration.batch_size == 0 {
        return Err(RenumberError::Config(
            "migration.batch_size must be at least 1".into(),
        ));
    }
    if config.migration.batch_size > MAX_BATCH_SIZE {
        return Err(RenumberError::Config(format!(
            "migration.batch_size must be at most {}, got {}",
            MAX_BATCH_SIZE, config.migration.batch_size
        )));
    }
    if config.migration.default_area.trim().is_empty() {
        return Err(RenumberError::Config(
            "migration.default_area cannot be empty".into(),
        ));
    }
    if config.migration.default_type.trim().is_empty() {
        return Err(RenumberError::Config(
            "migration.default_type cannot be empty".into(),
        ));
    }

    // Field names must be set and distinct
    let names = config.fields.all();
    if names.iter().any(|n| n.trim().is_empty()) {
        return Err(RenumberError::Config("field names cannot be empty".into()));
    }
    let unique: HashSet<&str> = names.iter().copied().collect();
    if unique.len() != names.len() {
        return Err(RenumberError::Config(
            "field names must be distinct".into(),
        ));
    }

    Ok(())
}
