//! Non-fatal checks over the loaded records.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::record::{parse_sequence, Record};

/// How many offending records are shown per warning.
pub const EXAMPLE_LIMIT: usize = 5;

/// A record that was sampled as an example for a warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningExample {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Result of validating a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Records without an `areaId`.
    pub missing_area: usize,
    pub missing_area_examples: Vec<WarningExample>,
    /// Records whose topic number is present but not an integer.
    pub invalid_sequence: usize,
    pub invalid_sequence_examples: Vec<WarningExample>,
}

impl ValidationSummary {
    pub fn is_clean(&self) -> bool {
        self.missing_area == 0 && self.invalid_sequence == 0
    }

    /// Emit the warnings through tracing.
    pub fn log(&self) {
        if self.is_clean() {
            info!("Validation passed: no dirty records found");
            return;
        }
        if self.missing_area > 0 {
            warn!(
                "Found {} initiatives without areaId (grouped under the default area)",
                self.missing_area
            );
            for example in &self.missing_area_examples {
                warn!("  - ID: {}", example.id);
            }
        }
        if self.invalid_sequence > 0 {
            warn!(
                "Found {} initiatives with a non-integer topicNumber (ordered as 0)",
                self.invalid_sequence
            );
            for example in &self.invalid_sequence_examples {
                warn!(
                    "  - ID: {}, topicNumber: {}",
                    example.id,
                    example.value.as_deref().unwrap_or("")
                );
            }
        }
    }
}

/// Validate every loaded record, including soft-deleted ones.
pub fn validate(records: &[Record]) -> ValidationSummary {
    let mut summary = ValidationSummary::default();

    for record in records {
        if record
            .area_id
            .as_deref()
            .map_or(true, |a| a.trim().is_empty())
        {
            summary.missing_area += 1;
            if summary.missing_area_examples.len() < EXAMPLE_LIMIT {
                summary.missing_area_examples.push(WarningExample {
                    id: record.id.clone(),
                    value: None,
                });
            }
        }

        let raw = record.sequence_str();
        if !raw.trim().is_empty() && parse_sequence(raw).is_none() {
            summary.invalid_sequence += 1;
            if summary.invalid_sequence_examples.len() < EXAMPLE_LIMIT {
                summary.invalid_sequence_examples.push(WarningExample {
                    id: record.id.clone(),
                    value: Some(raw.to_string()),
                });
            }
        }
    }

    summary
}
