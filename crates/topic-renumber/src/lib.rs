//! # topic-renumber
//!
//! Migrates a globally numbered collection of initiatives to independent,
//! gap-free numberings per area and initiative type.
//!
//! The library is split into a pure planning core and a thin I/O layer:
//!
//! - **Backfill** of missing `createdAt` timestamps
//! - **Partitioning** of active records by `area::type`
//! - **Renumbering** with a stable, reproducible ordering and a minimal diff
//! - **Batch execution** against a [`RecordStore`] in bounded atomic chunks
//! - **Reporting** of counts, per-partition statistics and diagnostics
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use topic_renumber::{Config, FileStore, Orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> topic_renumber::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     let store = Arc::new(FileStore::new(&config.store, config.fields.clone()));
//!     let orchestrator = Orchestrator::new(config, store);
//!     let result = orchestrator.run(true, None, |_| Ok(false)).await?;
//!     println!("{} renumber updates planned", result.report.renumber_updates);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod orchestrator;
pub mod plan;
pub mod record;
pub mod report;
pub mod store;

// Re-exports for convenient access
pub use config::{Config, FieldNames, MigrationConfig, ServiceAccount, StoreConfig};
pub use error::{RenumberError, Result};
pub use executor::{BatchExecutor, ExecutionSummary, Phase};
pub use orchestrator::{MigrationResult, Orchestrator, RunStatus};
pub use plan::{MigrationPlan, PartitionDefaults, RecordComparator};
pub use record::{
    BackfillReason, ChangeRequest, CreatedAtBackfill, PartitionKey, Record, SequenceRenumber,
};
pub use report::MigrationReport;
pub use store::{FieldUpdate, FileStore, MemoryStore, RecordStore, UpdateField};
