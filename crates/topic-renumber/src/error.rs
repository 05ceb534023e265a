//! Error types for the renumbering library.

use thiserror::Error;

use crate::executor::Phase;

/// Exit code for configuration and credential errors.
pub const EXIT_CONFIG_ERROR: u8 = 1;
/// Exit code for failures reading records from the store.
pub const EXIT_SOURCE_READ_ERROR: u8 = 3;
/// Exit code for a batch that failed to commit.
pub const EXIT_BATCH_COMMIT_ERROR: u8 = 4;
/// Exit code for other record store failures.
pub const EXIT_STORE_ERROR: u8 = 5;
/// Exit code for file system errors.
pub const EXIT_IO_ERROR: u8 = 7;
/// Exit code when the run was interrupted by a signal.
pub const EXIT_CANCELLED: u8 = 130;

/// Main error type for renumbering operations.
#[derive(Error, Debug)]
pub enum RenumberError {
    /// Configuration error (invalid YAML, missing or invalid credentials, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Bulk read of the collection failed
    #[error("Failed to read records: {0}")]
    SourceRead(String),

    /// A chunk failed to commit; earlier chunks stay applied
    #[error(
        "Batch {batch} of {phase} phase failed to commit ({committed} updates already applied): {message}"
    )]
    BatchCommit {
        phase: Phase,
        batch: usize,
        committed: usize,
        message: String,
    },

    /// Record store rejected an operation
    #[error("Store error: {0}")]
    Store(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Run was cancelled (SIGINT, etc.)
    #[error("Migration cancelled")]
    Cancelled,
}

impl RenumberError {
    /// Create a SourceRead error.
    pub fn source_read(message: impl Into<String>) -> Self {
        RenumberError::SourceRead(message.into())
    }

    /// Create a Store error.
    pub fn store(message: impl Into<String>) -> Self {
        RenumberError::Store(message.into())
    }

    /// Create a BatchCommit error.
    pub fn batch_commit(
        phase: Phase,
        batch: usize,
        committed: usize,
        message: impl Into<String>,
    ) -> Self {
        RenumberError::BatchCommit {
            phase,
            batch,
            committed,
            message: message.into(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            RenumberError::Config(_) | RenumberError::Yaml(_) | RenumberError::Json(_) => {
                EXIT_CONFIG_ERROR
            }
            RenumberError::SourceRead(_) => EXIT_SOURCE_READ_ERROR,
            RenumberError::BatchCommit { .. } => EXIT_BATCH_COMMIT_ERROR,
            RenumberError::Store(_) => EXIT_STORE_ERROR,
            RenumberError::Io(_) => EXIT_IO_ERROR,
            RenumberError::Cancelled => EXIT_CANCELLED,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for renumbering operations.
pub type Result<T> = std::result::Result<T, RenumberError>;
