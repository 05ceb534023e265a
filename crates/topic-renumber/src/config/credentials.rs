//! Service account credential loading.

use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::error::{RenumberError, Result};

/// Default credential file name, resolved relative to the working directory.
pub const DEFAULT_SERVICE_ACCOUNT: &str = "service-account.json";

/// Service account key material granting access to the store's project.
#[derive(Clone, Deserialize)]
pub struct ServiceAccount {
    /// Key type (must be "service_account").
    pub r#type: String,

    /// Project the store belongs to.
    pub project_id: String,

    /// Service account identity.
    pub client_email: String,

    /// PEM-encoded private key.
    pub private_key: String,

    #[serde(default)]
    pub private_key_id: Option<String>,
}

impl fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("type", &self.r#type)
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"[REDACTED]")
            .field("private_key_id", &self.private_key_id)
            .finish()
    }
}

impl ServiceAccount {
    /// Load and validate a service account file.
    ///
    /// Every failure is a configuration error so the run stops before any
    /// store access.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RenumberError::Config(format!(
                "Service account file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            RenumberError::Config(format!(
                "Failed to read service account {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate service account JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let account: ServiceAccount = serde_json::from_str(json)
            .map_err(|e| RenumberError::Config(format!("Invalid service account: {}", e)))?;
        account.validate()?;
        Ok(account)
    }

    fn validate(&self) -> Result<()> {
        if self.r#type != "service_account" {
            return Err(RenumberError::Config(format!(
                "Invalid service account: type must be 'service_account', got '{}'",
                self.r#type
            )));
        }
        if self.project_id.trim().is_empty() {
            return Err(RenumberError::Config(
                "Invalid service account: project_id is required".into(),
            ));
        }
        if !self.client_email.contains('@') {
            return Err(RenumberError::Config(
                "Invalid service account: client_email is not an email address".into(),
            ));
        }
        if !self.private_key.contains("PRIVATE KEY") {
            return Err(RenumberError::Config(
                "Invalid service account: private_key is not a PEM key".into(),
            ));
        }
        Ok(())
    }
}
