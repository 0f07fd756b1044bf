//! Partition service settings.

use crate::errors::LoadError;

/// Hosted Unstructured endpoint used when none is configured.
pub const DEFAULT_PARTITION_URL: &str = "https://api.unstructuredapp.io/general/v0/general";

/// Settings for the remote partition call.
#[derive(Clone, Debug)]
pub struct PartitionConfig {
    /// Full partition endpoint URL.
    pub api_url: String,
    /// Value of the `unstructured-api-key` header.
    pub api_key: String,
    /// Partition strategy; `hi_res` runs layout detection.
    pub strategy: String,
    /// Ask for bounding-box coordinates on every element.
    pub coordinates: bool,
    /// Optional request timeout in seconds (`None` = client default).
    pub timeout_secs: Option<u64>,
}

impl PartitionConfig {
    /// High-resolution partitioning with coordinates against the hosted API.
    pub fn hi_res(api_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_PARTITION_URL.to_string(),
            api_key: api_key.into(),
            strategy: "hi_res".to_string(),
            coordinates: true,
            timeout_secs: None,
        }
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.api_key.trim().is_empty() {
            return Err(LoadError::Config("api_key is empty".into()));
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(LoadError::Config(format!(
                "api_url must start with http:// or https://, got `{}`",
                self.api_url
            )));
        }
        if self.strategy.trim().is_empty() {
            return Err(LoadError::Config("strategy is empty".into()));
        }
        Ok(())
    }
}
