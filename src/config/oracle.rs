//! Oracle call configuration.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Budgets applied to external judgment calls.
#[derive(Debug, Clone, Deserialize)]
pub struct OracleConfig {
    /// Per-call timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries for retryable failures.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

impl OracleConfig {
    /// The timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validates the oracle configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 {
            return Err(ValidationError::invalid(
                "oracle.timeout_secs",
                "must be at least 1 second",
            ));
        }
        Ok(())
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_timeout() -> u64 {
    120
}

fn default_retries() -> u32 {
    3
}
