//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is read with the
//! `STRIDE_COACH` prefix and nested values use double underscores as
//! separators, e.g. `STRIDE_COACH__ORACLE__TIMEOUT_SECS=60`.

mod engine;
mod error;
mod oracle;

pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};
pub use oracle::OracleConfig;

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Oracle call budgets (timeout, retries).
    #[serde(default)]
    pub oracle: OracleConfig,

    /// Dialogue engine tuning.
    #[serde(default)]
    pub engine: EngineConfig,
}

impl AppConfig {
    /// Loads configuration from the environment.
    ///
    /// Reads a `.env` file first when present, then environment variables
    /// with the `STRIDE_COACH` prefix. Every value has a default, so an
    /// empty environment yields a working configuration.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("STRIDE_COACH")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.oracle.validate()?;
        self.engine.validate()?;
        Ok(())
    }
}
