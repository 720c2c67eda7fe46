//! Dialogue engine configuration.

use serde::Deserialize;

use super::error::ValidationError;

/// Tuning knobs for the dialogue engine.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Maximum transcript messages kept per conversation; the oldest are
    /// dropped beyond this.
    #[serde(default = "default_transcript_cap")]
    pub transcript_cap: usize,
}

impl EngineConfig {
    /// Validates the engine configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.transcript_cap < 4 {
            return Err(ValidationError::invalid(
                "engine.transcript_cap",
                "must keep at least 4 messages",
            ));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            transcript_cap: default_transcript_cap(),
        }
    }
}

fn default_transcript_cap() -> usize {
    64
}
