//! Classifier port: judges the athlete's experience level.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::dialogue::ChatMessage;
use crate::domain::profile::RunnerLevel;

use super::oracle::OracleError;

/// The classifier's judgment with its chain of reasoning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub level: RunnerLevel,
    pub reasoning: String,
}

impl Classification {
    /// Creates a classification.
    pub fn new(level: RunnerLevel, reasoning: impl Into<String>) -> Self {
        Self {
            level,
            reasoning: reasoning.into(),
        }
    }
}

/// Judges from the transcript whether the athlete is new to running or an
/// experienced runner. Returns `Unknown` rather than guessing.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, transcript: &[ChatMessage]) -> Result<Classification, OracleError>;
}
