//! Interviewer port: turns profile gaps and concerns into questions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::profile::{CoherenceCheck, KnownField, ProfileField};

use super::oracle::OracleError;

/// The next question together with the fields it actively solicits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewPrompt {
    pub question: String,
    /// The subset of missing fields this question asks about.
    pub awaiting_fields: Vec<ProfileField>,
}

/// Formulates coach questions.
#[async_trait]
pub trait Interviewer: Send + Sync {
    /// Asks for one or two of the missing fields, never re-asking known
    /// ones.
    async fn next_question(
        &self,
        known: &[KnownField],
        missing: &[ProfileField],
    ) -> Result<InterviewPrompt, OracleError>;

    /// Puts an active coherence concern and its suggested changes to the
    /// athlete, without soliciting any other data.
    async fn issue_question(
        &self,
        known: &[KnownField],
        check: &CoherenceCheck,
    ) -> Result<String, OracleError>;
}
