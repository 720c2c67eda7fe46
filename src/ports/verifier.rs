//! Verifier port: judges profile coherence.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::profile::{CoherenceCheck, ProfileState, SuggestedChanges};

use super::oracle::{OracleError, OracleViolation, SuggestedChangesDraft};

/// Wire form of a coherence judgment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoherenceCheckDraft {
    pub ok: bool,
    pub reasoning: String,
    pub suggested_changes: Option<SuggestedChangesDraft>,
}

impl CoherenceCheckDraft {
    /// Creates a passing draft.
    pub fn passed(reasoning: impl Into<String>) -> Self {
        Self {
            ok: true,
            reasoning: reasoning.into(),
            suggested_changes: None,
        }
    }

    /// Resolves into a domain check; any replacement goal must be complete.
    pub fn resolve(self) -> Result<CoherenceCheck, OracleViolation> {
        let suggested_changes = self
            .suggested_changes
            .map(|draft| draft.resolve())
            .transpose()?;
        Ok(CoherenceCheck {
            ok: self.ok,
            reasoning: self.reasoning,
            suggested_changes,
        })
    }
}

/// Judges whether goal, fitness, and logistics are mutually consistent and
/// safe, and proposes concrete corrections when they are not.
#[async_trait]
pub trait Verifier: Send + Sync {
    /// First-pass judgment of a completed profile.
    async fn check(&self, profile: &ProfileState) -> Result<CoherenceCheckDraft, OracleError>;

    /// Re-judgment during negotiation. With a counter-proposal present the
    /// question is whether it resolves the prior concerns; without one the
    /// latest messages are mined for fresh suggestions.
    async fn recheck(
        &self,
        profile: &ProfileState,
        prior: &CoherenceCheck,
        counter_proposal: Option<&SuggestedChanges>,
    ) -> Result<CoherenceCheckDraft, OracleError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::GoalDraft;

    #[test]
    fn passing_draft_resolves_clean() {
        let check = CoherenceCheckDraft::passed("everything lines up").resolve().unwrap();
        assert!(check.ok);
        assert!(check.suggested_changes.is_none());
    }

    #[test]
    fn draft_with_partial_goal_is_rejected() {
        let draft = CoherenceCheckDraft {
            ok: false,
            reasoning: "goal must change".to_string(),
            suggested_changes: Some(SuggestedChangesDraft {
                goal: Some(GoalDraft::default()),
                days_per_week: None,
                intensity: None,
            }),
        };
        assert_eq!(draft.resolve(), Err(OracleViolation::IncompleteGoal));
    }
}
