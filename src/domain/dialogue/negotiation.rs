//! Negotiation resolution.
//!
//! When the verifier flags a profile, its suggested changes are put to the
//! user, who may accept them, counter with their own proposal, or answer
//! ambiguously. This module classifies that reply and applies accepted
//! changes, as a pure function the orchestrator invokes from the Negotiate
//! state.

use crate::domain::profile::{CoherenceCheck, ProfileState, SuggestedChanges, UserChangeResponse};

/// The resolved outcome of a negotiation reply.
#[derive(Debug, Clone, PartialEq)]
pub enum NegotiationAction {
    /// The user accepted; apply the original suggestions and move on.
    Accept { changes: SuggestedChanges },

    /// The user countered; the proposal must be re-judged against the
    /// original concerns.
    ReVerifyCounter { proposal: SuggestedChanges },

    /// Neither acceptance nor a usable counter-proposal. The concerns must
    /// be re-judged from the latest message, and the turn counts as
    /// non-progress: refusing without an alternative gives the coach
    /// nothing to plan with, so the failure ceiling still applies.
    ReVerifyAmbiguous,
}

/// Classifies and applies negotiation replies.
pub struct NegotiationResolver;

impl NegotiationResolver {
    /// Classifies the user's reply to suggested changes.
    ///
    /// Acceptance always dominates: a counter-proposal sent alongside an
    /// acceptance is ignored.
    pub fn classify(check: &CoherenceCheck, response: &UserChangeResponse) -> NegotiationAction {
        if response.accepted {
            let changes = check.suggested_changes.clone().unwrap_or_default();
            return NegotiationAction::Accept { changes };
        }

        match &response.counter_proposal {
            Some(proposal) if !proposal.is_empty() => NegotiationAction::ReVerifyCounter {
                proposal: proposal.clone(),
            },
            _ => NegotiationAction::ReVerifyAmbiguous,
        }
    }

    /// Overwrites profile fields with every non-null member of `changes`.
    pub fn apply_changes(state: &mut ProfileState, changes: &SuggestedChanges) {
        if let Some(goal) = &changes.goal {
            state.goal = Some(goal.clone());
        }
        if let Some(days) = changes.days_per_week {
            state.days_per_week = Some(days);
        }
        if let Some(intensity) = changes.intensity {
            state.intensity_preference = Some(intensity);
        }
    }
}
