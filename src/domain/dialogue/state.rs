//! Dialogue state machine.
//!
//! Every conversation moves through an explicit, named set of states with a
//! fixed transition table, so each transition can be tested in isolation.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// The current state of a coaching conversation.
///
/// The normal flow is `Classify -> Interview -> CollectInput -> Extract`,
/// looping through the interview until every required field is known, then
/// `Verify` and, when concerns arise, `Negotiate`. `Plan`, `Done` and
/// `Abort` end the dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DialogState {
    /// Judging whether the athlete is a beginner or experienced runner.
    #[default]
    Classify,

    /// Formulating the next question for the athlete.
    Interview,

    /// Waiting for the athlete's reply.
    CollectInput,

    /// Pulling structured profile data out of the latest reply.
    Extract,

    /// Judging whether the completed profile is coherent and safe.
    Verify,

    /// Putting suggested corrections to the athlete and reading the answer.
    Negotiate,

    /// Profile accepted; handing off to plan generation.
    Plan,

    /// Too many turns without progress; conversation ends without a plan.
    Abort,

    /// Conversation finished with a coherent profile.
    Done,
}

impl DialogState {
    /// True for states that end the conversation.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Abort | Self::Done)
    }

    /// True while the dialogue still expects user input at some point.
    pub fn is_active(&self) -> bool {
        !self.is_final()
    }
}

impl StateMachine for DialogState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use DialogState::*;
        matches!(
            (self, target),
            // Classification always leads into the interview.
            (Classify, Interview) |
            // Ask, wait, extract.
            (Interview, CollectInput) |
            (CollectInput, Extract) |
            // Extraction outcomes: profile complete, keep asking,
            // negotiation reply captured, or out of patience.
            (Extract, Verify) |
            (Extract, Interview) |
            (Extract, Negotiate) |
            (Extract, Abort) |
            // Verification outcomes.
            (Verify, Plan) |
            (Verify, Negotiate) |
            (Verify, Abort) |
            // Negotiation outcomes.
            (Negotiate, Plan) |
            (Negotiate, Interview) |
            (Negotiate, Abort) |
            // Hand-off.
            (Plan, Done)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use DialogState::*;
        match self {
            Classify => vec![Interview],
            Interview => vec![CollectInput],
            CollectInput => vec![Extract],
            Extract => vec![Verify, Interview, Negotiate, Abort],
            Verify => vec![Plan, Negotiate, Abort],
            Negotiate => vec![Plan, Interview, Abort],
            Plan => vec![Done],
            Abort => vec![],
            Done => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [DialogState; 9] = [
        DialogState::Classify,
        DialogState::Interview,
        DialogState::CollectInput,
        DialogState::Extract,
        DialogState::Verify,
        DialogState::Negotiate,
        DialogState::Plan,
        DialogState::Abort,
        DialogState::Done,
    ];

    #[test]
    fn default_state_is_classify() {
        assert_eq!(DialogState::default(), DialogState::Classify);
    }

    #[test]
    fn serializes_to_snake_case() {
        let json = serde_json::to_string(&DialogState::CollectInput).unwrap();
        assert_eq!(json, "\"collect_input\"");
    }

    #[test]
    fn classify_only_enters_interview() {
        assert_eq!(
            DialogState::Classify.valid_transitions(),
            vec![DialogState::Interview]
        );
    }

    #[test]
    fn extract_can_branch_four_ways() {
        let targets = DialogState::Extract.valid_transitions();
        assert!(targets.contains(&DialogState::Verify));
        assert!(targets.contains(&DialogState::Interview));
        assert!(targets.contains(&DialogState::Negotiate));
        assert!(targets.contains(&DialogState::Abort));
    }

    #[test]
    fn negotiate_cannot_reenter_verify() {
        assert!(!DialogState::Negotiate.can_transition_to(&DialogState::Verify));
    }

    #[test]
    fn plan_only_completes() {
        assert_eq!(DialogState::Plan.valid_transitions(), vec![DialogState::Done]);
    }

    #[test]
    fn abort_and_done_are_terminal() {
        assert!(DialogState::Abort.is_terminal());
        assert!(DialogState::Done.is_terminal());
        assert!(DialogState::Abort.is_final());
        assert!(DialogState::Done.is_final());
        assert!(!DialogState::Verify.is_final());
    }

    #[test]
    fn transition_to_rejects_skipping_ahead() {
        let result = DialogState::Classify.transition_to(DialogState::Verify);
        assert!(result.is_err());
    }

    #[test]
    fn valid_transitions_matches_can_transition_to() {
        for state in ALL_STATES {
            for target in state.valid_transitions() {
                assert!(
                    state.can_transition_to(&target),
                    "{:?} -> {:?} should be valid",
                    state,
                    target
                );
            }
            for target in ALL_STATES {
                if !state.valid_transitions().contains(&target) {
                    assert!(
                        !state.can_transition_to(&target),
                        "{:?} -> {:?} should be invalid",
                        state,
                        target
                    );
                }
            }
        }
    }
}
