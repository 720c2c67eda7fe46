//! Dialogue orchestrator.
//!
//! Drives one conversation through the state machine: classify the athlete,
//! interview until every required field is known, verify coherence, and
//! negotiate corrections when the verifier objects. Each call to
//! [`DialogOrchestrator::advance`] consumes one user message and steps the
//! machine until it needs the next reply or reaches a terminal state.
//!
//! The orchestrator never mutates the caller's state: it works on a copy
//! and hands the updated state back, so a failed oracle call simply means
//! the turn can be retried.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::foundation::StateMachine;
use crate::domain::profile::{
    CoherenceCheck, FieldRequirementResolver, FitnessTrack, ProfileField, ProfileState,
    RunnerLevel,
};
use crate::ports::{
    Classifier, Extractor, Interviewer, OracleError, OracleViolation, ProfileUpdate, Verifier,
};

use super::errors::DialogError;
use super::message::ChatMessage;
use super::negotiation::{NegotiationAction, NegotiationResolver};
use super::state::DialogState;

/// Consecutive non-progress turns tolerated before the conversation ends.
pub const MAX_FAILURES: u8 = 3;

/// Default transcript length kept in memory.
const DEFAULT_TRANSCRIPT_CAP: usize = 64;

/// How many trailing messages the extractor sees.
const EXTRACTION_WINDOW: usize = 2;

const LEVEL_CLARIFY_QUESTION: &str =
    "Are you new to running, or an experienced runner looking to improve?";

const ABORT_MESSAGE: &str = "I wasn't able to put together a coherent picture of your \
     training situation, so I can't build a safe plan right now. Feel free to start over \
     whenever you're ready.";

/// How one `advance` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStatus {
    /// The coach replied and awaits the next user message.
    Continue,
    /// The profile is complete and coherent; planning can start.
    Done,
    /// The conversation ended without a usable profile.
    Aborted,
}

/// The result of advancing a conversation by one user message.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub state: ProfileState,
    pub reply: Option<String>,
    pub status: TurnStatus,
}

/// What a single state handler decided.
enum Step {
    /// Keep stepping the machine within this turn.
    Next,
    /// Stop and hand back to the user.
    Respond {
        reply: Option<String>,
        status: TurnStatus,
    },
}

/// Finite-state dialogue engine over the oracle ports.
pub struct DialogOrchestrator {
    classifier: Arc<dyn Classifier>,
    extractor: Arc<dyn Extractor>,
    interviewer: Arc<dyn Interviewer>,
    verifier: Arc<dyn Verifier>,
    transcript_cap: usize,
}

impl DialogOrchestrator {
    /// Creates an orchestrator over the four dialogue oracles.
    pub fn new(
        classifier: Arc<dyn Classifier>,
        extractor: Arc<dyn Extractor>,
        interviewer: Arc<dyn Interviewer>,
        verifier: Arc<dyn Verifier>,
    ) -> Self {
        Self {
            classifier,
            extractor,
            interviewer,
            verifier,
            transcript_cap: DEFAULT_TRANSCRIPT_CAP,
        }
    }

    /// Overrides the transcript cap.
    pub fn with_transcript_cap(mut self, cap: usize) -> Self {
        self.transcript_cap = cap.max(EXTRACTION_WINDOW);
        self
    }

    /// Advances the conversation by one user message.
    ///
    /// Steps the machine until the coach has something to say (or a
    /// terminal state is reached) and returns the updated state alongside
    /// the reply. On error the input state is untouched and the turn can be
    /// retried.
    pub async fn advance(
        &self,
        state: &ProfileState,
        latest_user_message: &str,
    ) -> Result<TurnOutcome, DialogError> {
        let mut state = state.clone();

        let message = latest_user_message.trim();
        if !message.is_empty() {
            state.push_message(ChatMessage::user(message), self.transcript_cap);
        }

        loop {
            debug!(conversation = %state.id, state = ?state.dialog_state, "stepping dialogue");
            let step = match state.dialog_state {
                DialogState::Classify => self.run_classify(&mut state).await?,
                DialogState::Interview => self.run_interview(&mut state).await?,
                DialogState::CollectInput => {
                    self.transition(&mut state, DialogState::Extract)?;
                    Step::Next
                }
                DialogState::Extract => self.run_extract(&mut state).await?,
                DialogState::Verify => self.run_verify(&mut state).await?,
                DialogState::Negotiate => self.run_negotiate(&mut state).await?,
                DialogState::Plan => {
                    self.transition(&mut state, DialogState::Done)?;
                    Step::Next
                }
                DialogState::Abort => Step::Respond {
                    reply: Some(ABORT_MESSAGE.to_string()),
                    status: TurnStatus::Aborted,
                },
                DialogState::Done => Step::Respond {
                    reply: None,
                    status: TurnStatus::Done,
                },
            };

            if let Step::Respond { reply, status } = step {
                if let Some(text) = &reply {
                    state.push_message(ChatMessage::assistant(text), self.transcript_cap);
                }
                return Ok(TurnOutcome { state, reply, status });
            }
        }
    }

    /// Classify: judge the athlete's level from the opening message(s).
    ///
    /// A classification that comes back unusable defaults the level to
    /// unknown instead of blocking; the interview then opens with a
    /// clarifying question.
    async fn run_classify(&self, state: &mut ProfileState) -> Result<Step, DialogError> {
        let level = match self.classifier.classify(&state.transcript).await {
            Ok(classification) => {
                debug!(level = %classification.level, "athlete classified");
                classification.level
            }
            Err(OracleError::Malformed(reason)) => {
                warn!(%reason, "classifier output rejected, defaulting to unknown");
                RunnerLevel::Unknown
            }
            Err(err) => return Err(err.into()),
        };

        state.fitness = FitnessTrack::for_level(level);
        self.transition(state, DialogState::Interview)?;
        Ok(Step::Next)
    }

    /// Interview: produce the next coach question.
    async fn run_interview(&self, state: &mut ProfileState) -> Result<Step, DialogError> {
        let requirements = FieldRequirementResolver::resolve(state);

        let question = if state.level() == RunnerLevel::Unknown {
            state.awaiting_fields.clear();
            LEVEL_CLARIFY_QUESTION.to_string()
        } else if state.has_active_concerns() {
            // All data is in but the verifier objected; only the concerns
            // are on the table.
            state.awaiting_fields.clear();
            let check = state
                .coherence_check
                .clone()
                .unwrap_or_else(|| CoherenceCheck::passed(""));
            self.interviewer
                .issue_question(&requirements.known, &check)
                .await?
        } else {
            let prompt = self
                .interviewer
                .next_question(&requirements.known, &requirements.missing)
                .await?;
            // Only fields that are actually missing can be awaited.
            let mut awaiting: Vec<ProfileField> = prompt
                .awaiting_fields
                .into_iter()
                .filter(|field| requirements.missing.contains(field))
                .collect();
            if awaiting.is_empty() {
                awaiting.extend(requirements.missing.first().copied());
            }
            state.awaiting_fields = awaiting;
            prompt.question
        };

        self.transition(state, DialogState::CollectInput)?;
        Ok(Step::Respond {
            reply: Some(question),
            status: TurnStatus::Continue,
        })
    }

    /// Extract: interpret the latest user reply.
    ///
    /// In elicitation mode this pulls profile fields out of the reply; once
    /// the profile is complete and concerns are active, it reads the reply
    /// as an answer to the suggested changes instead.
    async fn run_extract(&self, state: &mut ProfileState) -> Result<Step, DialogError> {
        // An unknown level means the previous question asked for it.
        if state.level() == RunnerLevel::Unknown {
            match self.classifier.classify(&state.transcript).await {
                Ok(classification) if classification.level != RunnerLevel::Unknown => {
                    state.fitness = FitnessTrack::for_level(classification.level);
                    state.failure_count = 0;
                }
                Ok(_) | Err(OracleError::Malformed(_)) => {
                    state.failure_count += 1;
                    return self.stagnate(state);
                }
                Err(err) => return Err(err.into()),
            }
        }

        let requirements = FieldRequirementResolver::resolve(state);

        if !requirements.missing.is_empty() {
            let update = self
                .extractor
                .extract_profile(
                    &requirements.known,
                    &requirements.missing,
                    state.recent_transcript(EXTRACTION_WINDOW),
                )
                .await?;

            match apply_profile_update(state, &update, &requirements.missing) {
                Ok(populated) => {
                    let progress = if state.awaiting_fields.is_empty() {
                        !populated.is_empty()
                    } else {
                        populated
                            .iter()
                            .any(|field| state.awaiting_fields.contains(field))
                    };
                    if progress {
                        state.failure_count = 0;
                    } else {
                        state.failure_count += 1;
                    }
                }
                Err(violation) => {
                    // Contract-violating updates never touch the profile.
                    warn!(%violation, "extractor update rejected");
                    state.failure_count += 1;
                }
            }

            if FieldRequirementResolver::resolve(state).missing.is_empty() {
                self.transition(state, DialogState::Verify)?;
            } else if state.failure_count >= MAX_FAILURES {
                self.transition(state, DialogState::Abort)?;
            } else {
                self.transition(state, DialogState::Interview)?;
            }
            return Ok(Step::Next);
        }

        if state.has_active_concerns() {
            let suggested = state
                .coherence_check
                .as_ref()
                .and_then(|check| check.suggested_changes.clone())
                .unwrap_or_default();
            let draft = self
                .extractor
                .extract_change_response(&suggested, state.recent_transcript(EXTRACTION_WINDOW))
                .await?;
            match draft.resolve() {
                Ok(response) => {
                    state.user_change_response = Some(response);
                    self.transition(state, DialogState::Negotiate)?;
                    Ok(Step::Next)
                }
                Err(violation) => {
                    warn!(%violation, "change response rejected");
                    state.failure_count += 1;
                    self.stagnate_toward(state, DialogState::Interview)
                }
            }
        } else {
            // Everything known and nothing contested: go (re-)verify.
            self.transition(state, DialogState::Verify)?;
            Ok(Step::Next)
        }
    }

    /// Verify: first-pass coherence judgment on the completed profile.
    async fn run_verify(&self, state: &mut ProfileState) -> Result<Step, DialogError> {
        match &state.coherence_check {
            Some(check) if check.ok => {
                self.transition(state, DialogState::Plan)?;
                return Ok(Step::Next);
            }
            Some(_) => {
                // An unresolved check belongs to negotiation.
                self.transition(state, DialogState::Negotiate)?;
                return Ok(Step::Next);
            }
            None => {}
        }

        let draft = self.verifier.check(state).await?;
        match draft.resolve() {
            Ok(check) if check.ok => {
                state.coherence_check = Some(check);
                self.transition(state, DialogState::Plan)?;
                Ok(Step::Next)
            }
            Ok(check) => {
                debug!(reasoning = %check.reasoning, "profile flagged by verifier");
                state.coherence_check = Some(check);
                state.failure_count += 1;
                if state.failure_count >= MAX_FAILURES {
                    self.transition(state, DialogState::Abort)?;
                } else {
                    self.transition(state, DialogState::Negotiate)?;
                }
                Ok(Step::Next)
            }
            Err(violation) => {
                // A judgment we cannot trust is a stagnated turn; stay in
                // Verify so the next turn retries it.
                warn!(%violation, "verifier output rejected");
                state.failure_count += 1;
                if state.failure_count >= MAX_FAILURES {
                    self.transition(state, DialogState::Abort)?;
                    Ok(Step::Next)
                } else {
                    Ok(Step::Respond {
                        reply: None,
                        status: TurnStatus::Continue,
                    })
                }
            }
        }
    }

    /// Negotiate: put suggestions to the user or act on their answer.
    async fn run_negotiate(&self, state: &mut ProfileState) -> Result<Step, DialogError> {
        let Some(check) = state.coherence_check.clone() else {
            self.transition(state, DialogState::Plan)?;
            return Ok(Step::Next);
        };

        let Some(response) = state.user_change_response.take() else {
            // No answer captured yet: ask about the concerns first.
            self.transition(state, DialogState::Interview)?;
            return Ok(Step::Next);
        };

        match NegotiationResolver::classify(&check, &response) {
            NegotiationAction::Accept { changes } => {
                NegotiationResolver::apply_changes(state, &changes);
                state.coherence_check =
                    Some(CoherenceCheck::passed("User accepted the suggested adjustments."));
                state.failure_count = 0;
                self.transition(state, DialogState::Plan)?;
                Ok(Step::Next)
            }
            NegotiationAction::ReVerifyCounter { proposal } => {
                let draft = self
                    .verifier
                    .recheck(state, &check, Some(&proposal))
                    .await?;
                match draft.resolve() {
                    Ok(revised) if revised.ok => {
                        // The counter-proposal settles the concerns; adopt it.
                        NegotiationResolver::apply_changes(state, &proposal);
                        state.coherence_check = Some(revised);
                        state.failure_count = 0;
                        self.transition(state, DialogState::Plan)?;
                        Ok(Step::Next)
                    }
                    Ok(revised) => {
                        state.coherence_check = Some(revised);
                        self.stagnate_toward(state, DialogState::Interview)
                    }
                    Err(violation) => {
                        warn!(%violation, "recheck output rejected");
                        state.failure_count += 1;
                        self.stagnate_toward(state, DialogState::Interview)
                    }
                }
            }
            NegotiationAction::ReVerifyAmbiguous => {
                state.failure_count += 1;
                let draft = self.verifier.recheck(state, &check, None).await?;
                match draft.resolve() {
                    Ok(fresh) => state.coherence_check = Some(fresh),
                    Err(violation) => {
                        // Keep the prior concerns rather than adopt bad output.
                        warn!(%violation, "fresh suggestions rejected, keeping prior concerns");
                    }
                }
                self.stagnate_toward(state, DialogState::Interview)
            }
        }
    }

    /// Routes a non-progress turn: abort past the ceiling, otherwise
    /// continue in the interview.
    fn stagnate(&self, state: &mut ProfileState) -> Result<Step, DialogError> {
        self.stagnate_toward(state, DialogState::Interview)
    }

    fn stagnate_toward(
        &self,
        state: &mut ProfileState,
        next: DialogState,
    ) -> Result<Step, DialogError> {
        if state.failure_count >= MAX_FAILURES {
            self.transition(state, DialogState::Abort)?;
        } else {
            self.transition(state, next)?;
        }
        Ok(Step::Next)
    }

    fn transition(&self, state: &mut ProfileState, to: DialogState) -> Result<(), DialogError> {
        state.dialog_state =
            state
                .dialog_state
                .transition_to(to)
                .map_err(|_| DialogError::InvalidTransition {
                    from: state.dialog_state,
                    to,
                })?;
        Ok(())
    }
}

/// Applies an extracted update, enforcing the extractor's output contract.
///
/// Validation happens before any mutation: a violating update (a field
/// outside the requested set, both date forms, a partial goal) leaves the
/// profile exactly as it was. Returns the required fields that were
/// populated.
fn apply_profile_update(
    state: &mut ProfileState,
    update: &ProfileUpdate,
    requested: &[ProfileField],
) -> Result<Vec<ProfileField>, OracleViolation> {
    let populated = update.populated_fields();
    for field in &populated {
        if !requested.contains(field) {
            return Err(OracleViolation::UnrequestedField(*field));
        }
    }

    // Resolve every draft first so nothing is applied from a bad update.
    let goal = update.goal.clone().map(|draft| draft.resolve()).transpose()?;
    let race = update
        .recent_race
        .clone()
        .map(|draft| draft.resolve())
        .transpose()?;

    if let Some(goal) = goal {
        state.goal = Some(goal);
    }
    if let Some(days) = update.days_per_week {
        state.days_per_week = Some(days);
    }
    if let Some(unit) = update.preferred_distance_unit {
        state.preferred_distance_unit = Some(unit);
    }
    if let Some(age) = update.age {
        state.age = Some(age);
    }
    if let Some(history) = &update.injury_history {
        state.injury_history = Some(history.clone());
    }

    match &mut state.fitness {
        FitnessTrack::Beginner {
            activity_level,
            can_run_nonstop_30min,
        } => {
            if let Some(level) = update.activity_level {
                *activity_level = Some(level);
            }
            if let Some(nonstop) = update.can_run_nonstop_30min {
                *can_run_nonstop_30min = Some(nonstop);
            }
        }
        FitnessTrack::Advanced {
            distance_per_week,
            current_longest_run,
            recent_race,
        } => {
            if let Some(distance) = update.distance_per_week {
                *distance_per_week = Some(distance);
            }
            if let Some(longest) = update.current_longest_run {
                *current_longest_run = Some(longest);
            }
            if let Some(result) = race {
                *recent_race = Some(result);
            }
        }
        FitnessTrack::Unknown => {}
    }

    Ok(populated)
}
