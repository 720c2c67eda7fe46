//! Generate-plan command handler.
//!
//! Runs once a conversation has finished: builds the validated athlete
//! profile, asks the strategist for a phase strategy, expands it into
//! weekly targets, and details each week's sessions.

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::domain::dialogue::DialogState;
use crate::domain::foundation::ConversationId;
use crate::domain::planning::{
    PeriodizationEngine, PlanningError, ScheduleViolation, SessionBuilder, TrainingStrategy,
    WeeklySchedule, WeeklyTarget,
};
use crate::domain::profile::{AthleteProfile, IncompleteProfile};
use crate::ports::{
    FirstWeekAvailability, OracleError, ProfileRepository, RepositoryError, SessionPlanner,
    Strategist,
};

/// Request to turn a finished conversation into a full plan.
#[derive(Debug, Clone)]
pub struct GeneratePlanCommand {
    pub conversation_id: ConversationId,
    /// First possible training day.
    pub start_date: NaiveDate,
}

/// The complete generated plan.
#[derive(Debug, Clone)]
pub struct GeneratedPlan {
    pub strategy: TrainingStrategy,
    pub weekly_targets: Vec<WeeklyTarget>,
    pub schedules: Vec<WeeklySchedule>,
}

/// Failures while generating a plan.
#[derive(Debug, Error)]
pub enum GeneratePlanError {
    #[error("conversation {0} not found")]
    NotFound(ConversationId),

    #[error("conversation is still in progress (state {0:?})")]
    ConversationNotFinished(DialogState),

    #[error(transparent)]
    Profile(#[from] IncompleteProfile),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Planning(#[from] PlanningError),

    #[error("week {week} schedule rejected: {violation}")]
    Schedule {
        week: u32,
        violation: ScheduleViolation,
    },
}

/// Handles [`GeneratePlanCommand`].
pub struct GeneratePlanHandler {
    repository: Arc<dyn ProfileRepository>,
    strategist: Arc<dyn Strategist>,
    session_planner: Arc<dyn SessionPlanner>,
}

impl GeneratePlanHandler {
    /// Creates the handler.
    pub fn new(
        repository: Arc<dyn ProfileRepository>,
        strategist: Arc<dyn Strategist>,
        session_planner: Arc<dyn SessionPlanner>,
    ) -> Self {
        Self {
            repository,
            strategist,
            session_planner,
        }
    }

    /// Generates the full plan for a finished conversation.
    ///
    /// A strategy that breaks the phase-sum invariant is surfaced as a
    /// planning error so the caller can request regeneration; it is never
    /// silently coerced.
    #[instrument(skip(self, command), fields(conversation = %command.conversation_id))]
    pub async fn handle(
        &self,
        command: GeneratePlanCommand,
    ) -> Result<GeneratedPlan, GeneratePlanError> {
        let state = self
            .repository
            .load(command.conversation_id)
            .await?
            .ok_or(GeneratePlanError::NotFound(command.conversation_id))?;

        if state.dialog_state != DialogState::Done {
            return Err(GeneratePlanError::ConversationNotFinished(state.dialog_state));
        }

        let profile = AthleteProfile::try_from(&state)?;
        let total_weeks = profile.plan_horizon_weeks(command.start_date);
        let first_week_sessions = profile.first_week_sessions(command.start_date);
        let first_week = if first_week_sessions >= u32::from(profile.days_per_week) {
            FirstWeekAvailability::Full
        } else {
            FirstWeekAvailability::Partial {
                sessions: first_week_sessions,
            }
        };

        let strategy = self
            .strategist
            .author_strategy(&profile, total_weeks, first_week)
            .await?;
        if let Err(err) = strategy.validate() {
            warn!(%err, "strategist produced an invalid strategy");
            return Err(err.into());
        }

        let weekly_targets = PeriodizationEngine::compute_weekly_targets(&profile, &strategy)?;

        let mut schedules = Vec::with_capacity(weekly_targets.len());
        for target in &weekly_targets {
            let request = SessionBuilder::request_for_week(&profile, target);
            let schedule = self.session_planner.plan_week(&request).await?;
            SessionBuilder::validate_schedule(&request, &schedule).map_err(|violation| {
                GeneratePlanError::Schedule {
                    week: target.week_number,
                    violation,
                }
            })?;
            schedules.push(schedule);
        }

        info!(
            weeks = weekly_targets.len(),
            peak_volume = strategy.target_peak_volume,
            "plan generated"
        );

        Ok(GeneratedPlan {
            strategy,
            weekly_targets,
            schedules,
        })
    }
}
