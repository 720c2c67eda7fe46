//! Scripted oracles for testing and demos.
//!
//! Each oracle consumes a queue of pre-configured responses (including
//! injected errors) and falls back to a sensible default once the queue is
//! empty, so conversations and plans can be driven end to end without any
//! model behind them. Call counts are tracked for assertions.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::domain::dialogue::ChatMessage;
use crate::domain::planning::{
    Phase, PhaseName, RunType, RunningSession, StrengthSession, TrainingStrategy,
    WeekPlanRequest, WeeklySchedule,
};
use crate::domain::profile::{
    AthleteProfile, CoherenceCheck, GoalKind, KnownField, ProfileField, ProfileState,
    RunnerLevel, SuggestedChanges, Weekday,
};
use crate::ports::{
    Classification, Classifier, CoherenceCheckDraft, Extractor, FirstWeekAvailability,
    InterviewPrompt, Interviewer, OracleError, ProfileUpdate, SessionPlanner, Strategist,
    UserChangeResponseDraft, Verifier,
};

static QUESTION_TEMPLATES: Lazy<HashMap<ProfileField, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (ProfileField::Goal, "What are you training for?"),
        (
            ProfileField::DaysPerWeek,
            "How many days a week can you run?",
        ),
        (
            ProfileField::PreferredDistanceUnit,
            "Do you think in kilometers or miles?",
        ),
        (ProfileField::Age, "How old are you?"),
        (
            ProfileField::InjuryHistory,
            "Any injuries I should know about?",
        ),
        (
            ProfileField::ActivityLevel,
            "How active are you day to day, and can you run 30 minutes without stopping?",
        ),
        (
            ProfileField::DistancePerWeek,
            "How many kilometers or miles do you run in a typical week?",
        ),
        (
            ProfileField::RecentRace,
            "Tell me about a recent race: distance and finish time.",
        ),
    ])
});

fn pop<T>(queue: &Mutex<VecDeque<Result<T, OracleError>>>) -> Option<Result<T, OracleError>> {
    queue.lock().ok().and_then(|mut q| q.pop_front())
}

/// Scripted level classifier.
pub struct ScriptedClassifier {
    results: Mutex<VecDeque<Result<Classification, OracleError>>>,
    fallback_level: RunnerLevel,
    calls: Mutex<usize>,
}

impl ScriptedClassifier {
    /// Always answers with `level` once the queue is empty.
    pub fn always(level: RunnerLevel) -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            fallback_level: level,
            calls: Mutex::new(0),
        }
    }

    /// Queues a classification.
    pub fn with_result(self, level: RunnerLevel) -> Self {
        if let Ok(mut queue) = self.results.lock() {
            queue.push_back(Ok(Classification::new(level, "scripted")));
        }
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: OracleError) -> Self {
        if let Ok(mut queue) = self.results.lock() {
            queue.push_back(Err(error));
        }
        self
    }

    /// Number of classification calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| *c).unwrap_or(0)
    }
}

#[async_trait]
impl Classifier for ScriptedClassifier {
    async fn classify(&self, _transcript: &[ChatMessage]) -> Result<Classification, OracleError> {
        if let Ok(mut calls) = self.calls.lock() {
            *calls += 1;
        }
        pop(&self.results)
            .unwrap_or_else(|| Ok(Classification::new(self.fallback_level, "fallback")))
    }
}

/// Scripted profile/change-response extractor.
#[derive(Default)]
pub struct ScriptedExtractor {
    profile_updates: Mutex<VecDeque<Result<ProfileUpdate, OracleError>>>,
    change_responses: Mutex<VecDeque<Result<UserChangeResponseDraft, OracleError>>>,
}

impl ScriptedExtractor {
    /// Creates an extractor with empty queues (extracts nothing).
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a profile update.
    pub fn with_update(self, update: ProfileUpdate) -> Self {
        if let Ok(mut queue) = self.profile_updates.lock() {
            queue.push_back(Ok(update));
        }
        self
    }

    /// Queues a profile-extraction error.
    pub fn with_update_error(self, error: OracleError) -> Self {
        if let Ok(mut queue) = self.profile_updates.lock() {
            queue.push_back(Err(error));
        }
        self
    }

    /// Queues a change response.
    pub fn with_change_response(self, response: UserChangeResponseDraft) -> Self {
        if let Ok(mut queue) = self.change_responses.lock() {
            queue.push_back(Ok(response));
        }
        self
    }
}

#[async_trait]
impl Extractor for ScriptedExtractor {
    async fn extract_profile(
        &self,
        _known: &[KnownField],
        _missing: &[ProfileField],
        _recent: &[ChatMessage],
    ) -> Result<ProfileUpdate, OracleError> {
        pop(&self.profile_updates).unwrap_or_else(|| Ok(ProfileUpdate::default()))
    }

    async fn extract_change_response(
        &self,
        _suggested: &SuggestedChanges,
        _recent: &[ChatMessage],
    ) -> Result<UserChangeResponseDraft, OracleError> {
        pop(&self.change_responses).unwrap_or_else(|| Ok(UserChangeResponseDraft::default()))
    }
}

/// Template-driven interviewer: asks for the first one or two missing
/// fields, never re-asking known ones.
#[derive(Default)]
pub struct ScriptedInterviewer;

impl ScriptedInterviewer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Interviewer for ScriptedInterviewer {
    async fn next_question(
        &self,
        _known: &[KnownField],
        missing: &[ProfileField],
    ) -> Result<InterviewPrompt, OracleError> {
        let awaiting: Vec<ProfileField> = missing.iter().take(2).copied().collect();
        let question = awaiting
            .iter()
            .filter_map(|field| QUESTION_TEMPLATES.get(field))
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        Ok(InterviewPrompt {
            question: if question.is_empty() {
                "Tell me more about your running.".to_string()
            } else {
                question
            },
            awaiting_fields: awaiting,
        })
    }

    async fn issue_question(
        &self,
        _known: &[KnownField],
        check: &CoherenceCheck,
    ) -> Result<String, OracleError> {
        Ok(format!(
            "Before we plan anything: {} Would you be open to the adjustment I suggested?",
            check.reasoning
        ))
    }
}

/// Scripted coherence verifier.
#[derive(Default)]
pub struct ScriptedVerifier {
    checks: Mutex<VecDeque<Result<CoherenceCheckDraft, OracleError>>>,
    rechecks: Mutex<VecDeque<Result<CoherenceCheckDraft, OracleError>>>,
}

impl ScriptedVerifier {
    /// Creates a verifier that passes everything once its queues are empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a first-pass judgment.
    pub fn with_check(self, draft: CoherenceCheckDraft) -> Self {
        if let Ok(mut queue) = self.checks.lock() {
            queue.push_back(Ok(draft));
        }
        self
    }

    /// Queues a negotiation re-judgment.
    pub fn with_recheck(self, draft: CoherenceCheckDraft) -> Self {
        if let Ok(mut queue) = self.rechecks.lock() {
            queue.push_back(Ok(draft));
        }
        self
    }

    /// Queues a first-pass error.
    pub fn with_check_error(self, error: OracleError) -> Self {
        if let Ok(mut queue) = self.checks.lock() {
            queue.push_back(Err(error));
        }
        self
    }
}

#[async_trait]
impl Verifier for ScriptedVerifier {
    async fn check(&self, _profile: &ProfileState) -> Result<CoherenceCheckDraft, OracleError> {
        pop(&self.checks).unwrap_or_else(|| Ok(CoherenceCheckDraft::passed("scripted pass")))
    }

    async fn recheck(
        &self,
        _profile: &ProfileState,
        _prior: &CoherenceCheck,
        _counter_proposal: Option<&SuggestedChanges>,
    ) -> Result<CoherenceCheckDraft, OracleError> {
        pop(&self.rechecks).unwrap_or_else(|| Ok(CoherenceCheckDraft::passed("scripted pass")))
    }
}

/// Scripted strategist: either a fixed strategy or a simple goal-based
/// default that always satisfies the phase-sum invariant.
#[derive(Default)]
pub struct ScriptedStrategist {
    fixed: Mutex<Option<TrainingStrategy>>,
}

impl ScriptedStrategist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always returns this strategy, ignoring the week budget.
    pub fn with_strategy(self, strategy: TrainingStrategy) -> Self {
        if let Ok(mut fixed) = self.fixed.lock() {
            *fixed = Some(strategy);
        }
        self
    }

    fn default_strategy(profile: &AthleteProfile, total_weeks: u32) -> TrainingStrategy {
        let (peak_volume, longest_run) = match profile.goal.kind {
            GoalKind::Marathon => (60, 30),
            GoalKind::HalfMarathon => (45, 18),
            GoalKind::TenK => (35, 12),
            GoalKind::FiveK => (25, 8),
            GoalKind::Fitness | GoalKind::LoseWeight => (30, 10),
        };

        let taper = match total_weeks {
            w if w >= 12 => 2,
            w if w >= 6 => 1,
            _ => 0,
        };
        let peak = match total_weeks.saturating_sub(taper) {
            w if w >= 8 => 2,
            w if w >= 4 => 1,
            _ => 0,
        };
        let build = (total_weeks - taper - peak) / 2;
        let base = total_weeks - taper - peak - build;

        let mut phases = Vec::new();
        if base > 0 {
            phases.push(Phase::new(PhaseName::Base, base, "aerobic development"));
        }
        if build > 0 {
            phases.push(Phase::new(PhaseName::Build, build, "volume and specificity"));
        }
        if peak > 0 {
            phases.push(Phase::new(PhaseName::Peak, peak, "highest load"));
        }
        if taper > 0 {
            phases.push(Phase::new(PhaseName::Taper, taper, "freshen up for race day"));
        }

        TrainingStrategy {
            overview: format!(
                "A {}-week progression toward your {} goal.",
                total_weeks, profile.goal.kind
            ),
            target_peak_volume: peak_volume,
            target_longest_run: longest_run,
            total_weeks_available: total_weeks,
            phases,
        }
    }
}

#[async_trait]
impl Strategist for ScriptedStrategist {
    async fn author_strategy(
        &self,
        profile: &AthleteProfile,
        total_weeks_available: u32,
        _first_week: FirstWeekAvailability,
    ) -> Result<TrainingStrategy, OracleError> {
        if let Ok(fixed) = self.fixed.lock() {
            if let Some(strategy) = fixed.clone() {
                return Ok(strategy);
            }
        }
        Ok(Self::default_strategy(profile, total_weeks_available))
    }
}

/// Scripted session planner: spreads the weekly volume across the allowed
/// days with the long run pinned to the long-run day.
#[derive(Default)]
pub struct ScriptedSessionPlanner;

impl ScriptedSessionPlanner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SessionPlanner for ScriptedSessionPlanner {
    async fn plan_week(&self, request: &WeekPlanRequest) -> Result<WeeklySchedule, OracleError> {
        let volume = f64::from(request.target.total_volume);
        let long_run = f64::from(request.target.long_run_distance).min(volume);

        let other_days: Vec<Weekday> = request
            .running_days
            .iter()
            .copied()
            .filter(|day| *day != request.long_run_day)
            .collect();

        let mut running_sessions = Vec::new();
        if long_run > 0.0 {
            running_sessions.push(RunningSession {
                day: request.long_run_day,
                run_type: RunType::LongRun,
                distance: long_run,
                workout_description: "Relaxed long run, conversational pace.".to_string(),
                notes: None,
            });
        }

        let remainder = volume - long_run;
        if remainder > 0.0 && !other_days.is_empty() {
            let per_day = remainder / other_days.len() as f64;
            for day in other_days {
                running_sessions.push(RunningSession {
                    day,
                    run_type: if request.target.is_recovery_week {
                        RunType::Recovery
                    } else {
                        RunType::Easy
                    },
                    distance: per_day,
                    workout_description: "Easy aerobic run.".to_string(),
                    notes: None,
                });
            }
        }

        let strength_sessions = match &request.strength {
            Some(strength) => (0..strength.sessions_per_week)
                .map(|_| StrengthSession {
                    day: Weekday::Monday,
                    duration_minutes: 30,
                    exercises: vec![],
                })
                .collect(),
            None => Vec::new(),
        };

        Ok(WeeklySchedule {
            week_number: request.target.week_number,
            phase_name: request.target.phase_name.to_string(),
            weekly_volume_target: volume,
            weekly_long_run_target: f64::from(request.target.long_run_distance),
            week_overview: format!(
                "Week {} of the {} phase.",
                request.target.week_number, request.target.phase_name
            ),
            running_sessions,
            strength_sessions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::planning::{SessionBuilder, WeeklyTarget};
    use crate::domain::profile::{ActivityLevel, DistanceUnit, FitnessLevel, Goal};

    #[tokio::test]
    async fn classifier_consumes_queue_then_falls_back() {
        let classifier = ScriptedClassifier::always(RunnerLevel::Advanced)
            .with_result(RunnerLevel::Unknown)
            .with_error(OracleError::unavailable("down"));

        assert_eq!(
            classifier.classify(&[]).await.unwrap().level,
            RunnerLevel::Unknown
        );
        assert!(classifier.classify(&[]).await.is_err());
        assert_eq!(
            classifier.classify(&[]).await.unwrap().level,
            RunnerLevel::Advanced
        );
        assert_eq!(classifier.call_count(), 3);
    }

    #[tokio::test]
    async fn interviewer_asks_for_at_most_two_fields() {
        let interviewer = ScriptedInterviewer::new();
        let prompt = interviewer
            .next_question(
                &[],
                &[
                    ProfileField::Goal,
                    ProfileField::Age,
                    ProfileField::DaysPerWeek,
                ],
            )
            .await
            .unwrap();
        assert_eq!(prompt.awaiting_fields.len(), 2);
        assert!(prompt.question.contains("training for"));
    }

    #[tokio::test]
    async fn extractor_defaults_to_empty_update() {
        let extractor = ScriptedExtractor::new();
        let update = extractor.extract_profile(&[], &[], &[]).await.unwrap();
        assert!(update.is_empty());
    }

    #[tokio::test]
    async fn default_strategy_satisfies_phase_sum() {
        let profile = AthleteProfile {
            age: 30,
            injury_history: vec![],
            unit: DistanceUnit::Kilometers,
            days_per_week: 4,
            goal: Goal::new(GoalKind::Marathon),
            fitness: FitnessLevel::Beginner {
                activity_level: ActivityLevel::VeryActive,
                can_run_nonstop_30min: true,
            },
            logistics: None,
            strength: None,
            intensity_preference: None,
        };
        for weeks in 1..=30 {
            let strategy = ScriptedStrategist::new()
                .author_strategy(&profile, weeks, FirstWeekAvailability::Full)
                .await
                .unwrap();
            assert!(
                strategy.validate().is_ok(),
                "invalid default strategy for {} weeks",
                weeks
            );
        }
    }

    #[tokio::test]
    async fn planned_week_passes_builder_validation() {
        let profile = AthleteProfile {
            age: 30,
            injury_history: vec![],
            unit: DistanceUnit::Kilometers,
            days_per_week: 3,
            goal: Goal::new(GoalKind::HalfMarathon),
            fitness: FitnessLevel::Advanced {
                average_weekly_distance: 35.0,
                current_longest_run: 14.0,
                recent_race: None,
            },
            logistics: None,
            strength: None,
            intensity_preference: None,
        };
        let target = WeeklyTarget {
            week_number: 3,
            phase_name: PhaseName::Build,
            is_recovery_week: false,
            total_volume: 40,
            long_run_distance: 16,
        };
        let request = SessionBuilder::request_for_week(&profile, &target);
        let schedule = ScriptedSessionPlanner::new()
            .plan_week(&request)
            .await
            .unwrap();
        assert!(SessionBuilder::validate_schedule(&request, &schedule).is_ok());
    }
}
