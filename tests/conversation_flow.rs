//! End-to-end conversation flows over scripted oracles.

use std::sync::Arc;

use chrono::NaiveDate;

use stride_coach::adapters::oracles::{
    ScriptedClassifier, ScriptedExtractor, ScriptedInterviewer, ScriptedSessionPlanner,
    ScriptedStrategist, ScriptedVerifier,
};
use stride_coach::adapters::persistence::InMemoryProfileRepository;
use stride_coach::application::handlers::{
    AdvanceConversationCommand, AdvanceConversationHandler, GeneratePlanCommand,
    GeneratePlanHandler,
};
use stride_coach::domain::dialogue::{DialogOrchestrator, DialogState, TurnStatus};
use stride_coach::domain::foundation::ConversationId;
use stride_coach::domain::profile::{DistanceUnit, GoalKind, RaceDistance, RunnerLevel};
use stride_coach::ports::{
    CoherenceCheckDraft, GoalDraft, ProfileRepository, ProfileUpdate, RaceRecordDraft,
    SuggestedChangesDraft, TargetDateDraft, UserChangeResponseDraft,
};

fn handler(
    repository: Arc<InMemoryProfileRepository>,
    classifier: ScriptedClassifier,
    extractor: ScriptedExtractor,
    verifier: ScriptedVerifier,
) -> AdvanceConversationHandler {
    let orchestrator = DialogOrchestrator::new(
        Arc::new(classifier),
        Arc::new(extractor),
        Arc::new(ScriptedInterviewer::new()),
        Arc::new(verifier),
    );
    AdvanceConversationHandler::new(repository, orchestrator)
}

async fn advance(
    handler: &AdvanceConversationHandler,
    id: ConversationId,
    message: &str,
) -> (Option<String>, TurnStatus) {
    let result = handler
        .handle(AdvanceConversationCommand {
            conversation_id: id,
            message: message.to_string(),
        })
        .await
        .expect("turn should succeed");
    (result.reply, result.status)
}

/// Everything an advanced runner needs, in one extraction.
fn full_advanced_update() -> ProfileUpdate {
    ProfileUpdate {
        goal: Some(GoalDraft {
            kind: Some(GoalKind::HalfMarathon),
            target_date: TargetDateDraft {
                relative: Some("in about three months".to_string()),
                ..Default::default()
            },
            target_time_minutes: None,
        }),
        days_per_week: Some(4),
        preferred_distance_unit: Some(DistanceUnit::Kilometers),
        age: Some(31),
        injury_history: Some(vec![]),
        distance_per_week: Some(36.0),
        current_longest_run: Some(14.0),
        recent_race: Some(RaceRecordDraft {
            distance: Some(RaceDistance::TenK),
            finish_time_minutes: Some(46.5),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn failing_check() -> CoherenceCheckDraft {
    CoherenceCheckDraft {
        ok: false,
        reasoning: "four days of running is safer for this goal than two".to_string(),
        suggested_changes: Some(SuggestedChangesDraft {
            goal: None,
            days_per_week: Some(4),
            intensity: None,
        }),
    }
}

#[tokio::test]
async fn happy_path_reaches_done_and_generates_a_plan() {
    let repository = Arc::new(InMemoryProfileRepository::new());
    let handler = handler(
        repository.clone(),
        ScriptedClassifier::always(RunnerLevel::Advanced),
        ScriptedExtractor::new().with_update(full_advanced_update()),
        ScriptedVerifier::new(),
    );
    let id = ConversationId::new();

    let (reply, status) = advance(&handler, id, "I run 36km a week, eyeing a half").await;
    assert_eq!(status, TurnStatus::Continue);
    assert!(reply.is_some());

    let (_, status) = advance(
        &handler,
        id,
        "Half marathon in about three months, 4 days a week, 31, kilometers, no injuries, \
         recent 10k in 46:30",
    )
    .await;
    assert_eq!(status, TurnStatus::Done);

    let stored = repository.load(id).await.unwrap().unwrap();
    assert_eq!(stored.dialog_state, DialogState::Done);
    assert!(stored.coherence_check.as_ref().unwrap().ok);
    assert_eq!(stored.failure_count, 0);

    let planner = GeneratePlanHandler::new(
        repository,
        Arc::new(ScriptedStrategist::new()),
        Arc::new(ScriptedSessionPlanner::new()),
    );
    let plan = planner
        .handle(GeneratePlanCommand {
            conversation_id: id,
            start_date: NaiveDate::from_ymd_opt(2025, 12, 8).unwrap(),
        })
        .await
        .unwrap();

    assert_eq!(plan.weekly_targets.len(), 12);
    assert_eq!(plan.schedules.len(), 12);
    // Race week tapers to 40% of the peak.
    let race_week = plan.weekly_targets.last().unwrap();
    assert_eq!(
        race_week.total_volume,
        (f64::from(plan.strategy.target_peak_volume) * 0.40).round() as u32
    );
}

#[tokio::test]
async fn unknown_level_gets_a_clarifying_question_then_recovers() {
    let repository = Arc::new(InMemoryProfileRepository::new());
    let handler = handler(
        repository.clone(),
        ScriptedClassifier::always(RunnerLevel::Advanced)
            .with_result(RunnerLevel::Unknown),
        ScriptedExtractor::new().with_update(full_advanced_update()),
        ScriptedVerifier::new(),
    );
    let id = ConversationId::new();

    let (reply, status) = advance(&handler, id, "hello").await;
    assert_eq!(status, TurnStatus::Continue);
    assert!(reply.unwrap().contains("new to running"));

    let stored = repository.load(id).await.unwrap().unwrap();
    assert_eq!(stored.level(), RunnerLevel::Unknown);

    // The next message re-classifies and extraction proceeds in one turn.
    let (_, status) = advance(
        &handler,
        id,
        "Experienced. 36km weekly, half marathon in three months, 4 days, 31, km, no injuries, \
         10k in 46:30 recently",
    )
    .await;
    assert_eq!(status, TurnStatus::Done);
}

#[tokio::test]
async fn three_stagnant_extractions_abort_the_conversation() {
    let repository = Arc::new(InMemoryProfileRepository::new());
    // The extractor never extracts anything.
    let handler = handler(
        repository.clone(),
        ScriptedClassifier::always(RunnerLevel::Beginner),
        ScriptedExtractor::new(),
        ScriptedVerifier::new(),
    );
    let id = ConversationId::new();

    let (_, status) = advance(&handler, id, "I want to get into running").await;
    assert_eq!(status, TurnStatus::Continue);

    let (_, status) = advance(&handler, id, "hmm").await;
    assert_eq!(status, TurnStatus::Continue);
    let (_, status) = advance(&handler, id, "not sure").await;
    assert_eq!(status, TurnStatus::Continue);

    // Third extraction without progress hits the ceiling.
    let (reply, status) = advance(&handler, id, "whatever").await;
    assert_eq!(status, TurnStatus::Aborted);
    assert!(reply.is_some());

    let stored = repository.load(id).await.unwrap().unwrap();
    assert_eq!(stored.dialog_state, DialogState::Abort);
    assert_eq!(stored.failure_count, 3);
}

#[tokio::test]
async fn accepting_suggested_changes_overwrites_fields_and_plans() {
    let repository = Arc::new(InMemoryProfileRepository::new());
    let mut update = full_advanced_update();
    update.days_per_week = Some(2); // Too few for the goal; the verifier objects.

    let handler = handler(
        repository.clone(),
        ScriptedClassifier::always(RunnerLevel::Advanced),
        ScriptedExtractor::new()
            .with_update(update)
            .with_change_response(UserChangeResponseDraft {
                accepted: true,
                counter_proposal: None,
            }),
        ScriptedVerifier::new().with_check(failing_check()),
    );
    let id = ConversationId::new();

    let (_, status) = advance(&handler, id, "I run 36km weekly, want a half").await;
    assert_eq!(status, TurnStatus::Continue);

    // Profile completes, verification fails, and the concern is raised.
    let (reply, status) = advance(&handler, id, "everything about me, but only 2 days").await;
    assert_eq!(status, TurnStatus::Continue);
    assert!(reply.unwrap().contains("safer"));

    let stored = repository.load(id).await.unwrap().unwrap();
    assert!(stored.has_active_concerns());
    assert_eq!(stored.failure_count, 1);

    // The user accepts; the suggestion lands field-for-field.
    let (_, status) = advance(&handler, id, "sure, let's do 4 days").await;
    assert_eq!(status, TurnStatus::Done);

    let stored = repository.load(id).await.unwrap().unwrap();
    assert_eq!(stored.days_per_week, Some(4));
    assert!(stored.coherence_check.as_ref().unwrap().ok);
    assert_eq!(stored.dialog_state, DialogState::Done);
    assert_eq!(stored.failure_count, 0);
}

#[tokio::test]
async fn resolved_counter_proposal_is_adopted_and_plans() {
    let repository = Arc::new(InMemoryProfileRepository::new());
    let mut update = full_advanced_update();
    update.days_per_week = Some(2);

    let handler = handler(
        repository.clone(),
        ScriptedClassifier::always(RunnerLevel::Advanced),
        ScriptedExtractor::new()
            .with_update(update)
            .with_change_response(UserChangeResponseDraft {
                accepted: false,
                counter_proposal: Some(SuggestedChangesDraft {
                    goal: None,
                    days_per_week: Some(3),
                    intensity: None,
                }),
            }),
        ScriptedVerifier::new()
            .with_check(failing_check())
            .with_recheck(CoherenceCheckDraft::passed("three days works with easy volume")),
    );
    let id = ConversationId::new();

    advance(&handler, id, "36km weekly, half marathon plans").await;
    advance(&handler, id, "all my details, but only 2 days").await;
    let (_, status) = advance(&handler, id, "4 is too many, how about 3?").await;
    assert_eq!(status, TurnStatus::Done);

    let stored = repository.load(id).await.unwrap().unwrap();
    assert_eq!(stored.days_per_week, Some(3));
    assert!(stored.coherence_check.as_ref().unwrap().ok);
    assert_eq!(stored.failure_count, 0);
}

#[tokio::test]
async fn ambiguous_negotiation_reply_keeps_negotiating() {
    let repository = Arc::new(InMemoryProfileRepository::new());
    let mut update = full_advanced_update();
    update.days_per_week = Some(2);

    let handler = handler(
        repository.clone(),
        ScriptedClassifier::always(RunnerLevel::Advanced),
        ScriptedExtractor::new()
            .with_update(update)
            .with_change_response(UserChangeResponseDraft::default()),
        ScriptedVerifier::new()
            .with_check(failing_check())
            .with_recheck(failing_check()),
    );
    let id = ConversationId::new();

    advance(&handler, id, "36km weekly, half marathon plans").await;
    advance(&handler, id, "all my details, but only 2 days").await;

    // A shrug is non-progress; the concern is put to the user again.
    let (reply, status) = advance(&handler, id, "eh").await;
    assert_eq!(status, TurnStatus::Continue);
    assert!(reply.is_some());

    let stored = repository.load(id).await.unwrap().unwrap();
    assert!(stored.has_active_concerns());
    assert_eq!(stored.failure_count, 2);
    assert_eq!(stored.dialog_state, DialogState::CollectInput);
}

#[tokio::test]
async fn repeated_failed_negotiation_aborts_at_the_ceiling() {
    let repository = Arc::new(InMemoryProfileRepository::new());
    let mut update = full_advanced_update();
    update.days_per_week = Some(2);

    let handler = handler(
        repository.clone(),
        ScriptedClassifier::always(RunnerLevel::Advanced),
        ScriptedExtractor::new()
            .with_update(update)
            .with_change_response(UserChangeResponseDraft::default())
            .with_change_response(UserChangeResponseDraft::default()),
        ScriptedVerifier::new()
            .with_check(failing_check())
            .with_recheck(failing_check())
            .with_recheck(failing_check()),
    );
    let id = ConversationId::new();

    advance(&handler, id, "36km weekly, half marathon plans").await; // interview
    advance(&handler, id, "all my details, but only 2 days").await; // verify fails: 1
    advance(&handler, id, "eh").await; // ambiguous: 2
    let (_, status) = advance(&handler, id, "dunno").await; // ambiguous: 3 -> abort
    assert_eq!(status, TurnStatus::Aborted);

    let stored = repository.load(id).await.unwrap().unwrap();
    assert_eq!(stored.dialog_state, DialogState::Abort);
}
