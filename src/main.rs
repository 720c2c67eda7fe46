//! Demo binary: drives one scripted conversation end to end and prints the
//! resulting training plan.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stride_coach::adapters::oracles::{
    ScriptedClassifier, ScriptedExtractor, ScriptedInterviewer, ScriptedSessionPlanner,
    ScriptedStrategist, ScriptedVerifier,
};
use stride_coach::adapters::persistence::InMemoryProfileRepository;
use stride_coach::application::handlers::{
    AdvanceConversationCommand, AdvanceConversationHandler, GeneratePlanCommand,
    GeneratePlanHandler,
};
use stride_coach::config::AppConfig;
use stride_coach::domain::dialogue::{DialogOrchestrator, TurnStatus};
use stride_coach::domain::foundation::ConversationId;
use stride_coach::domain::profile::{DistanceUnit, GoalKind, RaceDistance, RunnerLevel};
use stride_coach::ports::{GoalDraft, ProfileUpdate, RaceRecordDraft, TargetDateDraft};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let repository = Arc::new(InMemoryProfileRepository::new());

    // A scripted advanced runner: level, then profile data over two turns.
    let classifier = ScriptedClassifier::always(RunnerLevel::Advanced);
    let extractor = ScriptedExtractor::new()
        .with_update(ProfileUpdate {
            goal: Some(GoalDraft {
                kind: Some(GoalKind::HalfMarathon),
                target_date: TargetDateDraft {
                    relative: Some("in about three months".to_string()),
                    ..Default::default()
                },
                target_time_minutes: None,
            }),
            days_per_week: Some(4),
            distance_per_week: Some(38.0),
            ..Default::default()
        })
        .with_update(ProfileUpdate {
            preferred_distance_unit: Some(DistanceUnit::Kilometers),
            age: Some(33),
            injury_history: Some(vec![]),
            recent_race: Some(RaceRecordDraft {
                distance: Some(RaceDistance::TenK),
                finish_time_minutes: Some(47.0),
                ..Default::default()
            }),
            ..Default::default()
        });

    let orchestrator = DialogOrchestrator::new(
        Arc::new(classifier),
        Arc::new(extractor),
        Arc::new(ScriptedInterviewer::new()),
        Arc::new(ScriptedVerifier::new()),
    )
    .with_transcript_cap(config.engine.transcript_cap);

    let conversation = AdvanceConversationHandler::new(repository.clone(), orchestrator);
    let id = ConversationId::new();

    let turns = [
        "Hi! I run around 38km a week and I'd like to race a half marathon in about three months.",
        "I can train 4 days a week.",
        "I'm 33, think in kilometers, no injuries. Ran a 10k in 47 minutes last month.",
    ];

    for turn in turns {
        println!("athlete> {}", turn);
        let result = conversation
            .handle(AdvanceConversationCommand {
                conversation_id: id,
                message: turn.to_string(),
            })
            .await?;
        if let Some(reply) = &result.reply {
            println!("coach>   {}", reply);
        }
        match result.status {
            TurnStatus::Continue => continue,
            TurnStatus::Done => {
                info!("profile complete and coherent");
                break;
            }
            TurnStatus::Aborted => {
                println!("conversation aborted without a plan");
                return Ok(());
            }
        }
    }

    let planner = GeneratePlanHandler::new(
        repository,
        Arc::new(ScriptedStrategist::new()),
        Arc::new(ScriptedSessionPlanner::new()),
    );
    let plan = planner
        .handle(GeneratePlanCommand {
            conversation_id: id,
            start_date: NaiveDate::from_ymd_opt(2025, 12, 8)
                .ok_or("invalid demo start date")?,
        })
        .await?;

    println!();
    println!("{}", plan.strategy.overview);
    println!(
        "peak volume {} / longest run {} over {} weeks",
        plan.strategy.target_peak_volume,
        plan.strategy.target_longest_run,
        plan.strategy.total_weeks_available
    );
    println!();
    for target in &plan.weekly_targets {
        println!(
            "week {:>2}  {:<6} {}  volume {:>3}  long run {:>3}",
            target.week_number,
            target.phase_name.to_string(),
            if target.is_recovery_week { "recovery" } else { "build   " },
            target.total_volume,
            target.long_run_distance
        );
    }

    Ok(())
}
