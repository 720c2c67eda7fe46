//! Concrete weekly session schedules.
//!
//! These are the session planner's output models: the daily runs (and
//! optional strength work) that realize one week's targets.

use serde::{Deserialize, Serialize};

use crate::domain::profile::Weekday;

/// The kind of running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunType {
    Easy,
    Recovery,
    LongRun,
    Tempo,
    Interval,
    Fartlek,
    RaceSimulation,
}

/// One running session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunningSession {
    pub day: Weekday,
    pub run_type: RunType,
    pub distance: f64,
    pub workout_description: String,
    pub notes: Option<String>,
}

/// One strength exercise prescription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub series: u8,
    pub reps: Option<u8>,
    /// Hold duration in seconds for isometric work.
    pub hold_seconds: Option<u16>,
    pub weight_kg: Option<u16>,
    /// Rest between sets in seconds.
    pub recovery_seconds: u16,
    pub form_cues: String,
}

/// One strength session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthSession {
    pub day: Weekday,
    pub duration_minutes: u32,
    pub exercises: Vec<Exercise>,
}

/// A fully-detailed training week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    pub week_number: u32,
    pub phase_name: String,
    /// Echo of the weekly volume target, so the schedule is self-describing.
    pub weekly_volume_target: f64,
    pub weekly_long_run_target: f64,
    pub week_overview: String,
    pub running_sessions: Vec<RunningSession>,
    /// Empty when the athlete has no strength profile.
    pub strength_sessions: Vec<StrengthSession>,
}

impl WeeklySchedule {
    /// Total running distance actually scheduled.
    pub fn scheduled_volume(&self) -> f64 {
        self.running_sessions.iter().map(|s| s.distance).sum()
    }

    /// The long-run session, if one is scheduled.
    pub fn long_run(&self) -> Option<&RunningSession> {
        self.running_sessions
            .iter()
            .find(|s| s.run_type == RunType::LongRun)
    }
}
