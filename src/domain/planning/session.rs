//! Per-week session building.
//!
//! The session builder assembles the request handed to the session planner
//! for one plan week, and validates the planner's schedule against it
//! before the week is accepted into the plan.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::profile::{
    AthleteProfile, DistanceUnit, Intensity, RunnerLevel, StrengthProfile, Weekday,
};

use super::periodization::WeeklyTarget;
use super::schedule::WeeklySchedule;

/// Scheduled volume may deviate from the weekly target by this fraction.
const VOLUME_TOLERANCE: f64 = 0.05;

/// Everything the session planner needs to detail one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekPlanRequest {
    pub target: WeeklyTarget,
    pub level: RunnerLevel,
    pub unit: DistanceUnit,
    /// The only days runs may be scheduled on.
    pub running_days: Vec<Weekday>,
    pub long_run_day: Weekday,
    pub strength: Option<StrengthProfile>,
    pub intensity_preference: Option<Intensity>,
}

/// A schedule that does not realize its week's targets.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleViolation {
    #[error("scheduled volume {actual:.1} is outside 5% of the {expected} target")]
    VolumeOutOfTolerance { expected: u32, actual: f64 },

    #[error("no long-run session was scheduled")]
    LongRunMissing,

    #[error("long run scheduled on {actual} instead of {expected}")]
    LongRunMisplaced { expected: Weekday, actual: Weekday },

    #[error("long run of {actual:.1} does not match the {expected} target")]
    LongRunOffTarget { expected: u32, actual: f64 },

    #[error("strength sessions scheduled without a strength profile")]
    UnexpectedStrengthSessions,

    #[error("{actual} strength sessions scheduled, expected {expected}")]
    StrengthCountMismatch { expected: u8, actual: usize },
}

/// Builds and checks per-week session plans.
pub struct SessionBuilder;

impl SessionBuilder {
    /// Assembles the planner request for one week.
    ///
    /// Uses the athlete's stated logistics when present; otherwise falls
    /// back to a conventional spread of their weekly frequency with the
    /// long run on Sunday.
    pub fn request_for_week(profile: &AthleteProfile, target: &WeeklyTarget) -> WeekPlanRequest {
        let (running_days, long_run_day) = match &profile.logistics {
            Some(logistics) => (
                logistics.days_available.clone(),
                logistics.long_run_day,
            ),
            None => {
                let days = default_running_days(profile.days_per_week);
                (days, Weekday::Sunday)
            }
        };

        let level = if profile.fitness.is_beginner() {
            RunnerLevel::Beginner
        } else {
            RunnerLevel::Advanced
        };

        WeekPlanRequest {
            target: target.clone(),
            level,
            unit: profile.unit,
            running_days,
            long_run_day,
            strength: profile.strength.clone(),
            intensity_preference: profile.intensity_preference,
        }
    }

    /// Validates a planner schedule against its request.
    pub fn validate_schedule(
        request: &WeekPlanRequest,
        schedule: &WeeklySchedule,
    ) -> Result<(), ScheduleViolation> {
        let expected_volume = request.target.total_volume;
        let actual_volume = schedule.scheduled_volume();
        if expected_volume > 0 {
            let deviation = (actual_volume - f64::from(expected_volume)).abs();
            if deviation > f64::from(expected_volume) * VOLUME_TOLERANCE {
                return Err(ScheduleViolation::VolumeOutOfTolerance {
                    expected: expected_volume,
                    actual: actual_volume,
                });
            }
        }

        let expected_long_run = request.target.long_run_distance;
        if expected_long_run > 0 {
            let long_run = schedule
                .long_run()
                .ok_or(ScheduleViolation::LongRunMissing)?;
            if long_run.day != request.long_run_day {
                return Err(ScheduleViolation::LongRunMisplaced {
                    expected: request.long_run_day,
                    actual: long_run.day,
                });
            }
            if (long_run.distance - f64::from(expected_long_run)).abs() >= 0.5 {
                return Err(ScheduleViolation::LongRunOffTarget {
                    expected: expected_long_run,
                    actual: long_run.distance,
                });
            }
        }

        match &request.strength {
            None => {
                if !schedule.strength_sessions.is_empty() {
                    return Err(ScheduleViolation::UnexpectedStrengthSessions);
                }
            }
            Some(strength) => {
                let actual = schedule.strength_sessions.len();
                if actual != usize::from(strength.sessions_per_week) {
                    return Err(ScheduleViolation::StrengthCountMismatch {
                        expected: strength.sessions_per_week,
                        actual,
                    });
                }
            }
        }

        Ok(())
    }
}

/// Conventional weekly spread when the athlete gave no explicit days.
fn default_running_days(days_per_week: u8) -> Vec<Weekday> {
    use Weekday::*;
    match days_per_week {
        0 | 1 => vec![Sunday],
        2 => vec![Wednesday, Sunday],
        3 => vec![Tuesday, Thursday, Sunday],
        4 => vec![Tuesday, Thursday, Saturday, Sunday],
        5 => vec![Monday, Tuesday, Thursday, Saturday, Sunday],
        6 => vec![Monday, Tuesday, Wednesday, Thursday, Saturday, Sunday],
        _ => vec![Monday, Tuesday, Wednesday, Thursday, Friday, Saturday, Sunday],
    }
}
