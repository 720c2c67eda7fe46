//! Validated athlete profile for planning.
//!
//! The dialogue side works with incrementally-filled optionals; the planning
//! side only ever sees an `AthleteProfile`, a complete snapshot built from a
//! finished conversation.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::athlete::{ActivityLevel, FitnessTrack, ProfileState};
use super::coherence::Intensity;
use super::goal::{DistanceUnit, Goal, RaceRecord};
use super::requirements::ProfileField;

/// Plan length used when no calendar race date is known.
pub const DEFAULT_PLAN_WEEKS: u32 = 12;

/// Day of the week for scheduling sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Zero-based index with Monday first.
    pub fn index(&self) -> u32 {
        match self {
            Self::Monday => 0,
            Self::Tuesday => 1,
            Self::Wednesday => 2,
            Self::Thursday => 3,
            Self::Friday => 4,
            Self::Saturday => 5,
            Self::Sunday => 6,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        };
        write!(f, "{}", name)
    }
}

/// Which days the athlete can train, and where the long run goes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Logistics {
    pub days_available: Vec<Weekday>,
    pub long_run_day: Weekday,
}

/// Equipment the athlete can use for strength work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentAccess {
    BodyweightOnly,
    DumbbellsKettlebells,
    FullGym,
}

/// Optional strength-training context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthProfile {
    pub equipment_access: EquipmentAccess,
    /// Sessions per week, 1 to 3.
    pub sessions_per_week: u8,
}

/// Complete fitness data, one variant per level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum FitnessLevel {
    Beginner {
        activity_level: ActivityLevel,
        can_run_nonstop_30min: bool,
    },
    Advanced {
        average_weekly_distance: f64,
        current_longest_run: f64,
        recent_race: Option<RaceRecord>,
    },
}

impl FitnessLevel {
    /// True for the beginner variant.
    pub fn is_beginner(&self) -> bool {
        matches!(self, Self::Beginner { .. })
    }
}

/// A complete athlete profile, ready for strategy and periodization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteProfile {
    pub age: u8,
    /// Past injuries; empty means none reported.
    pub injury_history: Vec<String>,
    pub unit: DistanceUnit,
    pub days_per_week: u8,
    pub goal: Goal,
    pub fitness: FitnessLevel,
    pub logistics: Option<Logistics>,
    pub strength: Option<StrengthProfile>,
    pub intensity_preference: Option<Intensity>,
}

/// A conversation ended before the profile was complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("profile is missing required field '{0}'")]
pub struct IncompleteProfile(pub ProfileField);

impl TryFrom<&ProfileState> for AthleteProfile {
    type Error = IncompleteProfile;

    fn try_from(state: &ProfileState) -> Result<Self, Self::Error> {
        let goal = state
            .goal
            .clone()
            .ok_or(IncompleteProfile(ProfileField::Goal))?;
        let days_per_week = state
            .days_per_week
            .ok_or(IncompleteProfile(ProfileField::DaysPerWeek))?;
        let unit = state
            .preferred_distance_unit
            .ok_or(IncompleteProfile(ProfileField::PreferredDistanceUnit))?;
        let age = state.age.ok_or(IncompleteProfile(ProfileField::Age))?;
        let injury_history = state
            .injury_history
            .clone()
            .ok_or(IncompleteProfile(ProfileField::InjuryHistory))?;

        let fitness = match &state.fitness {
            FitnessTrack::Unknown => {
                return Err(IncompleteProfile(ProfileField::ActivityLevel));
            }
            FitnessTrack::Beginner {
                activity_level,
                can_run_nonstop_30min,
            } => FitnessLevel::Beginner {
                activity_level: activity_level
                    .ok_or(IncompleteProfile(ProfileField::ActivityLevel))?,
                // Unstated means we assume they cannot, and start conservatively.
                can_run_nonstop_30min: can_run_nonstop_30min.unwrap_or(false),
            },
            FitnessTrack::Advanced {
                distance_per_week,
                current_longest_run,
                recent_race,
            } => {
                let average_weekly_distance = distance_per_week
                    .ok_or(IncompleteProfile(ProfileField::DistancePerWeek))?;
                FitnessLevel::Advanced {
                    average_weekly_distance,
                    // Roughly a third of weekly volume when never mentioned.
                    current_longest_run: current_longest_run
                        .unwrap_or(average_weekly_distance / 3.0),
                    recent_race: recent_race.clone(),
                }
            }
        };

        Ok(Self {
            age,
            injury_history,
            unit,
            days_per_week,
            goal,
            fitness,
            logistics: None,
            strength: None,
            intensity_preference: state.intensity_preference,
        })
    }
}

impl AthleteProfile {
    /// Attaches training-day logistics.
    pub fn with_logistics(mut self, logistics: Logistics) -> Self {
        self.logistics = Some(logistics);
        self
    }

    /// Attaches a strength-training profile.
    pub fn with_strength(mut self, strength: StrengthProfile) -> Self {
        self.strength = Some(strength);
        self
    }

    /// Full training weeks available from `start` to the race.
    ///
    /// Weeks are counted from the Monday after the start date so every plan
    /// week runs Monday to Sunday; any earlier days belong to a partial first
    /// week. Without a calendar race date the plan defaults to
    /// [`DEFAULT_PLAN_WEEKS`].
    pub fn plan_horizon_weeks(&self, start: NaiveDate) -> u32 {
        let Some(race_date) = self.goal.race_date() else {
            return DEFAULT_PLAN_WEEKS;
        };

        let days_to_next_monday = 7 - start.weekday().num_days_from_monday();
        let next_monday = start + Duration::days(i64::from(days_to_next_monday));
        let full_weeks = (race_date - next_monday).num_days().div_euclid(7) + 1;
        full_weeks.max(1) as u32
    }

    /// Training opportunities left in the (possibly partial) start week.
    ///
    /// Counts available days from the start date through Sunday; equals the
    /// weekly frequency when starting on a Monday. Without logistics the
    /// configured days-per-week count is used as an upper bound.
    pub fn first_week_sessions(&self, start: NaiveDate) -> u32 {
        let start_index = start.weekday().num_days_from_monday();
        match &self.logistics {
            Some(logistics) => logistics
                .days_available
                .iter()
                .filter(|day| day.index() >= start_index)
                .count() as u32,
            None => {
                let remaining_days = 7 - start_index;
                remaining_days.min(u32::from(self.days_per_week))
            }
        }
    }
}
