//! Field requirement resolution.
//!
//! Computes which profile fields are already known and which still need to
//! be elicited, given the athlete's classified level. Pure and deterministic;
//! the dialogue engine calls it before every question, extraction, and
//! decision step.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::athlete::{FitnessTrack, ProfileState};

/// A profile field the conversation can elicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Goal,
    DaysPerWeek,
    PreferredDistanceUnit,
    Age,
    InjuryHistory,
    // Beginner track.
    ActivityLevel,
    // Advanced track.
    DistancePerWeek,
    RecentRace,
}

impl ProfileField {
    /// The snake_case wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Goal => "goal",
            Self::DaysPerWeek => "days_per_week",
            Self::PreferredDistanceUnit => "preferred_distance_unit",
            Self::Age => "age",
            Self::InjuryHistory => "injury_history",
            Self::ActivityLevel => "activity_level",
            Self::DistancePerWeek => "distance_per_week",
            Self::RecentRace => "recent_race",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A known field together with its current value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownField {
    pub field: ProfileField,
    pub value: Value,
}

/// The split of required fields into known and still-missing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldRequirements {
    pub known: Vec<KnownField>,
    /// Missing fields in elicitation order.
    pub missing: Vec<ProfileField>,
}

impl FieldRequirements {
    /// True once every required field is known.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Resolves known and missing required fields for a profile.
pub struct FieldRequirementResolver;

const BASE_REQUIRED: [ProfileField; 5] = [
    ProfileField::Goal,
    ProfileField::DaysPerWeek,
    ProfileField::PreferredDistanceUnit,
    ProfileField::Age,
    ProfileField::InjuryHistory,
];

impl FieldRequirementResolver {
    /// Splits the required field set into known values and missing names.
    ///
    /// A field counts as known iff it is non-null; empty lists and strings
    /// still count. The advanced race record is only satisfied by a complete
    /// result (distance and finish time both present).
    pub fn resolve(state: &ProfileState) -> FieldRequirements {
        let mut known = Vec::new();
        let mut missing = Vec::new();

        for field in Self::required_fields(state) {
            match Self::value_of(state, field) {
                Some(value) => known.push(KnownField { field, value }),
                None => missing.push(field),
            }
        }

        FieldRequirements { known, missing }
    }

    /// The required field set for the profile's current level.
    pub fn required_fields(state: &ProfileState) -> Vec<ProfileField> {
        let mut required = BASE_REQUIRED.to_vec();
        match &state.fitness {
            FitnessTrack::Unknown => {}
            FitnessTrack::Beginner { .. } => required.push(ProfileField::ActivityLevel),
            FitnessTrack::Advanced { recent_race, .. } => {
                required.push(ProfileField::DistancePerWeek);
                let race_complete = recent_race
                    .as_ref()
                    .is_some_and(|record| record.is_complete());
                if !race_complete {
                    required.push(ProfileField::RecentRace);
                }
            }
        }
        required
    }

    fn value_of(state: &ProfileState, field: ProfileField) -> Option<Value> {
        match field {
            ProfileField::Goal => state.goal.as_ref().map(json),
            ProfileField::DaysPerWeek => state.days_per_week.map(Value::from),
            ProfileField::PreferredDistanceUnit => {
                state.preferred_distance_unit.as_ref().map(json)
            }
            ProfileField::Age => state.age.map(Value::from),
            ProfileField::InjuryHistory => state.injury_history.as_ref().map(json),
            ProfileField::ActivityLevel => match &state.fitness {
                FitnessTrack::Beginner { activity_level, .. } => {
                    activity_level.as_ref().map(json)
                }
                _ => None,
            },
            ProfileField::DistancePerWeek => match &state.fitness {
                FitnessTrack::Advanced { distance_per_week, .. } => {
                    distance_per_week.map(Value::from)
                }
                _ => None,
            },
            ProfileField::RecentRace => match &state.fitness {
                FitnessTrack::Advanced { recent_race, .. } => recent_race
                    .as_ref()
                    .filter(|record| record.is_complete())
                    .map(json),
                _ => None,
            },
        }
    }
}

fn json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
