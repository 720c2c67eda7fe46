//! Goal and race-history value objects.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Preferred unit for distances in conversation and plan output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    Kilometers,
    Miles,
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kilometers => write!(f, "kilometers"),
            Self::Miles => write!(f, "miles"),
        }
    }
}

/// What the athlete is training for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    #[serde(rename = "5k")]
    FiveK,
    #[serde(rename = "10k")]
    TenK,
    HalfMarathon,
    Marathon,
    Fitness,
    LoseWeight,
}

impl fmt::Display for GoalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FiveK => write!(f, "5k"),
            Self::TenK => write!(f, "10k"),
            Self::HalfMarathon => write!(f, "half marathon"),
            Self::Marathon => write!(f, "marathon"),
            Self::Fitness => write!(f, "general fitness"),
            Self::LoseWeight => write!(f, "weight loss"),
        }
    }
}

/// Standard race distances for past results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceDistance {
    #[serde(rename = "5k")]
    FiveK,
    #[serde(rename = "10k")]
    TenK,
    HalfMarathon,
    Marathon,
}

impl RaceDistance {
    /// Nominal distance in kilometers.
    pub fn kilometers(&self) -> f64 {
        match self {
            Self::FiveK => 5.0,
            Self::TenK => 10.0,
            Self::HalfMarathon => 21.1,
            Self::Marathon => 42.2,
        }
    }
}

/// A date as the user expressed it.
///
/// Either a concrete calendar date or the user's verbatim relative wording
/// ("in about three months"). The two forms are mutually exclusive by
/// construction, and relative expressions are never converted or inferred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetDate {
    Absolute(NaiveDate),
    Relative(String),
}

impl TargetDate {
    /// Returns the calendar date if this is an absolute date.
    pub fn absolute(&self) -> Option<NaiveDate> {
        match self {
            Self::Absolute(date) => Some(*date),
            Self::Relative(_) => None,
        }
    }
}

impl fmt::Display for TargetDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute(date) => write!(f, "{}", date),
            Self::Relative(expr) => write!(f, "{}", expr),
        }
    }
}

/// The athlete's training goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub kind: GoalKind,
    pub target_date: Option<TargetDate>,
    /// Desired finish time in minutes, when the athlete has one.
    pub target_time_minutes: Option<f64>,
}

impl Goal {
    /// Creates a goal with no date or time attached.
    pub fn new(kind: GoalKind) -> Self {
        Self {
            kind,
            target_date: None,
            target_time_minutes: None,
        }
    }

    /// Sets the target date.
    pub fn with_target_date(mut self, date: TargetDate) -> Self {
        self.target_date = Some(date);
        self
    }

    /// Sets the target finish time in minutes.
    pub fn with_target_time(mut self, minutes: f64) -> Self {
        self.target_time_minutes = Some(minutes);
        self
    }

    /// Returns the race date when one was given as a calendar date.
    pub fn race_date(&self) -> Option<NaiveDate> {
        self.target_date.as_ref().and_then(TargetDate::absolute)
    }
}

/// A past race result reported by an experienced runner.
///
/// All fields are optional while the record is being elicited; a record is
/// only useful for calibration once distance and finish time are both known.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RaceRecord {
    pub distance: Option<RaceDistance>,
    pub finish_time_minutes: Option<f64>,
    pub date: Option<TargetDate>,
}

impl RaceRecord {
    /// True once both distance and finish time are present.
    pub fn is_complete(&self) -> bool {
        self.distance.is_some() && self.finish_time_minutes.is_some()
    }
}
