//! Shared oracle error and wire-form draft types.
//!
//! Oracles return *drafts*: loosely-shaped records mirroring what a
//! structured-output model produces. Drafts are resolved into domain value
//! objects at the port boundary, where every stated contract is enforced:
//! date forms stay mutually exclusive and replacement goals arrive complete.
//! A draft that breaks a contract never reaches the profile.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::profile::{
    Goal, GoalKind, Intensity, ProfileField, RaceDistance, RaceRecord, SuggestedChanges,
    TargetDate,
};

/// An external judgment call failed.
#[derive(Debug, Clone, Error)]
pub enum OracleError {
    /// The oracle could not be reached or returned a transport failure.
    #[error("oracle unavailable: {0}")]
    Unavailable(String),

    /// The oracle did not answer within the configured budget.
    #[error("oracle timed out after {0}s")]
    Timeout(u64),

    /// The oracle answered with output that could not be parsed at all.
    #[error("malformed oracle output: {0}")]
    Malformed(String),
}

impl OracleError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Creates a malformed output error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    /// True when retrying the call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }
}

/// A parseable oracle answer that violates a stated output contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleViolation {
    /// Both the absolute and the relative date form were set.
    #[error("both absolute and relative date forms are set")]
    BothDateForms,

    /// A replacement goal arrived without a race type.
    #[error("replacement goal is incomplete: missing race type")]
    IncompleteGoal,

    /// The update touches a field that was not requested.
    #[error("update populates unrequested field '{0}'")]
    UnrequestedField(ProfileField),
}

/// Wire form of a date: at most one of the two members may be set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TargetDateDraft {
    pub absolute: Option<NaiveDate>,
    /// The user's verbatim wording, never converted.
    pub relative: Option<String>,
}

impl TargetDateDraft {
    /// Resolves into a domain date, rejecting drafts with both forms set.
    pub fn resolve(self) -> Result<Option<TargetDate>, OracleViolation> {
        match (self.absolute, self.relative) {
            (Some(_), Some(_)) => Err(OracleViolation::BothDateForms),
            (Some(date), None) => Ok(Some(TargetDate::Absolute(date))),
            (None, Some(expr)) => Ok(Some(TargetDate::Relative(expr))),
            (None, None) => Ok(None),
        }
    }
}

/// Wire form of a goal. Resolution requires the race type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GoalDraft {
    pub kind: Option<GoalKind>,
    #[serde(default)]
    pub target_date: TargetDateDraft,
    pub target_time_minutes: Option<f64>,
}

impl GoalDraft {
    /// Resolves into a complete goal.
    pub fn resolve(self) -> Result<Goal, OracleViolation> {
        let kind = self.kind.ok_or(OracleViolation::IncompleteGoal)?;
        Ok(Goal {
            kind,
            target_date: self.target_date.resolve()?,
            target_time_minutes: self.target_time_minutes,
        })
    }
}

/// Wire form of a past race result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RaceRecordDraft {
    pub distance: Option<RaceDistance>,
    pub finish_time_minutes: Option<f64>,
    #[serde(default)]
    pub date: TargetDateDraft,
}

impl RaceRecordDraft {
    /// Resolves into a (possibly still incomplete) race record.
    pub fn resolve(self) -> Result<RaceRecord, OracleViolation> {
        Ok(RaceRecord {
            distance: self.distance,
            finish_time_minutes: self.finish_time_minutes,
            date: self.date.resolve()?,
        })
    }
}

/// Wire form of suggested corrective changes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SuggestedChangesDraft {
    pub goal: Option<GoalDraft>,
    pub days_per_week: Option<u8>,
    pub intensity: Option<Intensity>,
}

impl SuggestedChangesDraft {
    /// Resolves into domain suggestions; a present goal must be complete.
    pub fn resolve(self) -> Result<SuggestedChanges, OracleViolation> {
        let goal = self.goal.map(GoalDraft::resolve).transpose()?;
        Ok(SuggestedChanges {
            goal,
            days_per_week: self.days_per_week,
            intensity: self.intensity,
        })
    }
}
