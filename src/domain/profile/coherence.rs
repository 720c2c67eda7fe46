//! Coherence judgment and negotiation value objects.
//!
//! A coherence check records whether the elicited profile is internally
//! consistent and safe; when it is not, it carries concrete suggested
//! changes the user can accept, counter, or refuse.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::goal::Goal;

/// Suggested training intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Easy,
    Moderate,
    Hard,
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Easy => write!(f, "easy"),
            Self::Moderate => write!(f, "moderate"),
            Self::Hard => write!(f, "hard"),
        }
    }
}

/// Concrete corrective changes proposed to resolve a coherence concern.
///
/// Each member is independently optional. A replacement goal is always a
/// complete goal, never a partial edit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SuggestedChanges {
    pub goal: Option<Goal>,
    pub days_per_week: Option<u8>,
    pub intensity: Option<Intensity>,
}

impl SuggestedChanges {
    /// True when no change is actually proposed.
    pub fn is_empty(&self) -> bool {
        self.goal.is_none() && self.days_per_week.is_none() && self.intensity.is_none()
    }
}

/// The verifier's judgment on the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoherenceCheck {
    pub ok: bool,
    pub reasoning: String,
    pub suggested_changes: Option<SuggestedChanges>,
}

impl CoherenceCheck {
    /// Creates a passing check.
    pub fn passed(reasoning: impl Into<String>) -> Self {
        Self {
            ok: true,
            reasoning: reasoning.into(),
            suggested_changes: None,
        }
    }

    /// Creates a failing check with suggestions attached.
    pub fn failed(reasoning: impl Into<String>, changes: SuggestedChanges) -> Self {
        Self {
            ok: false,
            reasoning: reasoning.into(),
            suggested_changes: Some(changes),
        }
    }
}

/// How the user responded to suggested changes.
///
/// When `accepted` is true any counter-proposal present is ignored:
/// acceptance always dominates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserChangeResponse {
    pub accepted: bool,
    pub counter_proposal: Option<SuggestedChanges>,
}
