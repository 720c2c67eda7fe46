//! Conversation-scoped athlete profile state.
//!
//! `ProfileState` is created empty when a conversation starts and mutated
//! incrementally as the dialogue elicits fields. It is the unit of
//! persistence: everything needed to resume a conversation lives here.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::dialogue::{ChatMessage, DialogState};
use crate::domain::foundation::ConversationId;

use super::coherence::{CoherenceCheck, Intensity, UserChangeResponse};
use super::goal::{DistanceUnit, Goal, RaceRecord};
use super::requirements::ProfileField;

/// How experienced the runner is, as judged from conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunnerLevel {
    Beginner,
    Advanced,
    #[default]
    Unknown,
}

impl fmt::Display for RunnerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Beginner => write!(f, "beginner"),
            Self::Advanced => write!(f, "advanced"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Day-to-day activity for athletes without a running history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
}

/// Level-specific fitness data, keyed on the classified runner level.
///
/// Only the track matching the level can hold data, so a profile can never
/// carry beginner and advanced fields at the same time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum FitnessTrack {
    #[default]
    Unknown,
    Beginner {
        activity_level: Option<ActivityLevel>,
        /// Whether the athlete can currently run 30 minutes without stopping.
        can_run_nonstop_30min: Option<bool>,
    },
    Advanced {
        /// Current average weekly distance in the preferred unit.
        distance_per_week: Option<f64>,
        /// Longest single run in recent training, if mentioned.
        current_longest_run: Option<f64>,
        recent_race: Option<RaceRecord>,
    },
}

impl FitnessTrack {
    /// Creates the empty track for a classified level.
    pub fn for_level(level: RunnerLevel) -> Self {
        match level {
            RunnerLevel::Beginner => Self::Beginner {
                activity_level: None,
                can_run_nonstop_30min: None,
            },
            RunnerLevel::Advanced => Self::Advanced {
                distance_per_week: None,
                current_longest_run: None,
                recent_race: None,
            },
            RunnerLevel::Unknown => Self::Unknown,
        }
    }

    /// The level this track belongs to.
    pub fn level(&self) -> RunnerLevel {
        match self {
            Self::Unknown => RunnerLevel::Unknown,
            Self::Beginner { .. } => RunnerLevel::Beginner,
            Self::Advanced { .. } => RunnerLevel::Advanced,
        }
    }
}

/// The full state of one coaching conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileState {
    pub id: ConversationId,

    // Fields required of every athlete.
    pub goal: Option<Goal>,
    pub days_per_week: Option<u8>,
    pub preferred_distance_unit: Option<DistanceUnit>,
    pub age: Option<u8>,
    pub injury_history: Option<Vec<String>>,
    /// Preferred training intensity, when negotiated.
    pub intensity_preference: Option<Intensity>,

    /// Level-specific fitness data.
    pub fitness: FitnessTrack,

    // Dialogue bookkeeping.
    pub dialog_state: DialogState,
    pub transcript: Vec<ChatMessage>,
    /// Fields the last question actively solicited.
    pub awaiting_fields: Vec<ProfileField>,
    /// Consecutive turns that made no progress.
    pub failure_count: u8,
    pub coherence_check: Option<CoherenceCheck>,
    pub user_change_response: Option<UserChangeResponse>,
}

impl ProfileState {
    /// Creates an empty profile for a new conversation.
    pub fn new(id: ConversationId) -> Self {
        Self {
            id,
            goal: None,
            days_per_week: None,
            preferred_distance_unit: None,
            age: None,
            injury_history: None,
            intensity_preference: None,
            fitness: FitnessTrack::Unknown,
            dialog_state: DialogState::default(),
            transcript: Vec::new(),
            awaiting_fields: Vec::new(),
            failure_count: 0,
            coherence_check: None,
            user_change_response: None,
        }
    }

    /// The classified runner level.
    pub fn level(&self) -> RunnerLevel {
        self.fitness.level()
    }

    /// Appends a message, dropping the oldest entries past `cap`.
    pub fn push_message(&mut self, message: ChatMessage, cap: usize) {
        self.transcript.push(message);
        if self.transcript.len() > cap {
            let excess = self.transcript.len() - cap;
            self.transcript.drain(..excess);
        }
    }

    /// The most recent `n` transcript messages, oldest first.
    pub fn recent_transcript(&self, n: usize) -> &[ChatMessage] {
        let start = self.transcript.len().saturating_sub(n);
        &self.transcript[start..]
    }

    /// True when an unresolved coherence concern is active.
    pub fn has_active_concerns(&self) -> bool {
        self.coherence_check.as_ref().is_some_and(|check| !check.ok)
    }
}
