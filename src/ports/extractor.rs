//! Extractor port: pulls structured data out of conversation turns.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::dialogue::ChatMessage;
use crate::domain::profile::{
    ActivityLevel, DistanceUnit, KnownField, ProfileField, SuggestedChanges, UserChangeResponse,
};

use super::oracle::{GoalDraft, OracleError, OracleViolation, RaceRecordDraft};

/// A partial profile update extracted from recent messages.
///
/// Implementations must only populate fields from the requested set; the
/// dialogue engine rejects updates that stray outside it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub goal: Option<GoalDraft>,
    pub days_per_week: Option<u8>,
    pub preferred_distance_unit: Option<DistanceUnit>,
    pub age: Option<u8>,
    pub injury_history: Option<Vec<String>>,
    pub activity_level: Option<ActivityLevel>,
    /// Rider on the activity question; only meaningful for beginners.
    pub can_run_nonstop_30min: Option<bool>,
    pub distance_per_week: Option<f64>,
    /// Rider on the mileage question; captured when mentioned.
    pub current_longest_run: Option<f64>,
    pub recent_race: Option<RaceRecordDraft>,
}

impl ProfileUpdate {
    /// The required fields this update populates.
    pub fn populated_fields(&self) -> Vec<ProfileField> {
        let mut fields = Vec::new();
        if self.goal.is_some() {
            fields.push(ProfileField::Goal);
        }
        if self.days_per_week.is_some() {
            fields.push(ProfileField::DaysPerWeek);
        }
        if self.preferred_distance_unit.is_some() {
            fields.push(ProfileField::PreferredDistanceUnit);
        }
        if self.age.is_some() {
            fields.push(ProfileField::Age);
        }
        if self.injury_history.is_some() {
            fields.push(ProfileField::InjuryHistory);
        }
        if self.activity_level.is_some() {
            fields.push(ProfileField::ActivityLevel);
        }
        if self.distance_per_week.is_some() {
            fields.push(ProfileField::DistancePerWeek);
        }
        if self.recent_race.is_some() {
            fields.push(ProfileField::RecentRace);
        }
        fields
    }

    /// True when nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.populated_fields().is_empty()
            && self.can_run_nonstop_30min.is_none()
            && self.current_longest_run.is_none()
    }
}

/// Wire form of the user's reply to suggested changes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserChangeResponseDraft {
    pub accepted: bool,
    pub counter_proposal: Option<super::SuggestedChangesDraft>,
}

impl UserChangeResponseDraft {
    /// Resolves into the domain response, validating any counter-proposal.
    pub fn resolve(self) -> Result<UserChangeResponse, OracleViolation> {
        let counter_proposal = self
            .counter_proposal
            .map(|draft| draft.resolve())
            .transpose()?;
        Ok(UserChangeResponse {
            accepted: self.accepted,
            counter_proposal,
        })
    }
}

/// Extracts structured updates from the athlete's messages.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extracts values for the requested missing fields from the most
    /// recent exchange. Dates keep the form the user gave them in.
    async fn extract_profile(
        &self,
        known: &[KnownField],
        missing: &[ProfileField],
        recent: &[ChatMessage],
    ) -> Result<ProfileUpdate, OracleError>;

    /// Reads the user's reaction to suggested changes: acceptance, a
    /// counter-proposal, or neither when the reply is unclear.
    async fn extract_change_response(
        &self,
        suggested: &SuggestedChanges,
        recent: &[ChatMessage],
    ) -> Result<UserChangeResponseDraft, OracleError>;
}
