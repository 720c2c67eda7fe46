//! Strategist port: authors the high-level training strategy.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::planning::TrainingStrategy;
use crate::domain::profile::AthleteProfile;

use super::oracle::OracleError;

/// How much of the first calendar week is usable for training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstWeekAvailability {
    /// A standard training week.
    Full,
    /// Only part of the week remains; volume should be adjusted.
    Partial { sessions: u32 },
}

/// Authors a phase strategy for the athlete.
///
/// The returned strategy must distribute exactly `total_weeks_available`
/// across its phases; the planning engine rejects anything else.
#[async_trait]
pub trait Strategist: Send + Sync {
    async fn author_strategy(
        &self,
        profile: &AthleteProfile,
        total_weeks_available: u32,
        first_week: FirstWeekAvailability,
    ) -> Result<TrainingStrategy, OracleError>;
}
