//! High-level training strategy.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The four periodization phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseName {
    /// Aerobic development.
    Base,
    /// Increasing specificity and volume.
    Build,
    /// Highest volume and intensity.
    Peak,
    /// Pre-race load reduction.
    Taper,
}

impl fmt::Display for PhaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => write!(f, "Base"),
            Self::Build => write!(f, "Build"),
            Self::Peak => write!(f, "Peak"),
            Self::Taper => write!(f, "Taper"),
        }
    }
}

/// One phase of the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub name: PhaseName,
    pub duration_weeks: u32,
    pub focus: String,
}

impl Phase {
    /// Creates a phase.
    pub fn new(name: PhaseName, duration_weeks: u32, focus: impl Into<String>) -> Self {
        Self {
            name,
            duration_weeks,
            focus: focus.into(),
        }
    }
}

/// The strategist's high-level plan: peak targets plus an ordered phase
/// breakdown that must account for every available week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingStrategy {
    pub overview: String,
    /// Peak weekly volume, in the athlete's preferred unit.
    pub target_peak_volume: u32,
    /// Longest single run of the plan.
    pub target_longest_run: u32,
    /// The week budget the strategy was authored against.
    pub total_weeks_available: u32,
    pub phases: Vec<Phase>,
}

impl TrainingStrategy {
    /// Sum of the phase durations.
    pub fn total_phase_weeks(&self) -> u32 {
        self.phases.iter().map(|phase| phase.duration_weeks).sum()
    }

    /// Checks the phase-sum invariant.
    ///
    /// Phase durations must add up to exactly the available weeks; a
    /// violating strategy is never periodized, it is sent back for
    /// regeneration.
    pub fn validate(&self) -> Result<(), PlanningError> {
        if self.total_weeks_available == 0 || self.phases.is_empty() {
            return Err(PlanningError::EmptyPlan);
        }
        let actual = self.total_phase_weeks();
        if actual != self.total_weeks_available {
            return Err(PlanningError::StrategyInvariant {
                expected: self.total_weeks_available,
                actual,
            });
        }
        Ok(())
    }
}

/// Planning failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanningError {
    /// Phase durations do not sum to the available weeks.
    #[error("phase durations sum to {actual} weeks, expected exactly {expected}")]
    StrategyInvariant { expected: u32, actual: u32 },

    /// The strategy has no phases or no weeks at all.
    #[error("strategy contains no plan weeks")]
    EmptyPlan,
}
