//! Athlete profile domain: the record accumulated through conversation,
//! field-requirement resolution, and coherence/negotiation value objects.

mod athlete;
mod coherence;
mod complete;
mod goal;
mod requirements;

pub use athlete::{ActivityLevel, FitnessTrack, ProfileState, RunnerLevel};
pub use coherence::{CoherenceCheck, Intensity, SuggestedChanges, UserChangeResponse};
pub use complete::{
    AthleteProfile, EquipmentAccess, FitnessLevel, IncompleteProfile, Logistics, StrengthProfile,
    Weekday, DEFAULT_PLAN_WEEKS,
};
pub use goal::{DistanceUnit, Goal, GoalKind, RaceDistance, RaceRecord, TargetDate};
pub use requirements::{FieldRequirementResolver, FieldRequirements, KnownField, ProfileField};
