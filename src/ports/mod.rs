//! Ports: narrow contracts between the domain and the outside world.
//!
//! Each oracle port models one natural-language judgment as a blocking
//! request/response call. Any implementation (remote model, scripted
//! fixture, rule engine) may satisfy a port, which keeps the dialogue and
//! planning engines testable without network dependencies.

mod classifier;
mod extractor;
mod interviewer;
mod oracle;
mod profile_repository;
mod session_planner;
mod strategist;
mod verifier;

pub use classifier::{Classification, Classifier};
pub use extractor::{Extractor, ProfileUpdate, UserChangeResponseDraft};
pub use interviewer::{InterviewPrompt, Interviewer};
pub use oracle::{
    GoalDraft, OracleError, OracleViolation, RaceRecordDraft, SuggestedChangesDraft,
    TargetDateDraft,
};
pub use profile_repository::{ProfileRepository, RepositoryError};
pub use session_planner::SessionPlanner;
pub use strategist::{FirstWeekAvailability, Strategist};
pub use verifier::{CoherenceCheckDraft, Verifier};
