//! Planning domain: phase strategies, deterministic weekly periodization,
//! and per-week session building.

mod periodization;
mod schedule;
mod session;
mod strategy;

pub use periodization::{PeriodizationEngine, WeeklyTarget};
pub use schedule::{Exercise, RunType, RunningSession, StrengthSession, WeeklySchedule};
pub use session::{ScheduleViolation, SessionBuilder, WeekPlanRequest};
pub use strategy::{Phase, PhaseName, PlanningError, TrainingStrategy};
