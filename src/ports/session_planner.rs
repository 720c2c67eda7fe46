//! Session planner port: details the daily sessions for one plan week.

use async_trait::async_trait;

use crate::domain::planning::{WeekPlanRequest, WeeklySchedule};

use super::oracle::OracleError;

/// Expands one week's volume and long-run targets into concrete daily
/// running (and optional strength) sessions.
///
/// Output is validated against the request: session volume must land within
/// 5% of the weekly target and the long run must sit on the long-run day at
/// its target distance.
#[async_trait]
pub trait SessionPlanner: Send + Sync {
    async fn plan_week(&self, request: &WeekPlanRequest) -> Result<WeeklySchedule, OracleError>;
}
