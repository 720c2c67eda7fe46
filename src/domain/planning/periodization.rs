//! Weekly periodization.
//!
//! Expands a validated phase strategy into exact per-week volume and
//! long-run targets: a linear build from the athlete's current baseline to
//! the peak targets, with recovery weeks dropped in on a fixed cycle and a
//! steep taper in front of the race. The whole computation is a pure
//! function of profile and strategy.

use serde::{Deserialize, Serialize};

use crate::domain::profile::{AthleteProfile, FitnessLevel};

use super::strategy::{PhaseName, PlanningError, TrainingStrategy};

/// Volume and long-run targets for one plan week. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyTarget {
    /// 1-based week number.
    pub week_number: u32,
    pub phase_name: PhaseName,
    pub is_recovery_week: bool,
    pub total_volume: u32,
    pub long_run_distance: u32,
}

/// Deterministic expansion of a strategy into weekly targets.
pub struct PeriodizationEngine;

impl PeriodizationEngine {
    /// Computes the ordered weekly targets for the whole plan.
    ///
    /// Rejects strategies whose phase durations do not account for exactly
    /// the available weeks. Identical inputs always produce identical
    /// output.
    pub fn compute_weekly_targets(
        profile: &AthleteProfile,
        strategy: &TrainingStrategy,
    ) -> Result<Vec<WeeklyTarget>, PlanningError> {
        strategy.validate()?;

        let cycle_length = Self::recovery_cycle_length(profile);
        let (baseline_volume, baseline_long_run) = Self::starting_values(profile);

        let week_phases: Vec<PhaseName> = strategy
            .phases
            .iter()
            .flat_map(|phase| {
                std::iter::repeat(phase.name).take(phase.duration_weeks as usize)
            })
            .collect();
        let total_weeks = week_phases.len();

        // The peak sits right before the taper starts; plans without a taper
        // (or nothing but taper) peak in their final week.
        let peak_index = match week_phases.iter().position(|p| *p == PhaseName::Taper) {
            Some(0) | None => total_weeks - 1,
            Some(first_taper) => first_taper - 1,
        };

        let vol_range = (f64::from(strategy.target_peak_volume) - baseline_volume).max(0.0);
        let lr_range = (f64::from(strategy.target_longest_run) - baseline_long_run).max(0.0);

        let mut targets = Vec::with_capacity(total_weeks);
        for (index, phase) in week_phases.iter().enumerate() {
            let week_number = index as u32 + 1;

            let (volume, long_run, is_recovery) = if *phase == PhaseName::Taper {
                let weeks_until_race = total_weeks - index;
                let factor = match weeks_until_race {
                    w if w >= 3 => 0.75,
                    2 => 0.60,
                    _ => 0.40, // race week
                };
                (
                    round(f64::from(strategy.target_peak_volume) * factor),
                    // The long run drops faster than volume in the taper.
                    round(f64::from(strategy.target_longest_run) * factor * 0.6),
                    true,
                )
            } else {
                let is_recovery = week_number % cycle_length == 0 && index != peak_index;
                let progress_fraction = if peak_index > 0 {
                    index as f64 / peak_index as f64
                } else {
                    1.0
                };
                let raw_volume = baseline_volume + vol_range * progress_fraction;
                let raw_long_run = baseline_long_run + lr_range * progress_fraction;

                if is_recovery {
                    (round(raw_volume * 0.8), round(raw_long_run * 0.75), true)
                } else if index == peak_index {
                    (strategy.target_peak_volume, strategy.target_longest_run, false)
                } else {
                    (round(raw_volume), round(raw_long_run), false)
                }
            };

            // The long run should not dominate the week once volume is past
            // low-mileage territory.
            let long_run = if volume > 30 && f64::from(long_run) > f64::from(volume) * 0.55 {
                round(f64::from(volume) * 0.55)
            } else {
                long_run
            };

            targets.push(WeeklyTarget {
                week_number,
                phase_name: *phase,
                is_recovery_week: is_recovery,
                total_volume: volume,
                long_run_distance: long_run,
            });
        }

        Ok(targets)
    }

    /// Length of the build/recovery cycle in weeks.
    ///
    /// Three build weeks plus one recovery week by default; any single risk
    /// factor (over 50, prior injuries, beginner) shortens the cycle to two
    /// build weeks plus one recovery. Multiple risk factors do not shorten
    /// it further.
    pub fn recovery_cycle_length(profile: &AthleteProfile) -> u32 {
        let at_risk = profile.age > 50
            || !profile.injury_history.is_empty()
            || profile.fitness.is_beginner();
        if at_risk {
            3
        } else {
            4
        }
    }

    /// Current safe weekly volume and long run to build from.
    pub fn starting_values(profile: &AthleteProfile) -> (f64, f64) {
        match &profile.fitness {
            FitnessLevel::Advanced {
                average_weekly_distance,
                current_longest_run,
                ..
            } => (*average_weekly_distance, *current_longest_run),
            FitnessLevel::Beginner {
                can_run_nonstop_30min,
                ..
            } => {
                if *can_run_nonstop_30min {
                    (15.0, 5.0)
                } else {
                    (10.0, 3.0)
                }
            }
        }
    }
}

fn round(value: f64) -> u32 {
    value.round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::{
        ActivityLevel, DistanceUnit, Goal, GoalKind,
    };
    use crate::domain::planning::Phase;

    fn advanced_profile() -> AthleteProfile {
        AthleteProfile {
            age: 30,
            injury_history: vec![],
            unit: DistanceUnit::Kilometers,
            days_per_week: 4,
            goal: Goal::new(GoalKind::Marathon),
            fitness: FitnessLevel::Advanced {
                average_weekly_distance: 35.0,
                current_longest_run: 14.0,
                recent_race: None,
            },
            logistics: None,
            strength: None,
            intensity_preference: None,
        }
    }

    fn beginner_profile() -> AthleteProfile {
        AthleteProfile {
            age: 40,
            injury_history: vec!["shin splints".to_string()],
            unit: DistanceUnit::Kilometers,
            days_per_week: 3,
            goal: Goal::new(GoalKind::TenK),
            fitness: FitnessLevel::Beginner {
                activity_level: ActivityLevel::ModeratelyActive,
                can_run_nonstop_30min: true,
            },
            logistics: None,
            strength: None,
            intensity_preference: None,
        }
    }

    fn marathon_strategy() -> TrainingStrategy {
        TrainingStrategy {
            overview: "build to the marathon".to_string(),
            target_peak_volume: 70,
            target_longest_run: 32,
            total_weeks_available: 14,
            phases: vec![
                Phase::new(PhaseName::Base, 6, "aerobic base"),
                Phase::new(PhaseName::Build, 4, "volume and specificity"),
                Phase::new(PhaseName::Peak, 2, "sharpen"),
                Phase::new(PhaseName::Taper, 2, "freshen up"),
            ],
        }
    }

    mod cycle_length {
        use super::*;

        #[test]
        fn healthy_adult_advanced_runner_gets_four_week_cycle() {
            assert_eq!(
                PeriodizationEngine::recovery_cycle_length(&advanced_profile()),
                4
            );
        }

        #[test]
        fn injured_beginner_gets_three_week_cycle() {
            // Two risk factors still shorten the cycle only once.
            assert_eq!(
                PeriodizationEngine::recovery_cycle_length(&beginner_profile()),
                3
            );
        }

        #[test]
        fn age_over_fifty_alone_shortens_the_cycle() {
            let mut profile = advanced_profile();
            profile.age = 55;
            assert_eq!(PeriodizationEngine::recovery_cycle_length(&profile), 3);
        }
    }

    mod baselines {
        use super::*;

        #[test]
        fn advanced_baseline_uses_current_training() {
            assert_eq!(
                PeriodizationEngine::starting_values(&advanced_profile()),
                (35.0, 14.0)
            );
        }

        #[test]
        fn beginner_who_can_run_thirty_minutes_starts_higher() {
            assert_eq!(
                PeriodizationEngine::starting_values(&beginner_profile()),
                (15.0, 5.0)
            );
        }

        #[test]
        fn beginner_who_cannot_starts_lower() {
            let mut profile = beginner_profile();
            profile.fitness = FitnessLevel::Beginner {
                activity_level: ActivityLevel::Sedentary,
                can_run_nonstop_30min: false,
            };
            assert_eq!(
                PeriodizationEngine::starting_values(&profile),
                (10.0, 3.0)
            );
        }
    }

    mod progression {
        use super::*;

        #[test]
        fn produces_one_target_per_plan_week() {
            let targets = PeriodizationEngine::compute_weekly_targets(
                &advanced_profile(),
                &marathon_strategy(),
            )
            .unwrap();
            assert_eq!(targets.len(), 14);
            assert_eq!(targets[0].week_number, 1);
            assert_eq!(targets[13].week_number, 14);
        }

        #[test]
        fn peak_week_hits_targets_exactly() {
            let strategy = marathon_strategy();
            let targets =
                PeriodizationEngine::compute_weekly_targets(&advanced_profile(), &strategy)
                    .unwrap();
            // Taper starts at index 12, so the peak is index 11.
            let peak = &targets[11];
            assert_eq!(peak.total_volume, strategy.target_peak_volume);
            assert_eq!(peak.long_run_distance, strategy.target_longest_run);
            assert!(!peak.is_recovery_week);
        }

        #[test]
        fn first_week_starts_at_the_baseline() {
            let targets = PeriodizationEngine::compute_weekly_targets(
                &advanced_profile(),
                &marathon_strategy(),
            )
            .unwrap();
            assert_eq!(targets[0].total_volume, 35);
            assert_eq!(targets[0].long_run_distance, 14);
        }

        #[test]
        fn recovery_weeks_follow_the_cycle() {
            let targets = PeriodizationEngine::compute_weekly_targets(
                &advanced_profile(),
                &marathon_strategy(),
            )
            .unwrap();
            // Four-week cycle: weeks 4 and 8 recover; week 12 is the peak.
            assert!(targets[3].is_recovery_week);
            assert!(targets[7].is_recovery_week);
            assert!(!targets[11].is_recovery_week);
        }

        #[test]
        fn recovery_weeks_dip_below_the_linear_build() {
            let targets = PeriodizationEngine::compute_weekly_targets(
                &advanced_profile(),
                &marathon_strategy(),
            )
            .unwrap();
            // Week 4 recovers; weeks 3 and 5 sit on the line around it.
            assert!(targets[3].total_volume < targets[2].total_volume);
            assert!(targets[3].total_volume < targets[4].total_volume);
        }

        #[test]
        fn baseline_above_target_never_regresses_mid_plan() {
            let mut strategy = marathon_strategy();
            strategy.target_peak_volume = 30;
            strategy.target_longest_run = 12;
            let targets =
                PeriodizationEngine::compute_weekly_targets(&advanced_profile(), &strategy)
                    .unwrap();
            // Ranges clamp at zero, so build weeks hold the baseline.
            assert_eq!(targets[0].total_volume, 35);
            assert_eq!(targets[1].total_volume, 35);
        }
    }

    mod taper {
        use super::*;

        #[test]
        fn race_week_drops_to_forty_percent() {
            let strategy = marathon_strategy();
            let targets =
                PeriodizationEngine::compute_weekly_targets(&advanced_profile(), &strategy)
                    .unwrap();
            let race_week = &targets[13];
            assert_eq!(
                race_week.total_volume,
                (f64::from(strategy.target_peak_volume) * 0.40).round() as u32
            );
            assert!(race_week.is_recovery_week);
        }

        #[test]
        fn taper_factors_step_down_by_weeks_remaining() {
            let mut strategy = marathon_strategy();
            strategy.phases = vec![
                Phase::new(PhaseName::Base, 6, "base"),
                Phase::new(PhaseName::Build, 3, "build"),
                Phase::new(PhaseName::Peak, 2, "peak"),
                Phase::new(PhaseName::Taper, 3, "taper"),
            ];
            let targets =
                PeriodizationEngine::compute_weekly_targets(&advanced_profile(), &strategy)
                    .unwrap();
            let peak = f64::from(strategy.target_peak_volume);
            assert_eq!(targets[11].total_volume, (peak * 0.75).round() as u32);
            assert_eq!(targets[12].total_volume, (peak * 0.60).round() as u32);
            assert_eq!(targets[13].total_volume, (peak * 0.40).round() as u32);
        }

        #[test]
        fn every_taper_week_is_recovery() {
            let targets = PeriodizationEngine::compute_weekly_targets(
                &advanced_profile(),
                &marathon_strategy(),
            )
            .unwrap();
            assert!(targets[12].is_recovery_week);
            assert!(targets[13].is_recovery_week);
        }
    }

    mod structure {
        use super::*;

        #[test]
        fn plans_without_taper_peak_in_the_final_week() {
            let strategy = TrainingStrategy {
                overview: "steady base building".to_string(),
                target_peak_volume: 45,
                target_longest_run: 16,
                total_weeks_available: 8,
                phases: vec![
                    Phase::new(PhaseName::Base, 6, "base"),
                    Phase::new(PhaseName::Build, 2, "build"),
                ],
            };
            let targets =
                PeriodizationEngine::compute_weekly_targets(&advanced_profile(), &strategy)
                    .unwrap();
            let last = targets.last().unwrap();
            assert_eq!(last.total_volume, 45);
            assert_eq!(last.long_run_distance, 16);
        }

        #[test]
        fn invariant_violation_is_rejected_before_computation() {
            let mut strategy = marathon_strategy();
            strategy.total_weeks_available = 16;
            let err = PeriodizationEngine::compute_weekly_targets(
                &advanced_profile(),
                &strategy,
            )
            .unwrap_err();
            assert_eq!(
                err,
                PlanningError::StrategyInvariant {
                    expected: 16,
                    actual: 14
                }
            );
        }

        #[test]
        fn long_run_is_capped_against_weekly_volume() {
            let strategy = TrainingStrategy {
                overview: "long-run heavy".to_string(),
                target_peak_volume: 40,
                target_longest_run: 30,
                total_weeks_available: 4,
                phases: vec![Phase::new(PhaseName::Build, 4, "build")],
            };
            let targets =
                PeriodizationEngine::compute_weekly_targets(&advanced_profile(), &strategy)
                    .unwrap();
            for target in &targets {
                if target.total_volume > 30 {
                    let cap = (f64::from(target.total_volume) * 0.55).round() as u32;
                    assert!(
                        target.long_run_distance <= cap,
                        "week {} long run {} exceeds cap {}",
                        target.week_number,
                        target.long_run_distance,
                        cap
                    );
                }
            }
        }

        #[test]
        fn identical_inputs_reproduce_identical_outputs() {
            let profile = beginner_profile();
            let strategy = marathon_strategy();
            let first =
                PeriodizationEngine::compute_weekly_targets(&profile, &strategy).unwrap();
            let second =
                PeriodizationEngine::compute_weekly_targets(&profile, &strategy).unwrap();
            assert_eq!(first, second);
        }

        #[test]
        fn single_week_plan_peaks_immediately() {
            let strategy = TrainingStrategy {
                overview: "one week".to_string(),
                target_peak_volume: 25,
                target_longest_run: 8,
                total_weeks_available: 1,
                phases: vec![Phase::new(PhaseName::Base, 1, "base")],
            };
            let targets =
                PeriodizationEngine::compute_weekly_targets(&advanced_profile(), &strategy)
                    .unwrap();
            assert_eq!(targets.len(), 1);
            assert_eq!(targets[0].total_volume, 25);
            assert_eq!(targets[0].long_run_distance, 8);
        }
    }
}
