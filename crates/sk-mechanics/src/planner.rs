//! Target-value planning.
//!
//! Turns a qualitative intent ("a clean success", "a fumble") into a
//! concrete d100 result that looks unremarkable for that tier given the
//! tester's effective skill. Doubles follow the percentile critical rule:
//! a double at or under the skill is a critical, a double above it a
//! fumble.

use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::error::{MechError, MechResult};
use crate::resolution::{OutcomeCategory, is_doubles};

/// The double results on a d100 below 100.
pub const DOUBLES: [u32; 9] = [11, 22, 33, 44, 55, 66, 77, 88, 99];

/// Effective skill values are clamped into `1..=MAX_EFFECTIVE_SKILL`.
pub const MAX_EFFECTIVE_SKILL: i64 = 110;

/// Returned for a mode the planner does not recognise.
pub const NEUTRAL_TARGET: u32 = 50;

/// Chance that a critical success is shown as a double rather than a very low roll.
pub const TRUE_DOUBLE_CHANCE: f64 = 0.6;

/// Chance that a critical failure is shown as a double rather than a 96-100.
pub const BAD_DOUBLE_CHANCE: f64 = 0.5;

/// Tunable probabilities used by the planner.
///
/// These are presentation choices, not rules of the game system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerTuning {
    /// Probability of picking a double for a critical success.
    pub true_double_chance: f64,
    /// Probability of picking a double for a critical failure.
    pub bad_double_chance: f64,
}

impl Default for PlannerTuning {
    fn default() -> Self {
        Self {
            true_double_chance: TRUE_DOUBLE_CHANCE,
            bad_double_chance: BAD_DOUBLE_CHANCE,
        }
    }
}

impl PlannerTuning {
    fn probability(p: f64, fallback: f64) -> f64 {
        if p.is_finite() {
            p.clamp(0.0, 1.0)
        } else {
            fallback
        }
    }
}

/// What the game master wants the roll to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetIntent {
    /// Let the planner pick a value for this tier.
    Preset(OutcomeCategory),
    /// Use exactly this value (clamped to 1-100).
    Exact(i64),
}

impl TargetIntent {
    /// Parse either a number or a category name.
    pub fn parse(s: &str) -> MechResult<Self> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Ok(Self::Exact(n));
        }
        OutcomeCategory::parse(trimmed)
            .map(Self::Preset)
            .ok_or_else(|| MechError::UnknownCategory(trimmed.to_string()))
    }
}

/// Plans d100 results for outcome categories.
#[derive(Debug, Clone, Copy, Default)]
pub struct Planner {
    tuning: PlannerTuning,
}

impl Planner {
    /// Create a planner with custom tuning.
    pub fn new(tuning: PlannerTuning) -> Self {
        Self { tuning }
    }

    /// The tuning in effect.
    pub fn tuning(&self) -> PlannerTuning {
        self.tuning
    }

    /// Plan a value in `1..=100` for `category` at `effective_skill`.
    pub fn plan(&self, category: OutcomeCategory, effective_skill: i64, rng: &mut StdRng) -> u32 {
        let sv = effective_skill.clamp(1, MAX_EFFECTIVE_SKILL) as u32;
        let cap = sv.min(100);

        match category {
            OutcomeCategory::CriticalSuccess => {
                let doubles: Vec<u32> = DOUBLES.iter().copied().filter(|&d| d <= cap).collect();
                let chance = PlannerTuning::probability(
                    self.tuning.true_double_chance,
                    TRUE_DOUBLE_CHANCE,
                );
                if !doubles.is_empty()
                    && rng.random_bool(chance)
                    && let Some(&double) = doubles.choose(rng)
                {
                    return double;
                }
                rng.random_range(1..=sv.min(5))
            }
            OutcomeCategory::Success => {
                let min = sv.min(10);
                let max = sv.min(95);
                if min >= max {
                    max
                } else {
                    rng.random_range(min..=max)
                }
            }
            OutcomeCategory::Failure => {
                let min = (sv + 1).min(95);
                let max = (sv + 20).min(95);
                if min >= max {
                    min
                } else {
                    rng.random_range(min..=max)
                }
            }
            OutcomeCategory::CriticalFailure => {
                let bad: Vec<u32> = DOUBLES.iter().copied().filter(|&d| d > cap).collect();
                let chance =
                    PlannerTuning::probability(self.tuning.bad_double_chance, BAD_DOUBLE_CHANCE);
                if !bad.is_empty()
                    && rng.random_bool(chance)
                    && let Some(&double) = bad.choose(rng)
                {
                    return double;
                }
                // 99 is a critical success for skills of 99+, so it is left out then
                let high: Vec<u32> = (96..=100)
                    .filter(|&v| v == 100 || !is_doubles(i64::from(v)) || v > cap)
                    .collect();
                high.choose(rng).copied().unwrap_or(100)
            }
        }
    }

    /// Plan a value for a mode string; unknown modes get [`NEUTRAL_TARGET`].
    pub fn plan_mode(&self, mode: &str, effective_skill: i64, rng: &mut StdRng) -> u32 {
        match OutcomeCategory::parse(mode) {
            Some(category) => self.plan(category, effective_skill, rng),
            None => NEUTRAL_TARGET,
        }
    }

    /// Resolve an intent to a concrete value in `1..=100`.
    pub fn resolve(&self, intent: TargetIntent, effective_skill: i64, rng: &mut StdRng) -> u32 {
        match intent {
            TargetIntent::Preset(category) => self.plan(category, effective_skill, rng),
            TargetIntent::Exact(n) => n.clamp(1, 100) as u32,
        }
    }
}

/// Plan a value for `category` with the default tuning.
pub fn plan_target_value(category: OutcomeCategory, effective_skill: i64, rng: &mut StdRng) -> u32 {
    Planner::default().plan(category, effective_skill, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const RUNS: usize = 500;

    fn samples(category: OutcomeCategory, sv: i64, seed: u64) -> Vec<u32> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..RUNS)
            .map(|_| plan_target_value(category, sv, &mut rng))
            .collect()
    }

    #[test]
    fn success_stays_at_or_under_skill() {
        for v in samples(OutcomeCategory::Success, 45, 1) {
            assert!((10..=45).contains(&v), "got {v}");
        }
    }

    #[test]
    fn success_degenerate_low_skill() {
        assert!(
            samples(OutcomeCategory::Success, 1, 2)
                .iter()
                .all(|&v| v == 1)
        );
        assert!(
            samples(OutcomeCategory::Success, 10, 2)
                .iter()
                .all(|&v| v == 10)
        );
    }

    #[test]
    fn success_caps_at_95() {
        for v in samples(OutcomeCategory::Success, 110, 3) {
            assert!((10..=95).contains(&v), "got {v}");
        }
    }

    #[test]
    fn failure_exceeds_skill() {
        for v in samples(OutcomeCategory::Failure, 45, 4) {
            assert!((46..=65).contains(&v), "got {v}");
        }
    }

    #[test]
    fn failure_degenerate_high_skill() {
        assert!(
            samples(OutcomeCategory::Failure, 100, 5)
                .iter()
                .all(|&v| v == 95)
        );
    }

    #[test]
    fn critical_success_mixes_doubles_and_low_rolls() {
        let values = samples(OutcomeCategory::CriticalSuccess, 45, 6);
        assert!(values.iter().any(|v| [11, 22, 33, 44].contains(v)));
        assert!(values.iter().any(|v| (1..=5).contains(v)));
        assert!(
            values
                .iter()
                .all(|v| [11, 22, 33, 44].contains(v) || (1..=5).contains(v))
        );
    }

    #[test]
    fn critical_success_low_skill_has_no_doubles() {
        for v in samples(OutcomeCategory::CriticalSuccess, 3, 7) {
            assert!((1..=3).contains(&v), "got {v}");
        }
    }

    #[test]
    fn critical_failure_mixes_bad_doubles_and_high_rolls() {
        let values = samples(OutcomeCategory::CriticalFailure, 45, 8);
        assert!(values.iter().any(|v| [55, 66, 77, 88, 99].contains(v)));
        assert!(values.iter().any(|v| (96..=100).contains(v)));
        for v in values {
            assert!(v >= 55, "got {v}");
        }
    }

    #[test]
    fn critical_failure_never_shows_good_double() {
        for v in samples(OutcomeCategory::CriticalFailure, 105, 9) {
            assert!([96, 97, 98, 100].contains(&v), "got {v}");
        }
    }

    #[test]
    fn tuning_zero_disables_doubles() {
        let planner = Planner::new(PlannerTuning {
            true_double_chance: 0.0,
            bad_double_chance: 0.0,
        });
        let mut rng = StdRng::seed_from_u64(10);
        for _ in 0..RUNS {
            assert!(planner.plan(OutcomeCategory::CriticalSuccess, 80, &mut rng) <= 5);
            assert!(planner.plan(OutcomeCategory::CriticalFailure, 20, &mut rng) >= 96);
        }
    }

    #[test]
    fn tuning_out_of_range_is_clamped() {
        let planner = Planner::new(PlannerTuning {
            true_double_chance: 7.0,
            bad_double_chance: f64::NAN,
        });
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..RUNS {
            let v = planner.plan(OutcomeCategory::CriticalSuccess, 50, &mut rng);
            assert!([11, 22, 33, 44].contains(&v), "got {v}");
            planner.plan(OutcomeCategory::CriticalFailure, 50, &mut rng);
        }
    }

    #[test]
    fn unknown_mode_is_neutral() {
        let mut rng = StdRng::seed_from_u64(12);
        assert_eq!(Planner::default().plan_mode("sideways", 40, &mut rng), 50);
        let v = Planner::default().plan_mode("success", 40, &mut rng);
        assert!((10..=40).contains(&v));
    }

    #[test]
    fn exact_intent_is_clamped() {
        let mut rng = StdRng::seed_from_u64(13);
        let planner = Planner::default();
        assert_eq!(planner.resolve(TargetIntent::Exact(67), 40, &mut rng), 67);
        assert_eq!(planner.resolve(TargetIntent::Exact(0), 40, &mut rng), 1);
        assert_eq!(planner.resolve(TargetIntent::Exact(250), 40, &mut rng), 100);
    }

    #[test]
    fn intent_parsing() {
        assert_eq!(TargetIntent::parse("67").unwrap(), TargetIntent::Exact(67));
        assert_eq!(
            TargetIntent::parse("crit-fail").unwrap(),
            TargetIntent::Preset(OutcomeCategory::CriticalFailure)
        );
        assert!(TargetIntent::parse("maybe").is_err());
    }
}
