//! Property-based tests for planning, distribution and success levels.
//!
//! Invariants:
//! - Planned values always fall in 1..=100 and respect their tier
//! - Redistributed dice hit the clamped total and stay in range
//! - Success levels compare tens digits

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use sk_mechanics::dice::DieSlot;
use sk_mechanics::planner::DOUBLES;
use sk_mechanics::resolution::tens_digit;
use sk_mechanics::{
    ExtendedTestProgress, OutcomeCategory, apply_extended_test_delta, plan_target_value,
    redistribute_dice, success_level,
};

// ============================================================================
// Strategies
// ============================================================================

fn arb_category() -> impl Strategy<Value = OutcomeCategory> {
    prop_oneof![
        Just(OutcomeCategory::CriticalSuccess),
        Just(OutcomeCategory::Success),
        Just(OutcomeCategory::Failure),
        Just(OutcomeCategory::CriticalFailure),
    ]
}

/// Dice with face counts and rolled values.
fn arb_slots() -> impl Strategy<Value = Vec<DieSlot>> {
    prop::collection::vec(
        (1u32..=100).prop_flat_map(|faces| (1..=faces, Just(faces))),
        0..8,
    )
    .prop_map(|dice| {
        dice.into_iter()
            .map(|(value, faces)| DieSlot::new(value, faces))
            .collect()
    })
}

fn is_double(v: u32) -> bool {
    DOUBLES.contains(&v)
}

// ============================================================================
// Planner
// ============================================================================

proptest! {
    #[test]
    fn planned_value_in_range(category in arb_category(), sv in 1i64..=110, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let v = plan_target_value(category, sv, &mut rng);
        prop_assert!((1..=100).contains(&v));
    }

    #[test]
    fn out_of_range_skill_is_clamped(category in arb_category(), sv in any::<i64>(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let v = plan_target_value(category, sv, &mut rng);
        prop_assert!((1..=100).contains(&v));
    }

    #[test]
    fn success_respects_skill(sv in 1i64..=110, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let v = i64::from(plan_target_value(OutcomeCategory::Success, sv, &mut rng));
        prop_assert!(v >= sv.min(10));
        if sv <= 95 {
            prop_assert!(v <= sv);
        }
    }

    #[test]
    fn failure_exceeds_skill(sv in 1i64..95, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let v = i64::from(plan_target_value(OutcomeCategory::Failure, sv, &mut rng));
        prop_assert!(v > sv);
    }

    #[test]
    fn critical_success_doubles_are_under_skill(sv in 1i64..=110, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let v = plan_target_value(OutcomeCategory::CriticalSuccess, sv, &mut rng);
        if is_double(v) {
            prop_assert!(i64::from(v) <= sv.min(100));
        } else {
            prop_assert!(i64::from(v) <= sv.min(5));
        }
    }

    #[test]
    fn critical_failure_doubles_are_over_skill(sv in 1i64..=110, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let v = plan_target_value(OutcomeCategory::CriticalFailure, sv, &mut rng);
        if is_double(v) {
            prop_assert!(i64::from(v) > sv.min(100));
        } else {
            prop_assert!(v >= 96);
        }
    }
}

// ============================================================================
// Distributor
// ============================================================================

proptest! {
    #[test]
    fn redistribution_hits_clamped_total(mut slots in arb_slots(), target in -50i64..1000, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let n = slots.len() as i64;
        let max: i64 = slots.iter().map(|s| i64::from(s.faces)).sum();

        let reached = redistribute_dice(&mut slots, target, &mut rng);

        if n == 0 {
            prop_assert_eq!(reached, None);
        } else {
            let expected = target.clamp(n, max);
            let sum: i64 = slots.iter().map(|s| i64::from(s.value)).sum();
            prop_assert_eq!(reached, Some(expected));
            prop_assert_eq!(sum, expected);
            prop_assert!(slots.iter().all(|s| s.value >= 1 && s.value <= s.faces));
        }
    }

    #[test]
    fn redistribution_is_stable_in_sum(mut slots in arb_slots(), target in 0i64..400, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        redistribute_dice(&mut slots, target, &mut rng);
        let first: i64 = slots.iter().map(|s| i64::from(s.value)).sum();
        redistribute_dice(&mut slots, target, &mut rng);
        let second: i64 = slots.iter().map(|s| i64::from(s.value)).sum();
        prop_assert_eq!(first, second);
    }
}

// ============================================================================
// Success levels and extended tests
// ============================================================================

proptest! {
    #[test]
    fn success_level_is_tens_difference(result in 1i64..=100, skill in 1i64..=110) {
        prop_assert_eq!(success_level(result, skill), tens_digit(skill) - tens_digit(result));
    }

    #[test]
    fn lower_rolls_never_score_worse(a in 1i64..=100, b in 1i64..=100, skill in 1i64..=110) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(success_level(low, skill) >= success_level(high, skill));
    }

    #[test]
    fn extended_delta_adds_up(current in -20i64..20, target in 0i64..20, delta in -10i64..10) {
        let update = apply_extended_test_delta(ExtendedTestProgress::new(current, target), delta);
        prop_assert_eq!(update.new_current, current + delta);
        prop_assert_eq!(update.reached_target, current + delta >= target);
    }
}

#[test]
fn documented_success_levels() {
    assert_eq!(success_level(45, 50), 1);
    assert_eq!(success_level(96, 40), -5);
}

#[test]
fn documented_extended_scenario() {
    let update = apply_extended_test_delta(ExtendedTestProgress::new(3, 5), 2);
    assert_eq!(update.new_current, 5);
    assert!(update.reached_target);
}
