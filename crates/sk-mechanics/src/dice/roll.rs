//! Rolled formulas and forced totals.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::{Die, DieSlot};
use crate::distribute::redistribute_dice;

/// The rolled dice of one formula term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceTerm {
    /// The type of die rolled.
    pub die: Die,
    /// One slot per die.
    pub slots: Vec<DieSlot>,
}

impl DiceTerm {
    /// Sum of the faces in this term.
    pub fn total(&self) -> i64 {
        self.slots.iter().map(|s| i64::from(s.value)).sum()
    }
}

/// One evaluated term of a roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollTerm {
    /// Dice and their faces.
    Dice(DiceTerm),
    /// A flat modifier.
    Constant(i64),
}

/// An evaluated formula, possibly carrying a forced total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roll {
    /// The normalised formula this roll came from.
    pub formula: String,
    /// Evaluated terms in formula order.
    pub terms: Vec<RollTerm>,
    forced_total: Option<i64>,
}

impl Roll {
    /// Create a roll from evaluated terms.
    pub fn new(formula: impl Into<String>, terms: Vec<RollTerm>) -> Self {
        Self {
            formula: formula.into(),
            terms,
            forced_total: None,
        }
    }

    /// Sum of all die faces.
    pub fn dice_total(&self) -> i64 {
        self.slots().map(|s| i64::from(s.value)).sum()
    }

    /// Sum of all flat modifiers.
    pub fn constant_total(&self) -> i64 {
        self.terms
            .iter()
            .map(|t| match t {
                RollTerm::Constant(n) => *n,
                RollTerm::Dice(_) => 0,
            })
            .sum()
    }

    /// The total the dice and modifiers actually add up to.
    pub fn natural_total(&self) -> i64 {
        self.dice_total() + self.constant_total()
    }

    /// The reported total: the forced value if one was set.
    pub fn total(&self) -> i64 {
        self.forced_total.unwrap_or_else(|| self.natural_total())
    }

    /// Returns true if the total has been overridden.
    pub fn is_forced(&self) -> bool {
        self.forced_total.is_some()
    }

    /// Number of individual dice in the roll.
    pub fn dice_count(&self) -> usize {
        self.slots().count()
    }

    /// All die slots across every dice term.
    pub fn slots(&self) -> impl Iterator<Item = &DieSlot> {
        self.terms
            .iter()
            .filter_map(|t| match t {
                RollTerm::Dice(dice) => Some(dice.slots.iter()),
                RollTerm::Constant(_) => None,
            })
            .flatten()
    }

    /// Mutable access to all die slots across every dice term.
    pub fn slots_mut(&mut self) -> impl Iterator<Item = &mut DieSlot> {
        self.terms
            .iter_mut()
            .filter_map(|t| match t {
                RollTerm::Dice(dice) => Some(dice.slots.iter_mut()),
                RollTerm::Constant(_) => None,
            })
            .flatten()
    }

    /// Force the roll to report `desired` as its total.
    ///
    /// The dice absorb `desired` minus the flat modifiers, clamped to what
    /// they can show; the reported total is `desired` regardless. A roll
    /// without dice only receives the aggregate override.
    pub fn force_total(&mut self, desired: i64, rng: &mut StdRng) {
        let dice_target = desired.saturating_sub(self.constant_total());
        redistribute_dice(self.slots_mut(), dice_target, rng);
        self.forced_total = Some(desired);
    }
}

impl std::fmt::Display for Roll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: ", self.formula)?;
        for (i, term) in self.terms.iter().enumerate() {
            match term {
                RollTerm::Dice(dice) => {
                    if i > 0 {
                        write!(f, " + ")?;
                    }
                    let values: Vec<String> =
                        dice.slots.iter().map(|s| s.value.to_string()).collect();
                    write!(f, "[{}]", values.join(", "))?;
                }
                RollTerm::Constant(n) if *n < 0 && i > 0 => write!(f, " - {}", n.abs())?,
                RollTerm::Constant(n) => {
                    if i > 0 {
                        write!(f, " + ")?;
                    }
                    write!(f, "{n}")?;
                }
            }
        }
        write!(f, " = {}", self.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn make_roll(values: &[(u32, u32)], constant: i64) -> Roll {
        let slots = values.iter().map(|&(v, f)| DieSlot::new(v, f)).collect();
        let mut terms = vec![RollTerm::Dice(DiceTerm {
            die: Die::D10,
            slots,
        })];
        if constant != 0 {
            terms.push(RollTerm::Constant(constant));
        }
        Roll::new("test", terms)
    }

    #[test]
    fn totals() {
        let r = make_roll(&[(3, 10), (8, 10)], 5);
        assert_eq!(r.dice_total(), 11);
        assert_eq!(r.constant_total(), 5);
        assert_eq!(r.total(), 16);
        assert!(!r.is_forced());
    }

    #[test]
    fn force_total_with_modifier() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut r = make_roll(&[(3, 10), (8, 10)], 5);
        r.force_total(9, &mut rng);
        assert_eq!(r.dice_total(), 4);
        assert_eq!(r.total(), 9);
        assert!(r.is_forced());
        assert!(r.slots().all(DieSlot::is_valid));
    }

    #[test]
    fn force_total_beyond_dice_range_still_reports_desired() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut r = make_roll(&[(3, 10)], 0);
        r.force_total(67, &mut rng);
        assert_eq!(r.dice_total(), 10);
        assert_eq!(r.total(), 67);
    }

    #[test]
    fn force_total_at_integer_limits() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut r = make_roll(&[(3, 10)], -5);
        r.force_total(i64::MAX, &mut rng);
        assert_eq!(r.dice_total(), 10);
        assert_eq!(r.total(), i64::MAX);

        let mut r = make_roll(&[(3, 10)], 5);
        r.force_total(i64::MIN, &mut rng);
        assert_eq!(r.dice_total(), 1);
        assert_eq!(r.total(), i64::MIN);
    }

    #[test]
    fn force_total_without_dice() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut r = Roll::new("5", vec![RollTerm::Constant(5)]);
        r.force_total(12, &mut rng);
        assert_eq!(r.dice_count(), 0);
        assert_eq!(r.total(), 12);
    }

    #[test]
    fn display() {
        let r = make_roll(&[(3, 10), (5, 10)], -2);
        assert_eq!(r.to_string(), "test: [3, 5] - 2 = 6");
    }
}
