//! Roll formula parsing and rolling.
//!
//! A formula is a sum of dice terms and signed constants, e.g. `1d100`,
//! `2d10+5`, `d20 - 2` or `3d6+1d4`. Only additive dice terms are accepted,
//! because a forced total has to be spread over faces that all count up.

use std::str::FromStr;

use rand::Rng;
use rand::rngs::StdRng;

use super::roll::{DiceTerm, Roll, RollTerm};
use super::{Die, DieSlot};
use crate::error::{MechError, MechResult};

/// Upper bound on the number of dice in a single term.
pub const MAX_DICE_PER_TERM: u32 = 100;

/// Upper bound on the magnitude of a flat modifier.
pub const MAX_CONSTANT: i64 = 10_000;

/// One term of a parsed formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormulaTerm {
    /// `count` dice of the given type.
    Dice {
        /// How many dice to roll.
        count: u32,
        /// Which die.
        die: Die,
    },
    /// A signed flat modifier.
    Constant(i64),
}

/// A parsed, validated roll formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    terms: Vec<FormulaTerm>,
}

impl Formula {
    /// Parse a formula such as `"2d10+5"`. Whitespace is ignored.
    pub fn parse(input: &str) -> MechResult<Self> {
        let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(MechError::formula(input, "formula is empty"));
        }

        let mut rest = compact.as_str();
        let mut negative = false;
        if let Some(stripped) = rest.strip_prefix('-') {
            negative = true;
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('+') {
            rest = stripped;
        }

        let mut terms = Vec::new();
        loop {
            let end = rest.find(['+', '-']).unwrap_or(rest.len());
            terms.push(parse_term(input, &rest[..end], negative)?);
            if end == rest.len() {
                break;
            }
            negative = rest[end..].starts_with('-');
            rest = &rest[end + 1..];
        }

        Ok(Self { terms })
    }

    /// The single percentile die formula (`1d100`).
    pub fn percentile() -> Self {
        Self {
            terms: vec![FormulaTerm::Dice {
                count: 1,
                die: Die::D100,
            }],
        }
    }

    /// The parsed terms in order.
    pub fn terms(&self) -> &[FormulaTerm] {
        &self.terms
    }

    /// Total number of dice across all terms.
    pub fn dice_count(&self) -> u32 {
        self.terms
            .iter()
            .map(|t| match t {
                FormulaTerm::Dice { count, .. } => *count,
                FormulaTerm::Constant(_) => 0,
            })
            .sum()
    }

    /// Roll every dice term with the given RNG.
    pub fn roll(&self, rng: &mut StdRng) -> Roll {
        let terms = self
            .terms
            .iter()
            .map(|term| match *term {
                FormulaTerm::Dice { count, die } => {
                    let slots = (0..count)
                        .map(|_| DieSlot::new(rng.random_range(1..=die.sides()), die.sides()))
                        .collect();
                    RollTerm::Dice(DiceTerm { die, slots })
                }
                FormulaTerm::Constant(n) => RollTerm::Constant(n),
            })
            .collect();
        Roll::new(self.to_string(), terms)
    }
}

impl FromStr for Formula {
    type Err = MechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            match term {
                FormulaTerm::Dice { count, die } => {
                    if i > 0 {
                        write!(f, "+")?;
                    }
                    write!(f, "{count}{die}")?;
                }
                FormulaTerm::Constant(n) if *n < 0 => write!(f, "{n}")?,
                FormulaTerm::Constant(n) => {
                    if i > 0 {
                        write!(f, "+")?;
                    }
                    write!(f, "{n}")?;
                }
            }
        }
        Ok(())
    }
}

fn parse_term(formula: &str, token: &str, negative: bool) -> MechResult<FormulaTerm> {
    if token.is_empty() {
        return Err(MechError::formula(formula, "dangling operator"));
    }

    let lower = token.to_ascii_lowercase();
    let Some((count, sides)) = lower.split_once('d') else {
        let value = token
            .parse::<i64>()
            .map_err(|_| MechError::formula(formula, format!("unexpected term '{token}'")))?;
        if value.unsigned_abs() > MAX_CONSTANT.unsigned_abs() {
            return Err(MechError::formula(
                formula,
                format!("constant '{token}' exceeds {MAX_CONSTANT}"),
            ));
        }
        return Ok(FormulaTerm::Constant(if negative { -value } else { value }));
    };

    if negative {
        return Err(MechError::formula(
            formula,
            "subtracted dice terms are not supported",
        ));
    }

    let count = if count.is_empty() {
        1
    } else {
        count
            .parse::<u32>()
            .map_err(|_| MechError::formula(formula, format!("bad dice count in '{token}'")))?
    };
    if count == 0 || count > MAX_DICE_PER_TERM {
        return Err(MechError::formula(
            formula,
            format!("dice count must be between 1 and {MAX_DICE_PER_TERM}"),
        ));
    }

    let die = sides
        .parse::<u32>()
        .ok()
        .and_then(Die::from_sides)
        .ok_or_else(|| MechError::formula(formula, format!("bad die size in '{token}'")))?;

    Ok(FormulaTerm::Dice { count, die })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn parse_single_percentile() {
        let f = Formula::parse("1d100").unwrap();
        assert_eq!(f, Formula::percentile());
        assert_eq!(f.dice_count(), 1);
    }

    #[test]
    fn parse_mixed_terms() {
        let f = Formula::parse(" 2d10 + 5 - 1 + d4 ").unwrap();
        assert_eq!(
            f.terms(),
            &[
                FormulaTerm::Dice {
                    count: 2,
                    die: Die::D10
                },
                FormulaTerm::Constant(5),
                FormulaTerm::Constant(-1),
                FormulaTerm::Dice {
                    count: 1,
                    die: Die::D4
                },
            ]
        );
        assert_eq!(f.dice_count(), 3);
        assert_eq!(f.to_string(), "2d10+5-1+1d4");
    }

    #[test]
    fn parse_leading_sign_constant() {
        let f = Formula::parse("-3+1d6").unwrap();
        assert_eq!(f.terms()[0], FormulaTerm::Constant(-3));
        assert_eq!(f.to_string(), "-3+1d6");
    }

    #[test]
    fn rejects_bad_input() {
        for bad in [
            "",
            "   ",
            "1d",
            "0d6",
            "2d0",
            "1d6+",
            "foo",
            "1d6-1d4",
            "-d20",
            "101d6",
            "1d6+10001",
            "1d6+9223372036854775807+1",
            "1d6-99999999999999999999",
        ] {
            assert!(
                matches!(Formula::parse(bad), Err(MechError::InvalidFormula { .. })),
                "expected '{bad}' to be rejected"
            );
        }
    }

    #[test]
    fn constant_at_limit_is_accepted() {
        let f = Formula::parse("1d6-10000").unwrap();
        assert_eq!(f.to_string(), "1d6-10000");
    }

    #[test]
    fn from_str_roundtrip() {
        let f: Formula = "3D6".parse().unwrap();
        assert_eq!(f.to_string(), "3d6");
    }

    #[test]
    fn roll_produces_valid_slots() {
        let mut rng = StdRng::seed_from_u64(42);
        let roll = Formula::parse("10d6+2").unwrap().roll(&mut rng);
        assert_eq!(roll.dice_count(), 10);
        assert!(roll.slots().all(|s| s.faces == 6 && s.is_valid()));
        assert_eq!(roll.constant_total(), 2);
        assert_eq!(roll.total(), roll.dice_total() + 2);
    }

    #[test]
    fn roll_deterministic_with_seed() {
        let f = Formula::parse("3d20").unwrap();
        let r1 = f.roll(&mut StdRng::seed_from_u64(99));
        let r2 = f.roll(&mut StdRng::seed_from_u64(99));
        assert!(r1.slots().eq(r2.slots()));
    }
}
