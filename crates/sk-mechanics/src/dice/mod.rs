//! Dice types, formulas, and rolled results.
//!
//! Supports standard polyhedral dice (d4 through d100) and custom dice.
//! A rolled die is represented by a [`DieSlot`], which can later be
//! rewritten by the distributor without leaving its valid face range.

pub mod formula;
pub mod roll;

pub use formula::{Formula, FormulaTerm};
pub use roll::{DiceTerm, Roll, RollTerm};

use serde::{Deserialize, Serialize};

/// A polyhedral die type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Die {
    /// Four-sided die.
    D4,
    /// Six-sided die.
    D6,
    /// Eight-sided die.
    D8,
    /// Ten-sided die.
    D10,
    /// Twelve-sided die.
    D12,
    /// Twenty-sided die.
    D20,
    /// Percentile die (1-100).
    D100,
    /// A die with a custom number of sides.
    Custom(u32),
}

impl Die {
    /// Returns the number of sides on this die.
    pub fn sides(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
            Self::D100 => 100,
            Self::Custom(n) => n,
        }
    }

    /// Build a die from a side count, preferring the named variants.
    ///
    /// Returns `None` for fewer than one side.
    pub fn from_sides(sides: u32) -> Option<Self> {
        match sides {
            0 => None,
            4 => Some(Self::D4),
            6 => Some(Self::D6),
            8 => Some(Self::D8),
            10 => Some(Self::D10),
            12 => Some(Self::D12),
            20 => Some(Self::D20),
            100 => Some(Self::D100),
            n => Some(Self::Custom(n)),
        }
    }

    /// Parse a die from a string like "d20", "d6", "d100".
    pub fn from_str_tag(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        let sides = s.strip_prefix('d')?.parse::<u32>().ok()?;
        Self::from_sides(sides)
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// One physical die inside a roll: its current face and its face count.
///
/// `1 <= value <= faces` holds for every slot produced by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieSlot {
    /// The face currently showing.
    pub value: u32,
    /// Number of faces on the die.
    pub faces: u32,
}

impl DieSlot {
    /// Create a slot, clamping the value into `1..=faces`.
    pub fn new(value: u32, faces: u32) -> Self {
        let faces = faces.max(1);
        Self {
            value: value.clamp(1, faces),
            faces,
        }
    }

    /// Returns true if the current face is within the die's range.
    pub fn is_valid(&self) -> bool {
        (1..=self.faces).contains(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn die_sides() {
        assert_eq!(Die::D4.sides(), 4);
        assert_eq!(Die::D10.sides(), 10);
        assert_eq!(Die::D100.sides(), 100);
        assert_eq!(Die::Custom(30).sides(), 30);
    }

    #[test]
    fn die_from_str() {
        assert_eq!(Die::from_str_tag("d20"), Some(Die::D20));
        assert_eq!(Die::from_str_tag("D6"), Some(Die::D6));
        assert_eq!(Die::from_str_tag("d100"), Some(Die::D100));
        assert_eq!(Die::from_str_tag("d30"), Some(Die::Custom(30)));
        assert_eq!(Die::from_str_tag("d1"), Some(Die::Custom(1)));
        assert_eq!(Die::from_str_tag("d0"), None);
        assert_eq!(Die::from_str_tag("foo"), None);
    }

    #[test]
    fn die_display() {
        assert_eq!(Die::D20.to_string(), "d20");
        assert_eq!(Die::Custom(30).to_string(), "d30");
    }

    #[test]
    fn slot_clamps_on_construction() {
        assert_eq!(DieSlot::new(0, 6).value, 1);
        assert_eq!(DieSlot::new(9, 6).value, 6);
        assert!(DieSlot::new(4, 6).is_valid());
    }
}
