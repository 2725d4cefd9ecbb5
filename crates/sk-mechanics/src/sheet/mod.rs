//! Per-test character context: effective skill values and extended tests.
//!
//! A [`SkillContext`] is derived fresh each time a test subject is offered
//! for selection and is never stored.

pub mod extended;

pub use extended::{
    ExtendedTestProgress, ExtendedTestUpdate, apply_extended_test_delta, apply_extended_test_roll,
};

use serde::{Deserialize, Serialize};

/// A testable value with its contextual modifier folded in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillContext {
    /// Display name (characteristic, skill or weapon).
    pub name: String,
    /// Value before modifiers.
    pub base_value: i64,
    /// Advantage and condition modifier.
    pub modifier: i64,
    /// `max(1, base_value + modifier)`.
    pub effective_value: i64,
    /// Whether a 96+ on this test is a miscast.
    pub is_magic_related: bool,
}

impl SkillContext {
    /// Build a context, enforcing an effective value of at least 1.
    pub fn new(name: impl Into<String>, base_value: i64, modifier: i64, is_magic_related: bool) -> Self {
        Self {
            name: name.into(),
            base_value,
            modifier,
            effective_value: (base_value + modifier).max(1),
            is_magic_related,
        }
    }

    /// The modifier with an explicit sign, e.g. `+10` or `-20`.
    pub fn modifier_label(&self) -> String {
        if self.modifier >= 0 {
            format!("+{}", self.modifier)
        } else {
            self.modifier.to_string()
        }
    }
}

impl std::fmt::Display for SkillContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} ({} {})",
            self.name,
            self.effective_value,
            self.base_value,
            self.modifier_label()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_value_includes_modifier() {
        let ctx = SkillContext::new("Melee (Basic)", 42, 10, false);
        assert_eq!(ctx.effective_value, 52);
        assert_eq!(ctx.modifier_label(), "+10");
    }

    #[test]
    fn effective_value_floor_is_one() {
        let ctx = SkillContext::new("Channelling", 15, -40, true);
        assert_eq!(ctx.effective_value, 1);
        assert_eq!(ctx.modifier_label(), "-40");
    }

    #[test]
    fn display() {
        let ctx = SkillContext::new("WS", 35, -10, false);
        assert_eq!(ctx.to_string(), "WS 25 (35 -10)");
    }
}
