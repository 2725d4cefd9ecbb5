//! Contextual test modifiers: advantage and condition penalties.
//!
//! Each active status effect contributes at most one condition penalty,
//! the first entry of [`Condition::ALL`] it matches. Advantage adds ten
//! per point. The folded total is applied to every test subject alike.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Bonus per point of advantage.
pub const ADVANTAGE_STEP: i64 = 10;

/// A condition that penalises tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    /// Worn out.
    Fatigued,
    /// Badly worn out.
    Exhausted,
    /// Lying on the ground.
    Prone,
    /// Cannot see.
    Blinded,
    /// Cannot hear.
    Deafened,
    /// Reeling.
    Stunned,
    /// Poisoned.
    Poisoned,
    /// Sick.
    Diseased,
}

impl Condition {
    /// All conditions in matching order.
    pub const ALL: [Self; 8] = [
        Self::Fatigued,
        Self::Exhausted,
        Self::Prone,
        Self::Blinded,
        Self::Deafened,
        Self::Stunned,
        Self::Poisoned,
        Self::Diseased,
    ];

    /// Status identifier as used by the host.
    pub fn id(self) -> &'static str {
        match self {
            Self::Fatigued => "fatigued",
            Self::Exhausted => "exhausted",
            Self::Prone => "prone",
            Self::Blinded => "blinded",
            Self::Deafened => "deafened",
            Self::Stunned => "stunned",
            Self::Poisoned => "poisoned",
            Self::Diseased => "diseased",
        }
    }

    /// Penalty applied to tests while the condition is active.
    pub fn penalty(self) -> i64 {
        match self {
            Self::Exhausted | Self::Prone | Self::Blinded => -20,
            Self::Fatigued | Self::Deafened | Self::Stunned | Self::Poisoned | Self::Diseased => {
                -10
            }
        }
    }

    /// Look a condition up by its status identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.id() == id)
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// A status effect as reported by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectState {
    /// Display name of the effect, if any.
    #[serde(default)]
    pub name: Option<String>,
    /// Status identifiers the effect carries. When absent, the name is
    /// searched for a condition identifier instead.
    #[serde(default)]
    pub statuses: Option<BTreeSet<String>>,
    /// Disabled effects contribute nothing.
    #[serde(default)]
    pub disabled: bool,
}

impl EffectState {
    /// An enabled effect carrying a single status.
    pub fn with_status(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            statuses: Some(BTreeSet::from([status.into()])),
            disabled: false,
        }
    }

    /// The first condition this effect matches, if it is enabled.
    pub fn matching_condition(&self) -> Option<Condition> {
        if self.disabled {
            return None;
        }
        Condition::ALL.into_iter().find(|c| match &self.statuses {
            Some(statuses) => statuses.contains(c.id()),
            None => self
                .name
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(c.id())),
        })
    }
}

/// A condition found on an effect, with a label for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedCondition {
    /// The matched condition.
    pub condition: Condition,
    /// E.g. `"Fatigued (-10)"`.
    pub label: String,
}

/// The folded contextual modifier for a tester.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierBreakdown {
    /// Advantage points.
    pub advantage: i64,
    /// Conditions that contributed a penalty, one per effect.
    pub conditions: Vec<AppliedCondition>,
}

impl ModifierBreakdown {
    /// Fold advantage and active effects into a breakdown.
    pub fn fold<'a>(advantage: i64, effects: impl IntoIterator<Item = &'a EffectState>) -> Self {
        let conditions = effects
            .into_iter()
            .filter_map(|effect| {
                let condition = effect.matching_condition()?;
                let name = effect.name.as_deref().unwrap_or(condition.id());
                Some(AppliedCondition {
                    condition,
                    label: format!("{name} ({})", condition.penalty()),
                })
            })
            .collect();
        Self {
            advantage,
            conditions,
        }
    }

    /// Bonus from advantage.
    pub fn advantage_bonus(&self) -> i64 {
        self.advantage * ADVANTAGE_STEP
    }

    /// Sum of condition penalties.
    pub fn condition_total(&self) -> i64 {
        self.conditions.iter().map(|c| c.condition.penalty()).sum()
    }

    /// The modifier applied to every test subject.
    pub fn total(&self) -> i64 {
        self.advantage_bonus() + self.condition_total()
    }
}

/// `advantage * 10` plus the condition penalties of `effects`.
pub fn contextual_modifier<'a>(
    advantage: i64,
    effects: impl IntoIterator<Item = &'a EffectState>,
) -> i64 {
    ModifierBreakdown::fold(advantage, effects).total()
}
