//! Actor snapshots as provided by the host.
//!
//! A snapshot is a read-only copy of the character data the director
//! needs: characteristics, skills, weapons, status effects, advantage and
//! extended tests. It is taken once per invocation.

use serde::{Deserialize, Serialize};
use sk_mechanics::{EffectState, ExtendedTestProgress};

/// Weapon groups tested with Ballistic Skill.
pub const RANGED_GROUPS: [&str; 6] = [
    "bow",
    "crossbow",
    "blackpowder",
    "throwing",
    "engineering",
    "entangling",
];

/// A characteristic such as `ws` or `int`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Characteristic {
    /// Short key (`ws`, `bs`, `s`, ...).
    pub key: String,
    /// Current value.
    pub value: i64,
}

/// A skill with its resolved total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillItem {
    /// Skill name, e.g. `Melee (Basic)`.
    pub name: String,
    /// Characteristic plus advances.
    pub value: i64,
}

/// A weapon carried by the actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponItem {
    /// Weapon name.
    pub name: String,
    /// Weapon group, e.g. `basic`, `bow`.
    #[serde(default)]
    pub group: String,
}

impl WeaponItem {
    /// Returns true for weapon groups tested with Ballistic Skill.
    pub fn is_ranged(&self) -> bool {
        let group = self.group.to_lowercase();
        RANGED_GROUPS.contains(&group.as_str())
    }

    /// The characteristic key this weapon is tested against.
    pub fn characteristic_key(&self) -> &'static str {
        if self.is_ranged() { "bs" } else { "ws" }
    }
}

/// An extended test in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedTestItem {
    /// Host item id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Current and target success levels.
    #[serde(flatten)]
    pub progress: ExtendedTestProgress,
}

/// Everything the director reads about one actor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorSnapshot {
    /// Host actor id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Characteristics in sheet order.
    #[serde(default)]
    pub characteristics: Vec<Characteristic>,
    /// Skills.
    #[serde(default)]
    pub skills: Vec<SkillItem>,
    /// Weapons.
    #[serde(default)]
    pub weapons: Vec<WeaponItem>,
    /// Status effects.
    #[serde(default)]
    pub effects: Vec<EffectState>,
    /// Advantage points.
    #[serde(default)]
    pub advantage: i64,
    /// Extended tests.
    #[serde(default)]
    pub extended_tests: Vec<ExtendedTestItem>,
}

impl ActorSnapshot {
    /// Create an empty snapshot.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Look up a characteristic value by key (case-insensitive).
    pub fn characteristic(&self, key: &str) -> Option<i64> {
        self.characteristics
            .iter()
            .find(|c| c.key.eq_ignore_ascii_case(key))
            .map(|c| c.value)
    }

    /// Look up an extended test by id.
    pub fn extended_test(&self, id: &str) -> Option<&ExtendedTestItem> {
        self.extended_tests.iter().find(|t| t.id == id)
    }

    /// Mutable lookup of an extended test by id.
    pub fn extended_test_mut(&mut self, id: &str) -> Option<&mut ExtendedTestItem> {
        self.extended_tests.iter_mut().find(|t| t.id == id)
    }

    /// Parse a snapshot from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
