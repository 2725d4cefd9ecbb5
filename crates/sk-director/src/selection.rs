//! Selection context: the test subjects offered for one invocation.
//!
//! Built once from actor snapshots when the dialog opens, then passed
//! around explicitly. Nothing here looks up session state on its own.

use serde::{Deserialize, Serialize};
use sk_mechanics::{ModifierBreakdown, SkillContext};

use crate::actor::{ActorSnapshot, ExtendedTestItem};
use crate::opposed::Opposition;

/// Skill value assumed when no subject is selected.
pub const DEFAULT_SKILL_VALUE: i64 = 45;

/// Skill-name fragments that mark a test as magic related.
const MAGIC_MARKERS: [&str; 2] = ["language (magick)", "channelling"];

/// Where a test subject comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    /// A characteristic such as WS.
    Characteristic,
    /// A skill.
    Skill,
    /// A weapon, tested against WS or BS.
    Weapon,
}

impl std::fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Characteristic => write!(f, "characteristic"),
            Self::Skill => write!(f, "skill"),
            Self::Weapon => write!(f, "weapon"),
        }
    }
}

/// One selectable test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSubject {
    /// Kind of subject.
    pub kind: SubjectKind,
    /// Name, values and magic flag.
    pub context: SkillContext,
}

impl TestSubject {
    /// Display label.
    pub fn name(&self) -> &str {
        &self.context.name
    }

    /// Effective value including modifiers.
    pub fn effective_value(&self) -> i64 {
        self.context.effective_value
    }
}

/// Everything the selection dialog shows for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionContext {
    /// The controlled actor's id, if any.
    pub actor_id: Option<String>,
    /// The controlled actor's name, if any.
    pub actor_name: Option<String>,
    /// Advantage and conditions folded into every subject.
    pub modifiers: ModifierBreakdown,
    /// Characteristics, then skills, then weapons.
    pub subjects: Vec<TestSubject>,
    /// Extended tests that can receive the result.
    pub extended_tests: Vec<ExtendedTestItem>,
    /// Comparison with a targeted actor, if any.
    pub opposition: Option<Opposition>,
}

impl SelectionContext {
    /// Build the context for a controlled actor and an optional target.
    pub fn build(actor: Option<&ActorSnapshot>, target: Option<&ActorSnapshot>) -> Self {
        let Some(actor) = actor else {
            return Self::default();
        };

        let modifiers = ModifierBreakdown::fold(actor.advantage, &actor.effects);
        let modifier = modifiers.total();
        let mut subjects = Vec::new();

        for c in actor.characteristics.iter().filter(|c| c.value > 0) {
            subjects.push(TestSubject {
                kind: SubjectKind::Characteristic,
                context: SkillContext::new(c.key.to_uppercase(), c.value, modifier, false),
            });
        }

        let mut skills: Vec<_> = actor.skills.iter().collect();
        skills.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        for skill in skills {
            subjects.push(TestSubject {
                kind: SubjectKind::Skill,
                context: SkillContext::new(
                    skill.name.clone(),
                    skill.value,
                    modifier,
                    is_magic_skill(&skill.name),
                ),
            });
        }

        let mut weapons: Vec<_> = actor.weapons.iter().collect();
        weapons.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        for weapon in weapons {
            let key = weapon.characteristic_key();
            let base = actor.characteristic(key).unwrap_or(0);
            subjects.push(TestSubject {
                kind: SubjectKind::Weapon,
                context: SkillContext::new(
                    format!("{} ({})", weapon.name, key.to_uppercase()),
                    base,
                    modifier,
                    false,
                ),
            });
        }

        let roller_value = subjects
            .first()
            .map_or(DEFAULT_SKILL_VALUE, TestSubject::effective_value);
        let opposition = target.map(|t| Opposition::compare(t, roller_value));

        Self {
            actor_id: Some(actor.id.clone()),
            actor_name: Some(actor.name.clone()),
            modifiers,
            subjects,
            extended_tests: actor.extended_tests.clone(),
            opposition,
        }
    }

    /// Returns true if a controlled actor was available.
    pub fn has_actor(&self) -> bool {
        self.actor_id.is_some()
    }

    /// Subject by index.
    pub fn subject(&self, index: usize) -> Option<&TestSubject> {
        self.subjects.get(index)
    }

    /// Index of a subject by label (case-insensitive). A weapon can also be
    /// found by its bare name.
    pub fn find_subject(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.subjects
            .iter()
            .position(|s| s.name().to_lowercase() == wanted)
            .or_else(|| {
                let prefix = format!("{wanted} (");
                self.subjects.iter().position(|s| {
                    s.kind == SubjectKind::Weapon && s.name().to_lowercase().starts_with(&prefix)
                })
            })
    }

    /// Extended test by id.
    pub fn extended_test(&self, id: &str) -> Option<&ExtendedTestItem> {
        self.extended_tests.iter().find(|t| t.id == id)
    }

    /// Labels of the applied conditions, e.g. `Prone (-20)`.
    pub fn condition_labels(&self) -> Vec<&str> {
        self.modifiers
            .conditions
            .iter()
            .map(|c| c.label.as_str())
            .collect()
    }
}

/// Returns true for skills whose tests can miscast.
pub fn is_magic_skill(name: &str) -> bool {
    let lower = name.to_lowercase();
    MAGIC_MARKERS.iter().any(|m| lower.contains(m))
}
