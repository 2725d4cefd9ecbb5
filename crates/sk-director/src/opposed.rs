//! Opposed-test comparison against a targeted actor.

use serde::{Deserialize, Serialize};

use crate::actor::ActorSnapshot;

/// Who is ahead in an opposed test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Standing {
    /// The roller's value is higher by this much.
    RollerAhead(i64),
    /// The target's value is higher; the difference is negative.
    TargetAhead(i64),
    /// Equal values: the higher skill wins ties.
    Tied,
}

/// The roller's value compared with a target's first characteristic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opposition {
    /// Name of the targeted actor.
    pub target_name: String,
    /// The target's first characteristic value (0 if it has none).
    pub target_value: i64,
    /// Result of the comparison.
    pub standing: Standing,
}

impl Opposition {
    /// Compare `roller_value` with the target.
    pub fn compare(target: &ActorSnapshot, roller_value: i64) -> Self {
        let target_value = target.characteristics.first().map_or(0, |c| c.value);
        let diff = roller_value - target_value;
        let standing = match diff {
            d if d > 0 => Standing::RollerAhead(d),
            d if d < 0 => Standing::TargetAhead(d),
            _ => Standing::Tied,
        };
        Self {
            target_name: target.name.clone(),
            target_value,
            standing,
        }
    }
}

impl std::fmt::Display for Opposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.standing {
            Standing::RollerAhead(d) => write!(f, "vs {}: roller ahead (+{d})", self.target_name),
            Standing::TargetAhead(d) => write!(f, "vs {}: target ahead ({d})", self.target_name),
            Standing::Tied => write!(f, "vs {}: tied, higher skill wins", self.target_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Characteristic;

    fn target(value: Option<i64>) -> ActorSnapshot {
        let mut actor = ActorSnapshot::new("t1", "Goblin");
        if let Some(value) = value {
            actor.characteristics.push(Characteristic {
                key: "ws".to_string(),
                value,
            });
        }
        actor
    }

    #[test]
    fn roller_ahead() {
        let opp = Opposition::compare(&target(Some(30)), 42);
        assert_eq!(opp.standing, Standing::RollerAhead(12));
        assert_eq!(opp.to_string(), "vs Goblin: roller ahead (+12)");
    }

    #[test]
    fn target_ahead() {
        let opp = Opposition::compare(&target(Some(50)), 45);
        assert_eq!(opp.standing, Standing::TargetAhead(-5));
        assert_eq!(opp.to_string(), "vs Goblin: target ahead (-5)");
    }

    #[test]
    fn tied_and_missing_characteristics() {
        assert_eq!(
            Opposition::compare(&target(Some(40)), 40).standing,
            Standing::Tied
        );
        let opp = Opposition::compare(&target(None), 45);
        assert_eq!(opp.target_value, 0);
        assert_eq!(opp.standing, Standing::RollerAhead(45));
    }
}
