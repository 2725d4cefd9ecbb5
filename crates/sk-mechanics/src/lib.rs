//! Percentile test mechanics for Schicksal.
//!
//! Provides the pieces needed to show a chosen result on a d100 test
//! without it looking chosen: a planner that picks a believable value for
//! an outcome tier, a distributor that rewrites rolled dice to a total,
//! success-level arithmetic, condition and advantage modifiers, and
//! extended-test bookkeeping.

pub mod dice;
pub mod distribute;
pub mod error;
pub mod modifiers;
pub mod planner;
pub mod resolution;
pub mod sheet;

pub use dice::{DieSlot, Die, Formula, Roll};
pub use distribute::redistribute_dice;
pub use error::{MechError, MechResult};
pub use modifiers::{Condition, EffectState, ModifierBreakdown, contextual_modifier};
pub use planner::{Planner, PlannerTuning, TargetIntent, plan_target_value};
pub use resolution::{OutcomeCategory, RollOutcome, success_level};
pub use sheet::{
    ExtendedTestProgress, ExtendedTestUpdate, SkillContext, apply_extended_test_delta,
    apply_extended_test_roll,
};
